use crate::workflow::WorkflowOutcome;
use crate::{Error, ErrorKind, WorkflowStage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of one import, as returned to API and CLI callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub success: bool,
    pub message: String,
    pub object_key: String,
    pub stages: Vec<WorkflowStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_downloaded: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportReport {
    /// Summarize a finished workflow run
    pub fn from_outcome(
        run_id: Uuid,
        object_key: &str,
        started_at: DateTime<Utc>,
        outcome: &WorkflowOutcome,
    ) -> Self {
        let (success, message, bytes_downloaded, error_kind) = match &outcome.result {
            Ok(upload) => (
                true,
                format!(
                    "Import completed: uploaded {} ({} bytes)",
                    object_key, upload.bytes
                ),
                Some(upload.bytes),
                None,
            ),
            Err(e) => (false, e.to_string(), None, Some(e.kind())),
        };

        Self {
            run_id,
            success,
            message,
            object_key: object_key.to_string(),
            stages: outcome.stages.clone(),
            bytes_downloaded,
            final_url: outcome.location.as_ref().map(|l| l.url.clone()),
            page_title: outcome.location.as_ref().map(|l| l.title.clone()),
            error_kind,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// A run that failed before the workflow could start
    pub fn rejected(
        run_id: Uuid,
        object_key: &str,
        started_at: DateTime<Utc>,
        error: &Error,
    ) -> Self {
        Self {
            run_id,
            success: false,
            message: error.to_string(),
            object_key: object_key.to_string(),
            stages: Vec::new(),
            bytes_downloaded: None,
            final_url: None,
            page_title: None,
            error_kind: Some(error.kind()),
            started_at,
            finished_at: Utc::now(),
        }
    }
}

//! The import workflow.
//!
//! A run walks the stages of [`WorkflowStage`] strictly in order. The first
//! failing step ends the run; the scratch file is then deleted and the browser
//! closed no matter where the failure happened, so every trail ends with
//! `Cleaned` and `Closed`.

mod steps;

use crate::{
    BrowserDriver, ImportRequest, ObjectStore, PageInfo, Result, ScratchFile, Settings,
    StageTrail, WorkflowStage, WorkflowTimings,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Data about a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub bytes: u64,
    pub scratch_path: PathBuf,
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct WorkflowOutcome {
    /// Stages entered, in order
    pub stages: Vec<WorkflowStage>,
    pub result: Result<Uploaded>,
    /// Last page seen before the browser was closed
    pub location: Option<PageInfo>,
}

impl WorkflowOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct ImportWorkflow<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    scratch_dir: PathBuf,
    interface_code: String,
    timings: WorkflowTimings,
}

impl<'a, S: ObjectStore + ?Sized> ImportWorkflow<'a, S> {
    pub fn new(store: &'a S, settings: &Settings) -> Self {
        Self {
            store,
            scratch_dir: settings.scratch_dir.clone(),
            interface_code: settings.interface_code.clone(),
            timings: settings.timings,
        }
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub fn with_timings(mut self, timings: WorkflowTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Run the whole workflow against an open browser session.
    ///
    /// The session is closed before this returns.
    pub async fn run<D: BrowserDriver + ?Sized>(
        &self,
        driver: &mut D,
        request: &ImportRequest,
    ) -> WorkflowOutcome {
        let mut trail = StageTrail::new();
        trail.enter(WorkflowStage::LoggedOut);

        let mut scratch: Option<ScratchFile> = None;
        let result = self
            .drive(driver, request, &mut trail, &mut scratch)
            .await;

        match &result {
            Ok(uploaded) => info!(
                "Import of {} completed ({} bytes)",
                request.object_key, uploaded.bytes
            ),
            Err(e) => error!(
                stage = ?trail.current(),
                kind = e.kind().as_str(),
                "Import of {} failed: {}",
                request.object_key,
                e
            ),
        }

        let location = match driver.page_info().await {
            Ok(info) => {
                info!("Final page: {} - {}", info.title, info.url);
                Some(info)
            }
            Err(e) => {
                warn!("Could not read final page: {}", e);
                None
            }
        };

        if let Some(file) = scratch.take() {
            let path = file.path().to_path_buf();
            match file.remove() {
                Ok(_) => info!("Temporary file {} removed", path.display()),
                Err(e) => warn!("Failed to remove temporary file {}: {}", path.display(), e),
            }
        }
        trail.enter(WorkflowStage::Cleaned);

        if let Err(e) = driver.close().await {
            warn!("Failed to close browser: {}", e);
        }
        trail.enter(WorkflowStage::Closed);

        WorkflowOutcome {
            stages: trail.into_stages(),
            result,
            location,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// States of an import run, in the only order they can be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    LoggedOut,
    LoggedIn,
    MenuNavigated,
    ImportDialogOpen,
    CodeFilled,
    SearchSubmitted,
    PopupHandled,
    FileDownloaded,
    FileUploaded,
    Cleaned,
    Closed,
}

impl WorkflowStage {
    pub const ALL: [WorkflowStage; 11] = [
        WorkflowStage::LoggedOut,
        WorkflowStage::LoggedIn,
        WorkflowStage::MenuNavigated,
        WorkflowStage::ImportDialogOpen,
        WorkflowStage::CodeFilled,
        WorkflowStage::SearchSubmitted,
        WorkflowStage::PopupHandled,
        WorkflowStage::FileDownloaded,
        WorkflowStage::FileUploaded,
        WorkflowStage::Cleaned,
        WorkflowStage::Closed,
    ];

    /// The stage that follows this one on a successful run
    pub fn next(self) -> Option<WorkflowStage> {
        let index = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(index + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::LoggedOut => "logged_out",
            WorkflowStage::LoggedIn => "logged_in",
            WorkflowStage::MenuNavigated => "menu_navigated",
            WorkflowStage::ImportDialogOpen => "import_dialog_open",
            WorkflowStage::CodeFilled => "code_filled",
            WorkflowStage::SearchSubmitted => "search_submitted",
            WorkflowStage::PopupHandled => "popup_handled",
            WorkflowStage::FileDownloaded => "file_downloaded",
            WorkflowStage::FileUploaded => "file_uploaded",
            WorkflowStage::Cleaned => "cleaned",
            WorkflowStage::Closed => "closed",
        }
    }

    /// Stages that run whether or not the earlier steps succeeded
    pub fn is_cleanup(&self) -> bool {
        matches!(self, WorkflowStage::Cleaned | WorkflowStage::Closed)
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered record of the stages a run has entered
#[derive(Debug, Clone, Default)]
pub struct StageTrail {
    stages: Vec<WorkflowStage>,
}

impl StageTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log entry into a stage
    pub fn enter(&mut self, stage: WorkflowStage) {
        tracing::info!(stage = %stage, step = self.stages.len() + 1, "Workflow stage reached");
        self.stages.push(stage);
    }

    pub fn current(&self) -> Option<WorkflowStage> {
        self.stages.last().copied()
    }

    pub fn stages(&self) -> &[WorkflowStage] {
        &self.stages
    }

    pub fn contains(&self, stage: WorkflowStage) -> bool {
        self.stages.contains(&stage)
    }

    pub fn into_stages(self) -> Vec<WorkflowStage> {
        self.stages
    }
}

pub mod config;
pub mod driver;
pub mod error;
pub mod report;
pub mod request;
pub mod scratch;
pub mod selectors;
pub mod stage;
pub mod store;
pub mod workflow;

pub use config::{Settings, WorkflowTimings};
pub use driver::{BrowserDriver, PageInfo};
pub use error::{Error, ErrorKind, Result};
pub use report::ImportReport;
pub use request::ImportRequest;
pub use scratch::ScratchFile;
pub use selectors::Selector;
pub use stage::{StageTrail, WorkflowStage};
pub use store::ObjectStore;
pub use workflow::{ImportWorkflow, WorkflowOutcome};

//! The browser seam of the import workflow.
//!
//! The workflow only talks to the page through [`BrowserDriver`], which keeps
//! it independent of the CDP client and lets tests substitute a scripted fake.

use crate::{Result, Selector};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Where the session currently is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

/// One exclusively owned browser page.
///
/// Element operations target the first element matching a single selector,
/// searching the page and its same-origin frames. Failures are reported as
/// [`crate::Error::Ui`].
#[async_trait]
pub trait BrowserDriver: Send {
    /// Navigate the page to `url`
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Wait for the current navigation to settle
    async fn wait_for_load(&mut self, timeout: Duration) -> Result<()>;

    /// The first candidate that matches an element right now, if any
    async fn locate(&mut self, candidates: &[Selector]) -> Result<Option<Selector>>;

    /// Replace the value of an input and fire its input/change events
    async fn fill(&mut self, selector: &Selector, value: &str) -> Result<()>;

    async fn click(&mut self, selector: &Selector) -> Result<()>;

    async fn hover(&mut self, selector: &Selector) -> Result<()>;

    /// Wait until `selector` matches an element
    async fn wait_for_selector(&mut self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Click an element that opens a new window and wait for that window to load
    async fn click_for_popup(&mut self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Click an element that opens the native file chooser and answer it with `file`
    async fn upload_file(&mut self, trigger: &Selector, file: &Path) -> Result<()>;

    /// Fixed wait
    async fn pause(&mut self, duration: Duration);

    async fn page_info(&mut self) -> Result<PageInfo>;

    /// Close the browser; the session is unusable afterwards
    async fn close(&mut self) -> Result<()>;
}

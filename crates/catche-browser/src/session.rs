use crate::locator::{self, Action, ViewportPoint};
use crate::{Error, ProfileManager, Result};
use async_trait::async_trait;
use catche_core::{BrowserDriver, PageInfo, Selector};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::page::{
    EventFileChooserOpened, SetInterceptFileChooserDialogParams,
};
use chromiumoxide::cdp::browser_protocol::target::{EventTargetCreated, TargetId};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::layout::Point;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const FILE_CHOOSER_TIMEOUT: Duration = Duration::from_secs(10);

/// A launched Chrome driven through one page.
///
/// Owns the browser process, the CDP handler task and the temporary profile.
/// All of them are released by [`BrowserDriver::close`], or on drop.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    profile: Option<ProfileManager>,
    closed: bool,
}

impl ChromeSession {
    pub(crate) fn new(
        browser: Browser,
        page: Page,
        handler_task: JoinHandle<()>,
        profile: ProfileManager,
    ) -> Self {
        Self {
            browser,
            page,
            handler_task,
            profile: Some(profile),
            closed: false,
        }
    }

    async fn evaluate<T: DeserializeOwned>(&self, expression: String) -> Result<Option<T>> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(Error::Script)?;

        let result = self.page.evaluate_expression(params).await?;
        match result.value() {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::Script(e.to_string())),
        }
    }

    async fn exists(&self, selector: &Selector) -> Result<bool> {
        let script = locator::script(selector, Action::Exists, None)?;
        Ok(self.evaluate::<bool>(script).await?.unwrap_or(false))
    }

    /// Scroll the element into view and return its centre
    async fn point_of(&self, selector: &Selector) -> Result<Point> {
        let script = locator::script(selector, Action::Point, None)?;
        let point: ViewportPoint = self
            .evaluate(script)
            .await?
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))?;

        Ok(Point::new(point.x, point.y))
    }

    async fn wait_until_present(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if self.exists(selector).await? {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(Error::Timeout {
                    what: selector.to_string(),
                    millis: timeout.as_millis(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn document_complete(page: &Page) -> bool {
        matches!(
            page.evaluate_expression("document.readyState")
                .await
                .ok()
                .and_then(|r| r.into_value::<String>().ok())
                .as_deref(),
            Some("complete")
        )
    }

    async fn wait_for_page(page: &Page, timeout: Duration) -> Result<()> {
        let timed_out = || Error::Timeout {
            what: "page load".to_string(),
            millis: timeout.as_millis(),
        };

        tokio::time::timeout(timeout, async {
            page.wait_for_navigation().await?;
            while !Self::document_complete(page).await {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            Ok::<(), Error>(())
        })
        .await
        .map_err(|_| timed_out())?
    }

    /// The attached page for a target, once chromiumoxide has picked it up
    async fn attached_page(&self, target: &TargetId, timeout: Duration) -> Option<Page> {
        let started = Instant::now();
        loop {
            if let Ok(pages) = self.browser.pages().await
                && let Some(page) = pages.into_iter().find(|p| p.target_id() == target)
            {
                return Some(page);
            }
            if started.elapsed() >= timeout {
                return None;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn choose_file(&self, trigger: &Selector, file: &Path) -> Result<()> {
        let mut chooser = self
            .page
            .event_listener::<EventFileChooserOpened>()
            .await?;

        let point = self.point_of(trigger).await?;
        self.page.click(point).await?;

        let opened = tokio::time::timeout(FILE_CHOOSER_TIMEOUT, chooser.next())
            .await
            .map_err(|_| Error::Timeout {
                what: "file chooser".to_string(),
                millis: FILE_CHOOSER_TIMEOUT.as_millis(),
            })?
            .ok_or_else(|| Error::Cdp("file chooser event stream closed".to_string()))?;

        let backend_node_id = opened
            .backend_node_id
            .clone()
            .ok_or_else(|| Error::ElementNotFound("file input behind chooser".to_string()))?;

        let params = SetFileInputFilesParams::builder()
            .files(vec![file.display().to_string()])
            .backend_node_id(backend_node_id)
            .build()
            .map_err(Error::Cdp)?;
        self.page.execute(params).await?;

        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for ChromeSession {
    async fn goto(&mut self, url: &str) -> catche_core::Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.page.goto(url).await.map_err(Error::from)?;
        Ok(())
    }

    async fn wait_for_load(&mut self, timeout: Duration) -> catche_core::Result<()> {
        Self::wait_for_page(&self.page, timeout).await?;
        Ok(())
    }

    async fn locate(&mut self, candidates: &[Selector]) -> catche_core::Result<Option<Selector>> {
        for candidate in candidates {
            if self.exists(candidate).await? {
                tracing::debug!("Matched {}", candidate);
                return Ok(Some(*candidate));
            }
        }
        Ok(None)
    }

    async fn fill(&mut self, selector: &Selector, value: &str) -> catche_core::Result<()> {
        let script = locator::script(selector, Action::Fill, Some(value))?;
        self.evaluate::<bool>(script)
            .await?
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))?;
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> catche_core::Result<()> {
        let point = self.point_of(selector).await?;
        self.page.click(point).await.map_err(Error::from)?;
        Ok(())
    }

    async fn hover(&mut self, selector: &Selector) -> catche_core::Result<()> {
        let point = self.point_of(selector).await?;
        self.page.move_mouse(point).await.map_err(Error::from)?;
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> catche_core::Result<()> {
        self.wait_until_present(selector, timeout).await?;
        Ok(())
    }

    async fn click_for_popup(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> catche_core::Result<()> {
        let mut created = self
            .browser
            .event_listener::<EventTargetCreated>()
            .await
            .map_err(Error::from)?;
        let opener = self.page.target_id().clone();

        let started = Instant::now();
        let point = self.point_of(selector).await?;
        self.page.click(point).await.map_err(Error::from)?;

        let popup = tokio::time::timeout(timeout, async {
            while let Some(event) = created.next().await {
                let info = &event.target_info;
                if is_popup_of(
                    &info.r#type,
                    info.opener_id.as_ref().map(|id| id.inner().as_str()),
                    opener.inner(),
                ) {
                    return Some(info.target_id.clone());
                }
            }
            None
        })
        .await
        .map_err(|_| Error::Timeout {
            what: "popup window".to_string(),
            millis: timeout.as_millis(),
        })?
        .ok_or_else(|| Error::Cdp("target event stream closed".to_string()))?;

        tracing::info!("Popup window opened");
        let remaining = timeout.saturating_sub(started.elapsed());
        // The popup may close itself before it is attached or loaded
        match self.attached_page(&popup, remaining).await {
            Some(page) => {
                let remaining = timeout.saturating_sub(started.elapsed());
                if let Err(e) = Self::wait_for_page(&page, remaining).await {
                    tracing::debug!("Popup did not report load: {}", e);
                }
            }
            None => tracing::debug!("Popup closed before it was attached"),
        }
        Ok(())
    }

    async fn upload_file(&mut self, trigger: &Selector, file: &Path) -> catche_core::Result<()> {
        self.page
            .execute(SetInterceptFileChooserDialogParams::new(true))
            .await
            .map_err(Error::from)?;

        let result = self.choose_file(trigger, file).await;

        if let Err(e) = self
            .page
            .execute(SetInterceptFileChooserDialogParams::new(false))
            .await
        {
            tracing::debug!("Could not disable file chooser interception: {}", e);
        }

        result?;
        tracing::info!("Attached {} to the import", file.display());
        Ok(())
    }

    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn page_info(&mut self) -> catche_core::Result<PageInfo> {
        let url = self.page.url().await.map_err(Error::from)?;
        let title = self.page.get_title().await.map_err(Error::from)?;

        Ok(PageInfo {
            url: url.unwrap_or_default(),
            title: title.unwrap_or_default(),
        })
    }

    async fn close(&mut self) -> catche_core::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Chrome exit wait failed: {}", e);
        }
        self.handler_task.abort();
        self.profile.take();
        tracing::info!("Browser closed");

        closed.map_err(Error::from)?;
        Ok(())
    }
}

/// A new page target opened by the given page
fn is_popup_of(kind: &str, opener: Option<&str>, page: &str) -> bool {
    kind == "page" && opener == Some(page)
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

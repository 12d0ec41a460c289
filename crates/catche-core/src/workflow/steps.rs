use super::{ImportWorkflow, Uploaded};
use crate::selectors::{self, DROPZONE_BROWSE};
use crate::{
    BrowserDriver, Error, ImportRequest, ObjectStore, Result, ScratchFile, Selector, StageTrail,
    WorkflowStage,
};
use tracing::{debug, info, warn};
use url::Url;

impl<S: ObjectStore + ?Sized> ImportWorkflow<'_, S> {
    /// Every step up to and including the upload. Returns at the first failure.
    pub(super) async fn drive<D: BrowserDriver + ?Sized>(
        &self,
        driver: &mut D,
        request: &ImportRequest,
        trail: &mut StageTrail,
        scratch: &mut Option<ScratchFile>,
    ) -> Result<Uploaded> {
        let login_url = request.validate()?;

        self.log_in(driver, &login_url, request).await?;
        trail.enter(WorkflowStage::LoggedIn);

        self.open_transactions(driver).await?;
        trail.enter(WorkflowStage::MenuNavigated);

        let import = require(driver, selectors::IMPORT_BUTTON, "Import button").await?;
        driver.click(&import).await?;
        driver.wait_for_load(self.timings.load_timeout).await?;
        trail.enter(WorkflowStage::ImportDialogOpen);

        let code_input =
            require(driver, selectors::INTERFACE_CODE_INPUT, "Interface code input").await?;
        driver.fill(&code_input, &self.interface_code).await?;
        info!("Interface code '{}' entered", self.interface_code);
        driver.pause(self.timings.code_settle).await;
        trail.enter(WorkflowStage::CodeFilled);

        let search = require(driver, selectors::SEARCH_BUTTON, "Search button").await?;
        driver
            .click_for_popup(&search, self.timings.selector_timeout)
            .await?;
        trail.enter(WorkflowStage::SearchSubmitted);

        // The popup closes itself once the code is picked and the page
        // re-renders with the attachment dropzone.
        driver.pause(self.timings.popup_settle).await;
        driver
            .wait_for_selector(&DROPZONE_BROWSE, self.timings.selector_timeout)
            .await?;
        trail.enter(WorkflowStage::PopupHandled);

        let file = scratch.insert(ScratchFile::claim(&self.scratch_dir, &request.object_key)?);
        info!(
            "Downloading {} from bucket {} to {}",
            request.object_key,
            self.store.bucket(),
            file.path().display()
        );
        let bytes = self.store.download(&request.object_key, file.path()).await?;
        trail.enter(WorkflowStage::FileDownloaded);

        driver.upload_file(&DROPZONE_BROWSE, file.path()).await?;
        driver.pause(self.timings.upload_settle).await;
        trail.enter(WorkflowStage::FileUploaded);

        Ok(Uploaded {
            bytes,
            scratch_path: file.path().to_path_buf(),
        })
    }

    async fn log_in<D: BrowserDriver + ?Sized>(
        &self,
        driver: &mut D,
        login_url: &Url,
        request: &ImportRequest,
    ) -> Result<()> {
        info!("Navigating to login page {}", login_url);
        driver.goto(login_url.as_str()).await?;
        driver.wait_for_load(self.timings.load_timeout).await?;

        let username = require(driver, selectors::USERNAME, "Username field").await?;
        driver.fill(&username, &request.username).await?;

        let password = require(driver, selectors::PASSWORD, "Password field").await?;
        driver.fill(&password, &request.password).await?;

        let submit = require(driver, selectors::SUBMIT, "Submit button").await?;
        driver.click(&submit).await?;
        info!("Login form submitted for user {}", request.username);

        // Some login pages never reach an idle state; carry on regardless
        if let Err(e) = driver.wait_for_load(self.timings.load_timeout).await {
            warn!("Page load after login did not settle, continuing anyway: {}", e);
        }

        Ok(())
    }

    /// Fleet -> Card Services -> Transactions
    async fn open_transactions<D: BrowserDriver + ?Sized>(&self, driver: &mut D) -> Result<()> {
        let fleet = require(driver, selectors::FLEET_MENU, "Fleet menu").await?;
        driver.hover(&fleet).await?;
        driver.pause(self.timings.menu_delay).await;

        let card_services =
            require(driver, selectors::CARD_SERVICES_MENU, "Card Services menu").await?;
        driver.hover(&card_services).await?;
        driver.pause(self.timings.menu_delay).await;

        let transactions =
            require(driver, selectors::TRANSACTIONS_MENU, "Transactions menu").await?;
        driver.click(&transactions).await?;
        driver.wait_for_load(self.timings.load_timeout).await?;

        Ok(())
    }
}

/// First present candidate for a control, or a UI error naming the control
async fn require<D: BrowserDriver + ?Sized>(
    driver: &mut D,
    candidates: &[Selector],
    control: &str,
) -> Result<Selector> {
    match driver.locate(candidates).await? {
        Some(selector) => {
            debug!("{} found using selector: {}", control, selector);
            Ok(selector)
        }
        None => Err(Error::ui(format!("{} not found", control))),
    }
}

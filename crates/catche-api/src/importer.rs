//! Runs import requests end to end: validation, a bounded slot, a fresh
//! browser session and the workflow itself.

use async_trait::async_trait;
use catche_browser::ChromeLauncher;
use catche_core::{
    BrowserDriver, Error, ImportReport, ImportRequest, ImportWorkflow, ObjectStore, Settings,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

/// Opens a browser session for one run
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn open(&self) -> catche_core::Result<Box<dyn BrowserDriver>>;
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn open(&self) -> catche_core::Result<Box<dyn BrowserDriver>> {
        let session = self.launch().await?;
        Ok(Box::new(session))
    }
}

/// Shared by every request; at most `max_concurrent_imports` runs hold a
/// browser at the same time and the rest wait for a slot.
pub struct ImportService {
    settings: Settings,
    launcher: Arc<dyn SessionLauncher>,
    store: Arc<dyn ObjectStore>,
    slots: Semaphore,
}

impl ImportService {
    pub fn new(
        settings: Settings,
        launcher: Arc<dyn SessionLauncher>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let slots = Semaphore::new(settings.max_concurrent_imports.max(1));
        Self {
            settings,
            launcher,
            store,
            slots,
        }
    }

    /// Run one import and summarize it. Never fails: every error ends up in
    /// the report.
    pub async fn run(&self, request: ImportRequest) -> ImportReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("import", %run_id, key = %request.object_key);

        self.run_inner(run_id, request).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, request: ImportRequest) -> ImportReport {
        let started_at = Utc::now();
        let key = request.object_key.clone();

        if let Err(e) = request.validate() {
            tracing::warn!("Rejected import request: {}", e);
            return ImportReport::rejected(run_id, &key, started_at, &e);
        }

        let _slot = match self.slots.acquire().await {
            Ok(slot) => slot,
            Err(_) => {
                let e = Error::ui("import service is shutting down");
                return ImportReport::rejected(run_id, &key, started_at, &e);
            }
        };

        tracing::info!(
            "Starting import of s3://{}/{} as {}",
            self.store.bucket(),
            key,
            request.username
        );
        let mut session = match self.launcher.open().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Could not start browser: {}", e);
                return ImportReport::rejected(run_id, &key, started_at, &e);
            }
        };

        let workflow = ImportWorkflow::new(self.store.as_ref(), &self.settings);
        let outcome = workflow.run(session.as_mut(), &request).await;

        ImportReport::from_outcome(run_id, &key, started_at, &outcome)
    }
}

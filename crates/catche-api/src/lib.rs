// HTTP front end for Catch-e imports

mod error;
pub mod handlers;
mod importer;
mod server;

pub use error::{Error, Result};
pub use importer::{ImportService, SessionLauncher};
pub use server::{router, serve};

use catche_browser::ChromeLauncher;
use catche_core::Settings;
use catche_storage::S3ObjectStore;
use std::sync::Arc;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub importer: Arc<ImportService>,
}

impl AppState {
    pub fn new(importer: ImportService) -> Self {
        Self {
            importer: Arc::new(importer),
        }
    }
}

/// Wire the production service: S3 for objects, a local Chrome per run.
///
/// Fails when no Chrome binary can be found.
pub async fn import_service(settings: Settings) -> Result<ImportService> {
    let launcher = ChromeLauncher::from_settings(&settings)?;
    tracing::info!("Using Chrome at {}", launcher.chrome_path().display());
    let store = S3ObjectStore::from_settings(&settings).await;

    Ok(ImportService::new(
        settings,
        Arc::new(launcher),
        Arc::new(store),
    ))
}

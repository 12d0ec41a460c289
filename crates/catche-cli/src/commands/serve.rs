use anyhow::Result;
use catche_api::AppState;
use catche_core::Settings;

/// Start the HTTP API and block until shutdown
pub fn execute(mut settings: Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        settings.api_host = host;
    }
    if let Some(port) = port {
        settings.api_port = port;
    }

    let runtime = super::runtime()?;
    runtime.block_on(async {
        let host = settings.api_host.clone();
        let port = settings.api_port;

        tracing::info!(
            "Imports from bucket {} with interface code {}, up to {} at a time",
            settings.bucket,
            settings.interface_code,
            settings.max_concurrent_imports
        );
        let service = catche_api::import_service(settings).await?;
        catche_api::serve(AppState::new(service), &host, port).await?;

        Ok(())
    })
}

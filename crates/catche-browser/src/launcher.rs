use crate::{ChromeFinder, ChromeSession, Error, ProfileManager, Result};
use catche_core::Settings;
use catche_core::config::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Starts one Chrome per import run
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    headless: bool,
    request_timeout: Duration,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf) -> Self {
        Self {
            chrome_path,
            headless: true,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Resolve the binary from `CHROME_PATH` or the usual install locations
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let chrome_path = ChromeFinder::new(settings.chrome_path.clone()).find()?;
        Ok(Self::new(chrome_path).headless(settings.headless))
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn chrome_path(&self) -> &Path {
        &self.chrome_path
    }

    /// Launch Chrome on a fresh profile and open a blank page
    pub async fn launch(&self) -> Result<ChromeSession> {
        let profile = ProfileManager::temporary()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .user_data_dir(profile.path())
            .viewport(Viewport {
                width: VIEWPORT_WIDTH,
                height: VIEWPORT_HEIGHT,
                ..Viewport::default()
            })
            .request_timeout(self.request_timeout)
            .args(self.build_args());
        if !self.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Browser)?;

        tracing::info!(
            "Launching Chrome {} (headless: {})",
            self.chrome_path.display(),
            self.headless
        );
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))?;

        // The handler must be polled for any CDP command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(e.into());
            }
        };
        tracing::debug!("Chrome ready, profile at {}", profile.path().display());

        Ok(ChromeSession::new(browser, page, handler_task, profile))
    }

    /// Chrome command-line arguments beyond what the CDP launcher sets
    fn build_args(&self) -> Vec<String> {
        vec![
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-popup-blocking".to_string(),
            format!("--window-size={},{}", VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_launcher_builds_args() {
        let launcher = ChromeLauncher::new(PathBuf::from("/usr/bin/google-chrome"));

        let args = launcher.build_args();

        assert!(args.contains(&"--no-first-run".to_string()));
        assert!(args.contains(&"--no-default-browser-check".to_string()));
        assert!(args.contains(&"--disable-popup-blocking".to_string()));
        assert!(args.contains(&"--window-size=1536,960".to_string()));
    }

    #[test]
    fn test_headless_by_default() {
        let launcher = ChromeLauncher::new(PathBuf::from("/usr/bin/google-chrome"));
        assert!(launcher.headless);
        assert!(!launcher.headless(false).headless);
    }

    #[test]
    fn test_from_settings_reports_missing_chrome() {
        let settings = Settings {
            chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
            ..Settings::default()
        };

        let err = ChromeLauncher::from_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("Chrome not found"));
    }
}

//! Runtime settings read from the process environment.
//!
//! Every value has a default matching the production deployment, so an empty
//! environment yields a usable configuration. Values that are present but
//! cannot be parsed are rejected rather than silently replaced.

use crate::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BUCKET: &str = "fuel-invoices-receipt";
pub const DEFAULT_REGION: &str = "ap-southeast-2";
pub const DEFAULT_INTERFACE_CODE: &str = "CALNS";
pub const DEFAULT_API_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8000;

/// Browser viewport used for every run
pub const VIEWPORT_WIDTH: u32 = 1536;
pub const VIEWPORT_HEIGHT: u32 = 960;

/// Fixed waits and timeouts applied between workflow steps.
///
/// The pauses are timing heuristics for a third-party page whose load time
/// cannot be observed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTimings {
    /// Pause after hovering a menu so its dropdown can render
    pub menu_delay: Duration,
    /// Pause after filling the interface code
    pub code_settle: Duration,
    /// Pause after the search popup loads
    pub popup_settle: Duration,
    /// Pause after handing the file to the file chooser
    pub upload_settle: Duration,
    /// Upper bound for a page load
    pub load_timeout: Duration,
    /// Upper bound for a selector or popup to appear
    pub selector_timeout: Duration,
}

impl Default for WorkflowTimings {
    fn default() -> Self {
        Self {
            menu_delay: Duration::from_millis(1_000),
            code_settle: Duration::from_millis(5_000),
            popup_settle: Duration::from_millis(2_000),
            upload_settle: Duration::from_millis(3_000),
            load_timeout: Duration::from_millis(10_000),
            selector_timeout: Duration::from_millis(20_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores
    pub endpoint_url: Option<String>,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub api_host: String,
    pub api_port: u16,
    pub scratch_dir: PathBuf,
    pub interface_code: String,
    pub max_concurrent_imports: usize,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub timings: WorkflowTimings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            headless: true,
            chrome_path: None,
            api_host: DEFAULT_API_HOST.to_string(),
            api_port: DEFAULT_API_PORT,
            scratch_dir: std::env::temp_dir(),
            interface_code: DEFAULT_INTERFACE_CODE.to_string(),
            max_concurrent_imports: 1,
            log_level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            timings: WorkflowTimings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let bucket = var("S3_BUCKET_NAME").unwrap_or(defaults.bucket);
        if bucket.is_empty() {
            return Err(Error::config("S3_BUCKET_NAME must not be empty"));
        }

        let timings = WorkflowTimings {
            menu_delay: millis(&var, "MENU_DELAY_MS", defaults.timings.menu_delay)?,
            code_settle: millis(&var, "CODE_SETTLE_MS", defaults.timings.code_settle)?,
            popup_settle: millis(&var, "POPUP_SETTLE_MS", defaults.timings.popup_settle)?,
            upload_settle: millis(&var, "UPLOAD_SETTLE_MS", defaults.timings.upload_settle)?,
            load_timeout: millis(&var, "LOAD_TIMEOUT_MS", defaults.timings.load_timeout)?,
            selector_timeout: millis(
                &var,
                "SELECTOR_TIMEOUT_MS",
                defaults.timings.selector_timeout,
            )?,
        };

        let max_concurrent_imports: usize =
            parse(&var, "MAX_CONCURRENT_IMPORTS", defaults.max_concurrent_imports)?;
        if max_concurrent_imports == 0 {
            return Err(Error::config("MAX_CONCURRENT_IMPORTS must be at least 1"));
        }

        Ok(Self {
            bucket,
            region: var("AWS_REGION")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.region),
            endpoint_url: var("S3_ENDPOINT_URL").filter(|v| !v.is_empty()),
            headless: var("HEADLESS")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.headless),
            chrome_path: var("CHROME_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            api_host: var("API_HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_host),
            api_port: parse(&var, "API_PORT", defaults.api_port)?,
            scratch_dir: var("SCRATCH_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            interface_code: var("INTERFACE_CODE")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.interface_code),
            max_concurrent_imports,
            log_level: var("LOG_LEVEL")
                .filter(|v| !v.is_empty())
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.log_level),
            log_dir: var("LOG_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            timings,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| Error::config(format!("{} has an invalid value: '{}'", key, raw))),
        _ => Ok(default),
    }
}

fn millis<F>(var: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    let ms: u64 = parse(var, key, default_ms)?;
    Ok(Duration::from_millis(ms))
}

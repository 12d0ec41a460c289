pub mod commands;

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Crates whose logs are shown
const LOG_TARGETS: &[&str] = &[
    "catche",
    "catche_cli",
    "catche_core",
    "catche_api",
    "catche_browser",
    "catche_storage",
    "tower_http",
];

/// Prefix of the daily log files, e.g. `automation.2024-05-01`
pub const LOG_FILE_PREFIX: &str = "automation";

/// Filter directives for our crates at `level`; `--verbose` forces debug
pub fn filter_directives(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Log to stderr and to a daily file under `log_dir`.
///
/// Keep the returned guard alive for as long as logs should be flushed to the
/// file. When the directory cannot be used only stderr logging is installed.
pub fn init_logging(level: &str, verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(filter_directives(level, verbose))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info", verbose)));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir);

    let (file_layer, guard, file_error) = match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("File logging disabled ({}): {}", log_dir.display(), e);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_use_level() {
        let directives = filter_directives("warn", false);
        assert!(directives.contains("catche_core=warn"));
        assert!(directives.contains("tower_http=warn"));
        assert!(!directives.contains("chromiumoxide"));
    }

    #[test]
    fn test_verbose_forces_debug() {
        let directives = filter_directives("error", true);
        assert!(directives.split(',').all(|d| d.ends_with("=debug")));
    }

    #[test]
    fn test_directives_parse_as_filter() {
        assert!(EnvFilter::try_new(filter_directives("info", false)).is_ok());
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Download failed for '{key}': {reason}")]
    Download { key: String, reason: String },

    #[error("UI error: {0}")]
    Ui(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn ui(message: impl Into<String>) -> Self {
        Error::Ui(message.into())
    }

    pub fn download(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Download {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Coarse classification reported to API clients
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Download { .. } => ErrorKind::Download,
            Error::Ui(_) => ErrorKind::Ui,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Download,
    Ui,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Download => "download",
            ErrorKind::Ui => "ui",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(Error::config("no bucket").kind(), ErrorKind::Config);
        assert_eq!(Error::download("a.txt", "NoSuchKey").kind(), ErrorKind::Download);
        assert_eq!(Error::ui("timeout").kind(), ErrorKind::Ui);
    }

    #[test]
    fn test_download_error_message_names_key() {
        let err = Error::download("NS_test.txt", "object not found");
        assert_eq!(
            err.to_string(),
            "Download failed for 'NS_test.txt': object not found"
        );
    }
}

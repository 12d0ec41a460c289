use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out after {millis} ms waiting for {what}")]
    Timeout { what: String, millis: u128 },

    #[error("Script error: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<Error> for catche_core::Error {
    fn from(err: Error) -> Self {
        catche_core::Error::Ui(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Collapse into the single download failure the workflow reports
    pub fn into_download(self, key: &str) -> catche_core::Error {
        catche_core::Error::download(key, self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

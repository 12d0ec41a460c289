use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),

    #[error(transparent)]
    Import(#[from] catche_core::Error),

    #[error(transparent)]
    Browser(#[from] catche_browser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

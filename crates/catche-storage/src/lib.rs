// Object storage for files awaiting import

mod error;
mod s3;

pub use error::{Error, Result};
pub use s3::S3ObjectStore;

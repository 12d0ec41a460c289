use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use catche_core::{ObjectStore, Settings};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Reads import files from one S3 bucket
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the AWS default credential chain.
    ///
    /// A custom endpoint switches to path-style addressing, which S3-compatible
    /// stores expect.
    pub async fn from_settings(settings: &Settings) -> Self {
        tracing::info!(
            "S3 storage: bucket {} in region {}",
            settings.bucket,
            settings.region
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));
        if let Some(endpoint) = &settings.endpoint_url {
            tracing::info!("S3 storage: using custom endpoint {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.endpoint_url.is_some())
            .build();

        Self::new(Client::from_conf(s3_config), settings.bucket.clone())
    }

    /// Stream an object to disk chunk by chunk
    async fn fetch(&self, key: &str, destination: &Path) -> Result<u64> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(&self.bucket, key, e))?;

        let mut body = output.body;
        let mut file = tokio::fs::File::create(destination).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| Error::Transport(format!("reading body of {}: {}", key, e)))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

fn classify(bucket: &str, key: &str, err: SdkError<GetObjectError>) -> Error {
    let location = format!("s3://{}/{}", bucket, key);

    if let Some(service) = err.as_service_error() {
        if service.is_no_such_key() {
            return Error::NotFound(location);
        }
        match service.code() {
            Some("NoSuchBucket") | Some("NotFound") => return Error::NotFound(location),
            Some("AccessDenied") | Some("Forbidden") => return Error::AccessDenied(location),
            _ => {}
        }
    }

    Error::Transport(format!("{}: {}", location, DisplayErrorContext(&err)))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn download(&self, key: &str, destination: &Path) -> catche_core::Result<u64> {
        tracing::info!(
            "Downloading s3://{}/{} to {}",
            self.bucket,
            key,
            destination.display()
        );

        match self.fetch(key, destination).await {
            Ok(bytes) => {
                tracing::info!("Downloaded {} ({} bytes)", key, bytes);
                Ok(bytes)
            }
            Err(e) => {
                tracing::error!("S3 download of {} failed: {}", key, e);
                Err(e.into_download(key))
            }
        }
    }
}

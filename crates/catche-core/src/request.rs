use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Login page used when a request does not name one
pub const DEFAULT_LOGIN_URL: &str = "https://lendly.catch-e.net.au/core/login.phpo?i=&user_login=ben.lazzaro&screen_width=1536&screen_height=960";

/// A single import: whose account to use and which object to upload
#[derive(Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Key of the object to fetch from the bucket
    #[serde(default, alias = "s3_filename")]
    pub object_key: String,
}

impl ImportRequest {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        object_key: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            url: None,
            object_key: object_key.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The login URL, falling back to the production login page
    pub fn login_url(&self) -> &str {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_LOGIN_URL)
    }

    /// Check the request before any browser is started.
    ///
    /// Returns the parsed login URL.
    pub fn validate(&self) -> Result<Url> {
        if self.username.trim().is_empty() {
            return Err(Error::config("username must not be empty"));
        }
        if self.password.is_empty() {
            return Err(Error::config("password must not be empty"));
        }
        validate_object_key(&self.object_key)?;

        let url = Url::parse(self.login_url())
            .map_err(|e| Error::config(format!("invalid login URL: {}", e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::config(format!(
                "login URL must use http or https, got '{}'",
                other
            ))),
        }
    }
}

/// Object keys may carry a prefix, but no segment may escape the scratch
/// directory once the final segment is used as a file name.
fn validate_object_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::config("object key must not be empty"));
    }
    if key.contains('\\') || key.contains('\0') {
        return Err(Error::config(format!("object key '{}' is not allowed", key)));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(Error::config(format!(
            "object key '{}' must not contain '..' segments",
            key
        )));
    }
    match key.rsplit('/').next() {
        Some(name) if !name.is_empty() && name != "." => Ok(()),
        _ => Err(Error::config(format!(
            "object key '{}' does not name a file",
            key
        ))),
    }
}

impl fmt::Debug for ImportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .field("url", &self.login_url())
            .field("object_key", &self.object_key)
            .finish()
    }
}

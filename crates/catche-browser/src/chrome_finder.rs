use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Binary names looked up on `PATH` when no well-known location matches
const PATH_CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Locates the Chrome binary used for import runs
pub struct ChromeFinder {
    configured: Option<PathBuf>,
}

impl ChromeFinder {
    /// `configured` usually comes from `CHROME_PATH`; when set it is the only
    /// location considered.
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self { configured }
    }

    /// Resolve the Chrome binary
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.configured {
            return validate_executable(path);
        }

        if let Some(path) = Self::default_paths()
            .into_iter()
            .find(|p| validate_executable(p).is_ok())
        {
            return Ok(path);
        }

        for name in PATH_CANDIDATES {
            if let Ok(path) = which::which(name) {
                tracing::debug!("Chrome resolved from PATH as {}", path.display());
                return Ok(path);
            }
        }

        Err(Error::Browser(format!(
            "Chrome not found. Checked: {} and PATH entries {}. Set CHROME_PATH to specify location.",
            Self::default_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            PATH_CANDIDATES.join(", ")
        )))
    }

    fn default_paths() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/google-chrome-stable"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/snap/bin/chromium"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }
}

fn validate_executable(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(Error::Browser(format!(
            "Chrome not found at: {}",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)?.permissions().mode();
        if mode & 0o111 == 0 {
            return Err(Error::Browser(format!(
                "Chrome binary not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let temp = tempfile::NamedTempFile::new().unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let found = ChromeFinder::new(Some(temp.path().to_path_buf())).find().unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn test_missing_configured_path_is_an_error() {
        let err = ChromeFinder::new(Some(PathBuf::from("/nonexistent/chrome")))
            .find()
            .unwrap_err();

        assert!(err.to_string().contains("Chrome not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = ChromeFinder::new(Some(temp.path().to_path_buf()))
            .find()
            .unwrap_err();
        assert!(err.to_string().contains("not executable"));
    }

    #[test]
    fn test_directory_is_not_a_binary() {
        let temp = tempfile::tempdir().unwrap();
        assert!(ChromeFinder::new(Some(temp.path().to_path_buf())).find().is_err());
    }
}

use crate::Result;
use std::path::Path;
use tempfile::TempDir;

/// Chrome user-data directory private to one run.
///
/// Runs never share cookies or sessions; the directory is deleted on drop.
pub struct ProfileManager {
    dir: TempDir,
}

impl ProfileManager {
    pub fn temporary() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("catche-profile-")
            .tempdir()?;
        tracing::debug!("Created browser profile at {}", dir.path().display());

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_is_removed_on_drop() {
        let profile = ProfileManager::temporary().unwrap();
        let path = profile.path().to_path_buf();
        assert!(path.is_dir());

        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn test_profiles_are_distinct() {
        let a = ProfileManager::temporary().unwrap();
        let b = ProfileManager::temporary().unwrap();

        assert_ne!(a.path(), b.path());
        assert!(
            a.path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("catche-profile-")
        );
    }
}

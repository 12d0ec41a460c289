use crate::{Error, Result};
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

lazy_static! {
    /// Scratch paths currently owned by a run in this process
    static ref CLAIMED: Mutex<HashSet<PathBuf>> = Mutex::new(HashSet::new());
}

/// Local copy of a downloaded object, owned by exactly one run.
///
/// The file is removed by [`ScratchFile::remove`] or, failing that, on drop.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    released: bool,
}

impl ScratchFile {
    /// Where the object will be written: the scratch directory joined with the
    /// object's file name (the last segment of a prefixed key).
    pub fn path_for(scratch_dir: &Path, object_key: &str) -> Result<PathBuf> {
        let name = object_key
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .ok_or_else(|| {
                Error::config(format!("object key '{}' does not name a file", object_key))
            })?;
        Ok(scratch_dir.join(name))
    }

    /// Reserve the scratch path for this run and create the file.
    ///
    /// Fails if another run in this process holds the same path, or if a file
    /// already exists there. A file the run did not create is never touched.
    pub fn claim(scratch_dir: &Path, object_key: &str) -> Result<Self> {
        let path = Self::path_for(scratch_dir, object_key)?;

        {
            let mut claimed = CLAIMED
                .lock()
                .map_err(|_| Error::config("scratch registry is poisoned"))?;
            if !claimed.insert(path.clone()) {
                return Err(Error::config(format!(
                    "scratch path {} is in use by another import",
                    path.display()
                )));
            }
        }

        if let Err(e) = create_new(scratch_dir, &path) {
            unclaim(&path);
            return Err(e);
        }

        tracing::debug!("Claimed scratch file {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file and release the claim.
    ///
    /// Returns whether a file was actually removed.
    pub fn remove(mut self) -> io::Result<bool> {
        self.release()
    }

    fn release(&mut self) -> io::Result<bool> {
        if self.released {
            return Ok(false);
        }
        self.released = true;

        let removed = match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        };
        unclaim(&self.path);
        removed
    }
}

fn create_new(scratch_dir: &Path, path: &Path) -> Result<()> {
    std::fs::create_dir_all(scratch_dir).map_err(|e| {
        Error::config(format!(
            "cannot create scratch directory {}: {}",
            scratch_dir.display(),
            e
        ))
    })?;

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::config(format!(
            "scratch path {} already exists",
            path.display()
        ))),
        Err(e) => Err(Error::config(format!(
            "cannot create scratch file {}: {}",
            path.display(),
            e
        ))),
    }
}

fn unclaim(path: &Path) {
    if let Ok(mut claimed) = CLAIMED.lock() {
        claimed.remove(path);
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_scratch_dir_joined_with_file_name() {
        let dir = PathBuf::from("/var/tmp/scratch");

        assert_eq!(
            ScratchFile::path_for(&dir, "NS_test.txt").unwrap(),
            dir.join("NS_test.txt")
        );
        assert_eq!(
            ScratchFile::path_for(&dir, "2024/06/NS_test.txt").unwrap(),
            dir.join("NS_test.txt")
        );
        assert!(ScratchFile::path_for(&dir, "reports/").is_err());
    }

    #[test]
    fn test_claim_creates_and_remove_deletes() {
        let temp = tempfile::tempdir().unwrap();
        let file = ScratchFile::claim(temp.path(), "claim_remove.csv").unwrap();
        let path = file.path().to_path_buf();

        assert!(path.exists());
        assert!(file.remove().unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_deletes_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = {
            let file = ScratchFile::claim(temp.path(), "dropped.csv").unwrap();
            std::fs::write(file.path(), b"12,34").unwrap();
            file.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[test]
    fn test_concurrent_claims_of_same_path_conflict() {
        let temp = tempfile::tempdir().unwrap();
        let first = ScratchFile::claim(temp.path(), "contended.csv").unwrap();

        let err = ScratchFile::claim(temp.path(), "contended.csv").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("in use"));

        first.remove().unwrap();
        let again = ScratchFile::claim(temp.path(), "contended.csv").unwrap();
        again.remove().unwrap();
    }

    #[test]
    fn test_existing_file_is_left_alone() {
        let temp = tempfile::tempdir().unwrap();
        let existing = temp.path().join("report.pdf");
        std::fs::write(&existing, b"someone else's data").unwrap();

        let err = ScratchFile::claim(temp.path(), "report.pdf").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read(&existing).unwrap(), b"someone else's data");

        // The failed claim released the path
        std::fs::remove_file(&existing).unwrap();
        ScratchFile::claim(temp.path(), "report.pdf")
            .unwrap()
            .remove()
            .unwrap();
    }

    #[test]
    fn test_remove_tolerates_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = ScratchFile::claim(temp.path(), "vanished.csv").unwrap();
        std::fs::remove_file(file.path()).unwrap();

        assert!(!file.remove().unwrap());
    }
}

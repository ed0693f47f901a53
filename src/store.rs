//! Credential storage and the digest boundary
//!
//! A single fixed file, `~/.lockfile/pwd.bin`, holds exactly 32 raw bytes:
//! the SHA-256 digest of the authorized password. No header, no versioning.
//! A missing or unreadable file is a configuration error, not a retryable
//! condition; the lock has nothing to check against.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::config;

/// Size of a stored password digest.
pub const DIGEST_LEN: usize = 32;

/// A persisted one-way password digest.
pub type StoredDigest = [u8; DIGEST_LEN];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open credential file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read credential file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write credential file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Accessor for the on-disk digest under a fixed data directory.
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Store rooted at `~/.lockfile`.
    pub fn open_default() -> Result<Self> {
        let dir = config::data_dir().ok_or(StoreError::NoHome)?;
        Ok(Self { dir })
    }

    /// Store rooted at an arbitrary directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn digest_path(&self) -> PathBuf {
        self.dir.join("pwd.bin")
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join("termlock.log")
    }

    /// Create the storage directory if missing, with owner-only access.
    ///
    /// Idempotent; an already existing directory is success.
    pub fn ensure_storage_dir(&self) -> Result<()> {
        if self.dir.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)).map_err(
                |source| StoreError::CreateDir {
                    path: self.dir.clone(),
                    source,
                },
            )?;
        }
        info!(dir = %self.dir.display(), "created storage directory");
        Ok(())
    }

    /// Read the stored digest: exactly 32 bytes from the fixed path.
    pub fn load_digest(&self) -> Result<StoredDigest> {
        let path = self.digest_path();
        let mut file = File::open(&path).map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;
        let mut stored = [0u8; DIGEST_LEN];
        file.read_exact(&mut stored)
            .map_err(|source| StoreError::Read { path, source })?;
        Ok(stored)
    }

    /// Overwrite the stored digest with exactly 32 bytes.
    ///
    /// Present as a store capability; the interactive lock never calls it.
    /// An enrollment flow would.
    #[allow(dead_code)]
    pub fn save_digest(&self, stored: &StoredDigest) -> Result<()> {
        let path = self.digest_path();
        fs::write(&path, stored).map_err(|source| StoreError::Write { path, source })
    }
}

/// One-way digest over the given bytes.
pub fn digest(input: &[u8]) -> StoredDigest {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest(b"secret123"), digest(b"secret123"));
        assert_ne!(digest(b"secret123"), digest(b"secret124"));
        assert_ne!(digest(b""), digest(b"a"));
    }

    #[test]
    fn single_byte_change_breaks_equality() {
        let mut d = digest(b"secret123");
        let original = d;
        for i in 0..DIGEST_LEN {
            d[i] ^= 0x01;
            assert_ne!(d, original);
            d[i] ^= 0x01;
        }
        assert_eq!(d, original);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(tmp.path().join("data"));
        store.ensure_storage_dir().unwrap();

        let stored = digest(b"secret123");
        store.save_digest(&stored).unwrap();
        assert_eq!(store.load_digest().unwrap(), stored);

        // Same password still verifies, an edited one no longer does
        assert_eq!(digest(b"secret123"), store.load_digest().unwrap());
        assert_ne!(digest(b"Secret123"), store.load_digest().unwrap());
    }

    #[test]
    fn ensure_storage_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(tmp.path().join("data"));
        store.ensure_storage_dir().unwrap();
        store.ensure_storage_dir().unwrap();
        assert!(tmp.path().join("data").is_dir());
    }

    #[test]
    #[cfg(unix)]
    fn storage_dir_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(tmp.path().join("data"));
        store.ensure_storage_dir().unwrap();
        let mode = fs::metadata(tmp.path().join("data")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(tmp.path());
        let err = store.load_digest().unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }));
        assert!(err.to_string().contains("pwd.bin"));
    }

    #[test]
    fn truncated_file_is_a_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(tmp.path());
        fs::write(store.digest_path(), [0u8; 16]).unwrap();
        let err = store.load_digest().unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }
}

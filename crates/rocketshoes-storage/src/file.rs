//! # File Store
//!
//! One file per key inside a data directory.
//!
//! ## Default Location
//! - **Linux**: `~/.local/share/rocketshoes/`
//! - **macOS**: `~/Library/Application Support/com.rocketshoes.storefront/`
//! - **Windows**: `%APPDATA%\rocketshoes\storefront\data\`
//!
//! ## Write Path
//! ```text
//! set("@RocketShoes:cart", value)
//!      │
//!      ▼
//! write  <dir>/.%40RocketShoes%3Acart.tmp
//!      │
//!      ▼
//! rename → <dir>/%40RocketShoes%3Acart   (atomic on the same filesystem)
//! ```
//! A crash mid-write leaves the previous snapshot intact.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, trace};

use crate::error::{StorageError, StorageResult};
use crate::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::DirectoryUnavailable(format!("{}: {}", dir.display(), e))
        })?;

        debug!(dir = %dir.display(), "File store opened");
        Ok(FileStore { dir })
    }

    /// Opens a store in the platform data directory.
    pub fn open_default() -> StorageResult<Self> {
        let dir = Self::default_dir().ok_or_else(|| {
            StorageError::DirectoryUnavailable("could not determine data directory".to_string())
        })?;
        Self::open(dir)
    }

    /// Returns the platform data directory, if one can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "rocketshoes", "storefront").map(|d| d.data_dir().to_path_buf())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(encode_key(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", encode_key(key)));

        let write_err = |source| StorageError::WriteFailed {
            key: key.to_string(),
            path: path.clone(),
            source,
        };

        std::fs::write(&tmp, value).map_err(write_err)?;
        std::fs::rename(&tmp, &path).map_err(write_err)?;

        trace!(key, bytes = value.len(), "Value written");
        Ok(())
    }
}

/// Escapes a key into a portable file name.
///
/// ASCII letters, digits, `-`, `_` and `.` pass through; every other byte
/// becomes `%XX`, so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            // A leading dot would hide the file and collide with temp names.
            b'.' if !out.is_empty() => out.push('.'),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

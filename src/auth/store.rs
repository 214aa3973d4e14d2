//! Durable credential storage
//!
//! [`FileCredentialStore`] keeps the pair as a small JSON record. Writes go to
//! a temporary file in the same directory which is then renamed over the
//! target, so a reader sees either the old record or the new one and never a
//! half-written file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::auth::credentials::CredentialPair;
use crate::constants::files;
use crate::errors::{ConfigError, ConfigResult, StoreError, StoreResult};

/// Loads and saves the credential pair.
///
/// Implementations are expected to be fast and local; the bootstrap flow
/// calls them inline without a timeout.
pub trait CredentialStore: Send + Sync {
    /// Load the last saved pair.
    ///
    /// A store that was never written yields an empty pair rather than an
    /// error.
    fn load(&self) -> StoreResult<CredentialPair>;

    /// Persist a pair, replacing whatever was stored before
    fn save(&self, pair: &CredentialPair) -> StoreResult<()>;
}

/// JSON file credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user location
    pub fn default_location() -> ConfigResult<Self> {
        Ok(Self::new(default_credentials_path()?))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove the backing file. Returns whether a file was removed.
    pub fn clear(&self) -> StoreResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Removed credential file {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_temp(&self, dir: &Path, contents: &[u8]) -> StoreResult<NamedTempFile> {
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp.write_all(contents).map_err(write_error)?;
        temp.flush().map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(files::CREDENTIALS_FILE_PERMISSIONS);
            temp.as_file().set_permissions(perms).map_err(write_error)?;
        }

        Ok(temp)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> StoreResult<CredentialPair> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No credential file at {}, starting with empty tokens",
                    self.path.display()
                );
                return Ok(CredentialPair::empty());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let pair: CredentialPair =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!("Loaded credentials from {}: {:?}", self.path.display(), pair);
        Ok(pair)
    }

    fn save(&self, pair: &CredentialPair) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        let contents = serde_json::to_vec_pretty(pair)?;
        let temp = self.write_temp(&dir, &contents)?;

        temp.persist(&self.path)
            .map_err(|e| StoreError::Persist {
                path: self.path.clone(),
                source: e.error,
            })?;

        tracing::info!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}

/// Default credential file: `<config_dir>/tindermate/tokens.json`
pub fn default_credentials_path() -> ConfigResult<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir
        .join(files::APP_DIR_NAME)
        .join(files::CREDENTIALS_FILE_NAME))
}

//! file_store
//!
//! File-backed credential provider.
//!
//! The default provider on platforms without a native backend. Semantics
//! match the Windows provider: get of a missing pair is `NotFound`, add
//! overwrites, delete of a missing pair is `Unknown`.
//!
//! # Security
//!
//! - Credentials are stored in `~/.keyhold/secrets.toml`
//! - File permissions are set to 0600 on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)
//! - Read-modify-write cycles hold an advisory lock on a sibling `.lock`
//!   file, so concurrent writers never lose updates
//! - Passwords are NEVER logged, printed, or included in error messages

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::target::target_key;
use crate::traits::{Keychain, KeychainError};

/// On-disk schema of the credential file.
///
/// One table mapping target keys (`account@service`) to passwords.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    credentials: HashMap<String, String>,
}

/// Advisory lock over the credential file.
///
/// Held for the duration of a read-modify-write cycle so concurrent
/// writers (threads or processes) cannot lose each other's updates or
/// collide on the temp file. Released on drop (RAII), so the lock is
/// released even if the cycle panics.
struct StoreLock {
    file: File,
}

impl StoreLock {
    fn acquire(path: &Path) -> Result<Self, KeychainError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| KeychainError::Unknown(format!("cannot create directory: {e}")))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path.with_extension("lock"))
            .map_err(|e| KeychainError::Unknown(format!("cannot open lock file: {e}")))?;

        file.lock_exclusive()
            .map_err(|e| KeychainError::Unknown(format!("cannot lock credential file: {e}")))?;

        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// File-backed keychain.
///
/// Stores one TOML table mapping target keys (`account@service`) to
/// passwords. Persistence is machine-local: entries survive process exit
/// and logoff until deleted or overwritten, like the native providers.
///
/// # Example
///
/// ```ignore
/// use keyhold::{FileKeychain, Keychain};
///
/// let keychain = FileKeychain::new()?;
/// keychain.add_password("example.com", "alice", "s3cr3t!")?;
/// ```
#[derive(Debug)]
pub struct FileKeychain {
    /// Path to the credentials file
    path: PathBuf,
}

impl FileKeychain {
    /// Create a file keychain at the default location,
    /// `~/.keyhold/secrets.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, KeychainError> {
        let home = dirs::home_dir()
            .ok_or_else(|| KeychainError::Unknown("cannot determine home directory".into()))?;
        let path = home.join(".keyhold").join("secrets.toml");
        Ok(Self { path })
    }

    /// Create a file keychain at a custom path.
    ///
    /// This is primarily useful for testing.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path to the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries from the file.
    fn read_entries(&self) -> Result<HashMap<String, String>, KeychainError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = Zeroizing::new(
            fs::read_to_string(&self.path)
                .map_err(|e| KeychainError::Unknown(format!("cannot read credential file: {e}")))?,
        );

        // The parse error is not forwarded: toml errors quote the
        // offending line, which here would be a stored password.
        let parsed: CredentialFile = toml::from_str(&content)
            .map_err(|_| KeychainError::Unknown("cannot parse credential file".into()))?;

        Ok(parsed.credentials)
    }

    /// Write entries to the file with atomic rename and 0600 permissions.
    ///
    /// Callers must hold the [`StoreLock`] (which also guarantees the
    /// parent directory exists).
    fn write_entries(&self, credentials: HashMap<String, String>) -> Result<(), KeychainError> {
        let content = Zeroizing::new(
            toml::to_string_pretty(&CredentialFile { credentials })
                .map_err(|_| KeychainError::Unknown("cannot serialize credentials".into()))?,
        );

        // Write to a temp file first so a crash mid-write never leaves a
        // truncated credential file behind.
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| KeychainError::Unknown(format!("cannot create temp file: {e}")))?;

            // Restrict permissions BEFORE writing content (Unix only)
            #[cfg(unix)]
            {
                let permissions = fs::Permissions::from_mode(0o600);
                file.set_permissions(permissions).map_err(|e| {
                    KeychainError::Unknown(format!("cannot set permissions: {e}"))
                })?;
            }

            file.write_all(content.as_bytes())
                .map_err(|e| KeychainError::Unknown(format!("cannot write credentials: {e}")))?;

            file.sync_all()
                .map_err(|e| KeychainError::Unknown(format!("cannot sync to disk: {e}")))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| KeychainError::Unknown(format!("cannot rename temp file: {e}")))?;

        Ok(())
    }
}

impl Keychain for FileKeychain {
    fn add_password(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<(), KeychainError> {
        let target = target_key(service, account)?;
        let _lock = StoreLock::acquire(&self.path)?;
        let mut entries = self.read_entries()?;
        entries.insert(target, password.to_string());
        self.write_entries(entries)
    }

    fn get_password(&self, service: &str, account: &str) -> Result<String, KeychainError> {
        let target = target_key(service, account)?;
        // No lock needed: the rename in write_entries is atomic, so a
        // read sees either the old file or the new one, never a torn one.
        let entries = self.read_entries()?;
        entries
            .get(&target)
            .cloned()
            .ok_or(KeychainError::NotFound(target))
    }

    fn delete_password(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        let target = target_key(service, account)?;
        let _lock = StoreLock::acquire(&self.path)?;
        let mut entries = self.read_entries()?;
        if entries.remove(&target).is_none() {
            // Conflated with other delete failures, matching the native
            // providers' contract.
            return Err(KeychainError::Unknown(format!(
                "cannot delete credential '{target}'"
            )));
        }
        self.write_entries(entries)
    }
}

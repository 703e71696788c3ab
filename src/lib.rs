//! Keyhold - platform-native credential storage for Rust
//!
//! Keyhold stores, retrieves, and deletes secrets in a credential store,
//! keyed by a `(service, account)` pair. On Windows it talks directly to
//! the Credential Manager; elsewhere it falls back to a permission-locked
//! file store with identical semantics.
//!
//! # Architecture
//!
//! - [`traits`] - The [`Keychain`] capability interface and error types
//! - [`target`] - Target-key derivation (`account@service`)
//! - `windows_store` - Windows Credential Manager provider (Windows only)
//! - [`file_store`] - File-backed provider (default off Windows)
//! - [`memory_store`] - In-memory provider for tests and ephemeral use
//!
//! # Behavioral contract
//!
//! All providers share one contract:
//!
//! 1. Add followed by get returns the password byte-for-byte
//! 2. Get with no prior add fails with `NotFound`
//! 3. Add over an existing pair overwrites silently
//! 4. Delete of an absent pair fails with `Unknown` (conflated with
//!    other delete failures)
//! 5. A NUL byte in `service` or `account` fails with `InvalidValue`
//!    before the store is touched
//!
//! # Example
//!
//! ```ignore
//! use keyhold::new_keychain;
//!
//! let keychain = new_keychain()?;
//! keychain.add_password("example.com", "alice", "s3cr3t!")?;
//! let password = keychain.get_password("example.com", "alice")?;
//! keychain.delete_password("example.com", "alice")?;
//! ```

pub mod file_store;
pub mod memory_store;
pub mod target;
pub mod traits;

#[cfg(target_os = "windows")]
pub mod windows_store;

pub use file_store::FileKeychain;
pub use memory_store::MemoryKeychain;
pub use traits::{Keychain, KeychainError};

#[cfg(target_os = "windows")]
pub use windows_store::WindowsKeychain;

/// The provider selected by [`new_keychain`] on this platform.
#[cfg(target_os = "windows")]
pub const DEFAULT_PROVIDER: &str = "windows";

/// The provider selected by [`new_keychain`] on this platform.
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_PROVIDER: &str = "file";

/// Create the keychain appropriate to the running platform.
///
/// Windows gets the Credential Manager provider; every other platform
/// gets the file provider at its default location.
///
/// # Errors
///
/// Returns an error if the provider cannot be initialized (for the file
/// provider, when the home directory cannot be determined).
///
/// # Example
///
/// ```ignore
/// use keyhold::new_keychain;
///
/// let keychain = new_keychain()?;
/// keychain.add_password("example.com", "alice", "s3cr3t!")?;
/// ```
pub fn new_keychain() -> Result<Box<dyn Keychain>, KeychainError> {
    create_keychain(DEFAULT_PROVIDER)
}

/// Create a keychain for an explicitly named provider.
///
/// # Providers
///
/// - `"windows"`: Credential Manager (Windows builds only)
/// - `"file"`: [`FileKeychain`] at `~/.keyhold/secrets.toml`
/// - `"memory"`: [`MemoryKeychain`], nothing persisted
///
/// # Errors
///
/// - Unknown provider name
/// - Provider not available on this platform
/// - Initialization errors from the provider
pub fn create_keychain(provider: &str) -> Result<Box<dyn Keychain>, KeychainError> {
    match provider {
        #[cfg(target_os = "windows")]
        "windows" => Ok(Box::new(WindowsKeychain::new())),
        #[cfg(not(target_os = "windows"))]
        "windows" => Err(KeychainError::Unknown(
            "windows credential store is only available on Windows".into(),
        )),
        "file" => Ok(Box::new(FileKeychain::new()?)),
        "memory" => Ok(Box::new(MemoryKeychain::new())),
        other => Err(KeychainError::Unknown(format!(
            "unknown keychain provider: '{other}' (valid: windows, file, memory)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_memory_keychain() {
        let keychain = create_keychain("memory").expect("create memory keychain");
        keychain.add_password("svc", "alice", "pw").expect("add");
        assert_eq!(keychain.get_password("svc", "alice").expect("get"), "pw");
    }

    #[test]
    fn create_unknown_provider() {
        let result = create_keychain("vault");
        match result {
            Err(KeychainError::Unknown(msg)) => {
                assert!(msg.contains("unknown"));
                assert!(msg.contains("vault"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn windows_provider_unavailable_off_windows() {
        let result = create_keychain("windows");
        match result {
            Err(KeychainError::Unknown(msg)) => {
                assert!(msg.contains("Windows"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn default_provider_constant() {
        if cfg!(target_os = "windows") {
            assert_eq!(DEFAULT_PROVIDER, "windows");
        } else {
            assert_eq!(DEFAULT_PROVIDER, "file");
        }
    }

    #[test]
    fn new_keychain_builds_default_provider() {
        // Only checks construction; operations against the real default
        // store are exercised by the integration tests on isolated paths.
        let result = new_keychain();
        assert!(result.is_ok() || dirs::home_dir().is_none());
    }
}

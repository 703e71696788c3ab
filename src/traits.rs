//! traits
//!
//! Keychain capability interface and error types.
//!
//! # Design
//!
//! The `Keychain` trait defines the three-operation credential interface:
//! add, get, delete, all keyed by a `(service, account)` pair. Each
//! platform supplies one implementation; callers obtain one through
//! [`crate::new_keychain`] and never see platform handles.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include password values in error messages
//! - Store secrets only in the backing store, never in process-global state
//! - Be thread-safe (Send + Sync)
//!
//! # Example
//!
//! ```ignore
//! use keyhold::{Keychain, KeychainError};
//!
//! fn use_token(keychain: &dyn Keychain) -> Result<(), KeychainError> {
//!     let token = keychain.get_password("example.com", "alice")?;
//!     // Use token (never print it!)
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Errors from keychain operations.
///
/// Note: Error messages intentionally never include password values.
/// The target key (`account@service`) is not secret and may appear.
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Input could not be represented in the store's required encoding.
    ///
    /// Rust strings are UTF-8 by construction, so this is raised for the
    /// residual cases: an interior NUL byte in `service` or `account`
    /// (which cannot survive conversion to a NUL-terminated target name),
    /// or a stored payload that is not valid UTF-8 when read back.
    /// Always detected before any store mutation.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// No credential exists for the given (service, account) pair.
    /// Only returned by [`Keychain::get_password`].
    #[error("credential not found: {0}")]
    NotFound(String),

    /// The store rejected the request (permissions, quota, unavailable).
    /// Deleting an absent credential is also reported here.
    #[error("credential store error: {0}")]
    Unknown(String),
}

/// Trait for platform credential stores.
///
/// Implementations must be thread-safe (Send + Sync) and must never
/// log, print, or include password values in error messages.
///
/// # Keys
///
/// Credentials are keyed by a `(service, account)` pair, combined into a
/// single target key (`account@service`) before hitting the store. See
/// [`crate::target::target_key`] for the derivation and its caveats.
///
/// # Example
///
/// ```ignore
/// use keyhold::new_keychain;
///
/// let keychain = new_keychain()?;
///
/// keychain.add_password("example.com", "alice", "s3cr3t!")?;
/// let password = keychain.get_password("example.com", "alice")?;
/// keychain.delete_password("example.com", "alice")?;
/// ```
pub trait Keychain: Send + Sync {
    /// Store a password for the given (service, account) pair.
    ///
    /// Overwrites any existing password for the pair; no "already exists"
    /// error is surfaced.
    ///
    /// # Errors
    ///
    /// - [`KeychainError::InvalidValue`] if `service` or `account` contains
    ///   an interior NUL byte (checked before any store call)
    /// - [`KeychainError::Unknown`] if the store rejects the write
    fn add_password(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<(), KeychainError>;

    /// Retrieve the password for the given (service, account) pair.
    ///
    /// The credential is read, not removed.
    ///
    /// # Errors
    ///
    /// - [`KeychainError::InvalidValue`] for NUL-containing inputs or a
    ///   stored payload that is not valid UTF-8
    /// - [`KeychainError::NotFound`] if no credential exists for the pair
    ///
    /// # Security
    ///
    /// The returned value is the raw secret. Do not log or print it.
    fn get_password(&self, service: &str, account: &str) -> Result<String, KeychainError>;

    /// Delete the credential for the given (service, account) pair.
    ///
    /// Deleting an absent credential fails with [`KeychainError::Unknown`];
    /// this layer does not distinguish "already absent" from "deletion
    /// refused by the store".
    ///
    /// # Errors
    ///
    /// - [`KeychainError::InvalidValue`] for NUL-containing inputs
    /// - [`KeychainError::Unknown`] if the store refuses the deletion or
    ///   no credential exists for the pair
    fn delete_password(&self, service: &str, account: &str) -> Result<(), KeychainError>;
}

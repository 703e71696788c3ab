//! target
//!
//! Target-key derivation for credential lookups.
//!
//! Generic credentials are indexed by a single target-name string, not by
//! a `(target, username)` pair: the Windows store has a username field on
//! each record, but you cannot query on it, so it cannot disambiguate
//! multiple accounts under one service. The composite key synthesized
//! here is therefore the sole lookup key, and every provider uses it so
//! that credentials written on one platform are named identically on all
//! of them.

use crate::traits::KeychainError;

/// Derive the store target key for a (service, account) pair.
///
/// The key format is `account@service`. External tools inspecting the
/// store (for example the Windows credential manager UI) will show one
/// generic credential per pair under this synthesized name.
///
/// Callers that need the composite key to be unambiguous should keep `@`
/// out of account names; this function does not enforce that.
///
/// # Errors
///
/// Returns [`KeychainError::InvalidValue`] if `service` or `account`
/// contains an interior NUL byte. Such a key cannot be represented as the
/// NUL-terminated string the platform store requires, so the failure is
/// reported before any store call is made.
///
/// # Example
///
/// ```
/// use keyhold::target::target_key;
///
/// assert_eq!(target_key("example.com", "alice").unwrap(), "alice@example.com");
/// ```
pub fn target_key(service: &str, account: &str) -> Result<String, KeychainError> {
    for (name, value) in [("service", service), ("account", account)] {
        if value.contains('\0') {
            return Err(KeychainError::InvalidValue(format!(
                "{name} contains an interior NUL byte"
            )));
        }
    }
    Ok(format!("{account}@{service}"))
}

//! windows_store
//!
//! Windows Credential Manager provider.
//!
//! Talks directly to the Win32 credential APIs (`CredWriteW`, `CredReadW`,
//! `CredDeleteW`) rather than going through a cross-platform wrapper
//! crate. All unsafe code in the crate lives in this module.
//!
//! # Storage details
//!
//! - Credentials are written as `CRED_TYPE_GENERIC` entries under the
//!   composite target key from [`crate::target::target_key`].
//! - The password is stored as its raw UTF-8 bytes with an explicit byte
//!   length. It is not NUL-terminated and embedded NUL bytes round-trip.
//! - Persistence is `CRED_PERSIST_LOCAL_MACHINE`: entries survive process
//!   exit and user logoff until deleted or overwritten.
//!
//! The Win32 API takes a mutable string pointer (`PWSTR`) in the
//! `CREDENTIALW` struct but a const one (`PCWSTR`) for read and delete of
//! the same value; we match the bindings rather than forcing symmetry.

use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::FILETIME;
use windows::Win32::Security::Credentials::{
    CredDeleteW, CredFree, CredReadW, CredWriteW, CREDENTIALW, CRED_FLAGS,
    CRED_PERSIST_LOCAL_MACHINE, CRED_TYPE_GENERIC,
};
use zeroize::Zeroizing;

use crate::target::target_key;
use crate::traits::{Keychain, KeychainError};

/// Windows Credential Manager keychain.
///
/// Stateless; every call is a single blocking Win32 request. Concurrent
/// use relies on the credential manager's own serialization.
#[derive(Debug)]
pub struct WindowsKeychain;

impl WindowsKeychain {
    /// Create a new Windows keychain handle.
    pub fn new() -> Self {
        WindowsKeychain
    }
}

impl Default for WindowsKeychain {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned pointer to an OS-allocated credential record.
///
/// `CredReadW` hands back memory owned by the OS; it must be released
/// with `CredFree` exactly once, on every exit path. Drop guarantees
/// that regardless of how extraction proceeds.
struct CredentialHandle(*mut CREDENTIALW);

impl Drop for CredentialHandle {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { CredFree(self.0 as *const _) };
        }
    }
}

/// Convert to a NUL-terminated UTF-16 buffer for the Win32 W-APIs.
///
/// Interior NULs are rejected by `target_key` before this runs, so the
/// terminator appended here is unambiguous.
fn to_wide(text: &str) -> Vec<u16> {
    OsStr::new(text).encode_wide().chain(once(0)).collect()
}

impl Keychain for WindowsKeychain {
    fn add_password(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<(), KeychainError> {
        let target = target_key(service, account)?;
        let mut target_wide = to_wide(&target);

        // The blob is raw UTF-8 bytes with an explicit length, not a
        // NUL-terminated wide string; the store treats it as opaque.
        let credential = CREDENTIALW {
            Flags: CRED_FLAGS(0),
            Type: CRED_TYPE_GENERIC,
            TargetName: PWSTR(target_wide.as_mut_ptr()),
            Comment: PWSTR::null(),
            LastWritten: FILETIME::default(),
            CredentialBlobSize: password.len() as u32,
            CredentialBlob: password.as_ptr() as *mut u8,
            Persist: CRED_PERSIST_LOCAL_MACHINE,
            AttributeCount: 0,
            Attributes: std::ptr::null_mut(),
            TargetAlias: PWSTR::null(),
            UserName: PWSTR::null(),
        };

        // CredWrite overwrites an existing entry with the same target
        // name; no "already exists" error surfaces here.
        unsafe { CredWriteW(&credential, 0) }
            .map_err(|e| KeychainError::Unknown(format!("cannot write credential: {e}")))
    }

    fn get_password(&self, service: &str, account: &str) -> Result<String, KeychainError> {
        let target = target_key(service, account)?;
        let target_wide = to_wide(&target);

        let mut record = std::ptr::null_mut();
        if unsafe {
            CredReadW(
                PCWSTR::from_raw(target_wide.as_ptr()),
                CRED_TYPE_GENERIC,
                0,
                &mut record,
            )
        }
        .is_err()
        {
            return Err(KeychainError::NotFound(target));
        }

        let guard = CredentialHandle(record);
        let credential = unsafe { &*guard.0 };

        // Extract using the reported byte length; the blob is not
        // NUL-terminated and may contain NUL bytes.
        let bytes = if credential.CredentialBlob.is_null() || credential.CredentialBlobSize == 0 {
            Zeroizing::new(Vec::new())
        } else {
            let blob = unsafe {
                std::slice::from_raw_parts(
                    credential.CredentialBlob,
                    credential.CredentialBlobSize as usize,
                )
            };
            Zeroizing::new(blob.to_vec())
        };

        match std::str::from_utf8(&bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => Err(KeychainError::InvalidValue(format!(
                "credential '{target}' does not contain valid UTF-8"
            ))),
        }
    }

    fn delete_password(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        let target = target_key(service, account)?;
        let target_wide = to_wide(&target);

        // "Not found" and "deletion refused" are deliberately conflated;
        // the store does not give this layer a reliable way to separate
        // them and callers have not needed the distinction.
        unsafe { CredDeleteW(PCWSTR::from_raw(target_wide.as_ptr()), CRED_TYPE_GENERIC, 0) }
            .map_err(|e| KeychainError::Unknown(format!("cannot delete credential: {e}")))
    }
}

//! memory_store
//!
//! In-memory credential provider.
//!
//! Nothing is persisted: entries live for the lifetime of the value and
//! are gone on drop. Intended for tests and for embedders that want the
//! `Keychain` contract without touching any real store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::target::target_key;
use crate::traits::{Keychain, KeychainError};

/// In-memory keychain.
///
/// Semantics match the persistent providers: get of a missing pair is
/// `NotFound`, add overwrites, delete of a missing pair is `Unknown`.
#[derive(Debug, Default)]
pub struct MemoryKeychain {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeychain {
    /// Create an empty in-memory keychain.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, KeychainError> {
        self.entries
            .lock()
            .map_err(|e| KeychainError::Unknown(format!("lock poisoned: {e}")))
    }
}

impl Keychain for MemoryKeychain {
    fn add_password(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<(), KeychainError> {
        let target = target_key(service, account)?;
        self.locked()?.insert(target, password.to_string());
        Ok(())
    }

    fn get_password(&self, service: &str, account: &str) -> Result<String, KeychainError> {
        let target = target_key(service, account)?;
        self.locked()?
            .get(&target)
            .cloned()
            .ok_or(KeychainError::NotFound(target))
    }

    fn delete_password(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        let target = target_key(service, account)?;
        if self.locked()?.remove(&target).is_none() {
            return Err(KeychainError::Unknown(format!(
                "cannot delete credential '{target}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let keychain = MemoryKeychain::new();

        keychain
            .add_password("example.com", "alice", "s3cr3t!")
            .expect("add");
        assert_eq!(
            keychain.get_password("example.com", "alice").expect("get"),
            "s3cr3t!"
        );

        keychain
            .delete_password("example.com", "alice")
            .expect("delete");
        let err = keychain.get_password("example.com", "alice").unwrap_err();
        assert!(matches!(err, KeychainError::NotFound(_)));
    }

    #[test]
    fn overwrite_keeps_latest() {
        let keychain = MemoryKeychain::new();

        keychain.add_password("svc", "alice", "first").expect("add");
        keychain.add_password("svc", "alice", "second").expect("add");

        assert_eq!(keychain.get_password("svc", "alice").expect("get"), "second");
    }

    #[test]
    fn delete_missing_is_unknown() {
        let keychain = MemoryKeychain::new();

        let err = keychain.delete_password("svc", "nobody").unwrap_err();
        assert!(matches!(err, KeychainError::Unknown(_)));
    }

    #[test]
    fn embedded_nul_in_password_roundtrips() {
        // Passwords are opaque payloads; only service/account reject NULs.
        let keychain = MemoryKeychain::new();

        let password = "pa\0ss\0word";
        keychain.add_password("svc", "alice", password).expect("add");
        assert_eq!(
            keychain.get_password("svc", "alice").expect("get"),
            password
        );
    }

    #[test]
    fn nul_in_key_rejected() {
        let keychain = MemoryKeychain::new();

        let err = keychain.add_password("s\0vc", "alice", "pw").unwrap_err();
        assert!(matches!(err, KeychainError::InvalidValue(_)));

        // Nothing was stored under any cleaned-up variant of the key.
        let err = keychain.get_password("svc", "alice").unwrap_err();
        assert!(matches!(err, KeychainError::NotFound(_)));
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let keychain = Arc::new(MemoryKeychain::new());
        let mut handles = Vec::new();

        for i in 0..4 {
            let keychain = Arc::clone(&keychain);
            handles.push(std::thread::spawn(move || {
                let account = format!("user{i}");
                keychain.add_password("svc", &account, "pw").expect("add");
                keychain.get_password("svc", &account).expect("get")
            }));
        }

        for handle in handles {
            assert_eq!(handle.join().expect("join"), "pw");
        }
    }
}

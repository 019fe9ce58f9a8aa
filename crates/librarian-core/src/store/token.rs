/// Persistence of the bearer credential.
///
/// The production store is OS-backed:
/// - macOS: Keychain
/// - Linux: kernel keyutils
/// - Windows: Credential Manager
use keyring::Entry;
use std::sync::Mutex;

const SERVICE_NAME: &str = "com.librarian.tui-client";
const TOKEN_KEY: &str = "access_token";

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Key/value persistence for the token, nothing more. A missing token is a
/// normal state (`Ok(None)`), not an error; presence never implies validity.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, TokenStoreError>;
    fn set(&self, token: &str) -> Result<(), TokenStoreError>;
    fn delete(&self) -> Result<(), TokenStoreError>;
}

pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry() -> Result<Entry, TokenStoreError> {
        Ok(Entry::new(SERVICE_NAME, TOKEN_KEY)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>, TokenStoreError> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(TokenStoreError::Keyring(e)),
        }
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        Self::entry()?.set_password(token)?;
        Ok(())
    }

    fn delete(&self) -> Result<(), TokenStoreError> {
        match Self::entry()?.delete_credential() {
            Ok(()) => Ok(()),
            // Already deleted is success
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(TokenStoreError::Keyring(e)),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a token, for tests exercising the
    /// authenticated paths.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.get().unwrap().is_none());

        store.set("tok_12345").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok_12345"));

        store.delete().unwrap();
        assert!(store.get().unwrap().is_none());

        // Deleting an absent token is not an error
        store.delete().unwrap();
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryTokenStore::with_token("old");
        store.set("new").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("new"));
    }

    #[test]
    #[ignore] // Requires an OS keystore
    fn keyring_store_roundtrip() {
        let store = KeyringTokenStore;
        let _ = store.delete();

        assert!(store.get().unwrap().is_none());
        store.set("tok_keyring_test").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok_keyring_test"));

        store.delete().unwrap();
        assert!(store.get().unwrap().is_none());
    }
}

//! Secret resolution for profile values
//!
//! Profile secrets (secret key, session token) are stored inline or referenced
//! in the OS keyring as `keyring:<entry>` when the `secure-storage` feature is
//! enabled.

use super::error::{ConfigError, Result};

/// Prefix marking a value that lives in the keyring
const KEYRING_PREFIX: &str = "keyring:";

/// Keyring service name for ecendpoint entries
#[cfg(feature = "secure-storage")]
const SERVICE_NAME: &str = "ecendpoint";

/// Where new secrets get written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStorage {
    #[cfg(feature = "secure-storage")]
    Keyring,
    Plaintext,
}

/// Reads and writes profile secrets
#[derive(Debug)]
pub struct CredentialStore {
    storage: CredentialStorage,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Plaintext store; keyring references are still readable when the feature is on
    pub fn new() -> Self {
        Self {
            storage: CredentialStorage::Plaintext,
        }
    }

    /// Store that writes new secrets to the OS keyring
    #[cfg(feature = "secure-storage")]
    pub fn keyring() -> Self {
        Self {
            storage: CredentialStorage::Keyring,
        }
    }

    pub fn storage(&self) -> CredentialStorage {
        self.storage
    }

    /// Persist a secret, returning the value to write into the profile
    pub fn store_credential(&self, entry: &str, value: &str) -> Result<String> {
        match self.storage {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => {
                keyring::Entry::new(SERVICE_NAME, entry)
                    .and_then(|e| e.set_password(value))
                    .map_err(|e| {
                        ConfigError::KeyringError(format!("failed to store '{}': {}", entry, e))
                    })?;
                Ok(format!("{}{}", KEYRING_PREFIX, entry))
            }
            CredentialStorage::Plaintext => {
                let _ = entry;
                Ok(value.to_string())
            }
        }
    }

    /// Resolve a stored value: keyring references are looked up, anything
    /// else is returned as is
    pub fn get_credential(&self, value: &str) -> Result<String> {
        let Some(entry) = value.strip_prefix(KEYRING_PREFIX) else {
            return Ok(value.to_string());
        };

        #[cfg(feature = "secure-storage")]
        {
            keyring::Entry::new(SERVICE_NAME, entry)
                .and_then(|e| e.get_password())
                .map_err(|e| {
                    ConfigError::KeyringError(format!("failed to read '{}': {}", entry, e))
                })
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            Err(ConfigError::CredentialError(format!(
                "'{}' references the keyring but the secure-storage feature is not enabled",
                entry
            )))
        }
    }

    /// Remove a keyring entry referenced by `value`; plaintext values are ignored
    pub fn delete_credential(&self, value: &str) -> Result<()> {
        let Some(entry) = value.strip_prefix(KEYRING_PREFIX) else {
            return Ok(());
        };

        #[cfg(feature = "secure-storage")]
        {
            let handle = keyring::Entry::new(SERVICE_NAME, entry)
                .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
            match handle.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(ConfigError::KeyringError(format!(
                    "failed to delete '{}': {}",
                    entry, e
                ))),
            }
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            let _ = entry;
            Ok(())
        }
    }

    pub fn is_keyring_reference(value: &str) -> bool {
        value.starts_with(KEYRING_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_passthrough() {
        let store = CredentialStore::new();
        assert_eq!(store.get_credential("s3cr3t").unwrap(), "s3cr3t");
        assert_eq!(store.store_credential("prod-secret", "s3cr3t").unwrap(), "s3cr3t");
    }

    #[test]
    fn test_keyring_reference_detection() {
        assert!(CredentialStore::is_keyring_reference("keyring:prod-secret"));
        assert!(!CredentialStore::is_keyring_reference("prod-secret"));
        assert!(!CredentialStore::is_keyring_reference(""));
    }

    #[test]
    fn test_delete_plaintext_is_noop() {
        assert!(CredentialStore::new().delete_credential("plain").is_ok());
    }

    #[cfg(not(feature = "secure-storage"))]
    #[test]
    fn test_keyring_reference_without_feature_errors() {
        let err = CredentialStore::new()
            .get_credential("keyring:prod-secret")
            .unwrap_err();
        assert!(err.to_string().contains("secure-storage"));
    }
}

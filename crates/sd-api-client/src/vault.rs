//! Remember-me credentials.
//!
//! The email is kept in plaintext so a login form can be pre-filled; the
//! password is sealed with AES-256-GCM under a key derived from the configured
//! secret. Each sealed value is `base64([12-byte nonce][ciphertext+tag])`.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;
use std::fmt;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::storage::{KeyValueStore, StorageError, EMAIL_KEY, PASSWORD_KEY};

const NONCE_LEN: usize = 12;

/// Secret used to derive the remember-me key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub secret: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            secret: "staffdesk-remember-me".to_string(),
        }
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl VaultConfig {
    /// Reads `SD_VAULT_SECRET`.
    pub fn from_env() -> Self {
        env::var("SD_VAULT_SECRET")
            .map(|secret| Self { secret })
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret("vault secret"));
        }
        Ok(())
    }
}

/// Credentials saved by a remembered login.
#[derive(Clone, PartialEq, Eq)]
pub struct SavedCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SavedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reads and writes remembered credentials in a key/value store.
pub struct RememberMe {
    store: Arc<dyn KeyValueStore>,
    cipher: Aes256Gcm,
}

impl RememberMe {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &VaultConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let key = Sha256::digest(config.secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(key.as_slice())
            .map_err(|e| ConfigError::Invalid(format!("vault key: {e}")))?;
        Ok(Self { store, cipher })
    }

    /// Persist the email and the sealed password.
    pub fn remember(&self, email: &str, password: &str) -> Result<(), StorageError> {
        let sealed = self.seal(password)?;
        self.store.set(EMAIL_KEY, email)?;
        self.store.set(PASSWORD_KEY, &sealed)?;
        tracing::debug!(email = %email, "Remembered login credentials");
        Ok(())
    }

    /// Remove any remembered credentials.
    pub fn forget(&self) -> Result<(), StorageError> {
        self.store.remove(EMAIL_KEY)?;
        self.store.remove(PASSWORD_KEY)
    }

    /// Remembered credentials, if both halves are present.
    pub fn recall(&self) -> Result<Option<SavedCredentials>, StorageError> {
        let (Some(email), Some(sealed)) = (self.store.get(EMAIL_KEY)?, self.store.get(PASSWORD_KEY)?)
        else {
            return Ok(None);
        };
        let password = self.open(&sealed)?;
        Ok(Some(SavedCredentials { email, password }))
    }

    fn seal(&self, plaintext: &str) -> Result<String, StorageError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| StorageError::Crypto(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(nonce.as_slice());
        blob.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(blob))
    }

    fn open(&self, sealed: &str) -> Result<String, StorageError> {
        let blob = STANDARD
            .decode(sealed.trim())
            .map_err(|e| StorageError::Crypto(format!("sealed value is not base64: {e}")))?;
        if blob.len() <= NONCE_LEN {
            return Err(StorageError::Crypto("sealed value too short".into()));
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StorageError::Crypto("wrong secret or tampered value".into()))?;
        String::from_utf8(plaintext).map_err(|e| StorageError::Crypto(e.to_string()))
    }
}

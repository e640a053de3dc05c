//! At-rest encryption for PII columns and salted IP hashing.
//!
//! Voter phone numbers and EPIC identifiers are stored encrypted with
//! AES-256-GCM under a single server-side key. The wire format is
//! `base64(nonce || ciphertext || tag)` with a random 12-byte nonce per
//! value. Decryption with the wrong key or a truncated payload fails
//! loudly instead of returning garbage.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::{AppError, AppResult};

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Cipher for encrypted PII columns.
#[derive(Clone)]
pub struct DataCipher {
    key: [u8; 32],
}

impl std::fmt::Debug for DataCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCipher").finish_non_exhaustive()
    }
}

impl DataCipher {
    /// Build a cipher from a base64-encoded 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the key is not valid base64 or does
    /// not decode to exactly 32 bytes.
    pub fn from_base64_key(encoded: &str) -> AppResult<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| AppError::Config(format!("data key is not valid base64: {e}")))?;

        let key: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AppError::Config("data key must decode to 32 bytes".to_string()))?;

        Ok(Self { key })
    }

    /// Encrypt a value, returning `base64(nonce || ciphertext || tag)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encryption fails.
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| AppError::Internal(format!("AES-GCM encrypt: {e}")))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    /// Decrypt a value produced by [`DataCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the payload is not valid base64,
    /// is truncated, or fails authentication (wrong key or tampering).
    pub fn decrypt(&self, encoded: &str) -> AppResult<String> {
        let combined = STANDARD
            .decode(encoded)
            .map_err(|e| AppError::Internal(format!("base64 decode: {e}")))?;

        if combined.len() <= NONCE_LEN {
            return Err(AppError::Internal("ciphertext too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| AppError::Internal(format!("AES-GCM decrypt: {e}")))?;

        String::from_utf8(plaintext)
            .map_err(|e| AppError::Internal(format!("decrypted value is not UTF-8: {e}")))
    }
}

/// Hash a client IP with a server-side salt for the login audit trail.
///
/// The raw address is never stored; the hash is stable per salt so repeat
/// logins from the same address remain correlatable.
#[must_use]
pub fn hash_ip(salt: &str, ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_key() -> String {
        STANDARD.encode([7u8; 32])
    }

    #[test]
    fn test_round_trip() {
        let cipher = DataCipher::from_base64_key(&test_key()).unwrap();
        let encrypted = cipher.encrypt("9876543210").unwrap();

        assert_ne!(encrypted, "9876543210");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "9876543210");
    }

    #[test]
    fn test_nonce_varies_per_encryption() {
        let cipher = DataCipher::from_base64_key(&test_key()).unwrap();
        let a = cipher.encrypt("EPC1234567").unwrap();
        let b = cipher.encrypt("EPC1234567").unwrap();

        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a).unwrap(), cipher.decrypt(&b).unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let cipher = DataCipher::from_base64_key(&test_key()).unwrap();
        let other = DataCipher::from_base64_key(&STANDARD.encode([9u8; 32])).unwrap();

        let encrypted = cipher.encrypt("secret").unwrap();
        assert!(other.decrypt(&encrypted).is_err());
    }

    #[test]
    fn test_truncated_payload_fails() {
        let cipher = DataCipher::from_base64_key(&test_key()).unwrap();
        let encrypted = cipher.encrypt("secret").unwrap();

        let raw = STANDARD.decode(&encrypted).unwrap();
        let truncated = STANDARD.encode(&raw[..NONCE_LEN]);
        assert!(cipher.decrypt(&truncated).is_err());

        assert!(cipher.decrypt("not base64!!!").is_err());
    }

    #[test]
    fn test_bad_key_rejected() {
        assert!(DataCipher::from_base64_key("short").is_err());
        assert!(DataCipher::from_base64_key(&STANDARD.encode([1u8; 16])).is_err());
    }

    #[test]
    fn test_hash_ip_stable_and_salted() {
        let a = hash_ip("salt-a", "203.0.113.9");
        let b = hash_ip("salt-a", "203.0.113.9");
        let c = hash_ip("salt-b", "203.0.113.9");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}

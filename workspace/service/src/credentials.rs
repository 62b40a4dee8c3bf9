//! Password hashing and bearer token issuance.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{Result, ServiceError};

/// Hash a password using argon2id.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))
}

/// Verify a password against an encoded hash. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// A freshly generated bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Handed to the client, never stored
    pub plain: String,
    /// Stored in `access_tokens.token_hash`
    pub hash: String,
}

pub fn generate_token(num_bytes: usize) -> IssuedToken {
    let mut bytes = vec![0u8; num_bytes];
    rand::thread_rng().fill_bytes(&mut bytes);
    let plain = URL_SAFE_NO_PAD.encode(&bytes);
    let hash = hash_token(&plain);
    IssuedToken { plain, hash }
}

/// base64(sha256(token))
pub fn hash_token(token: &str) -> String {
    STANDARD.encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong horse battery", &hash));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn tokens_are_random_and_hashed() {
        let a = generate_token(32);
        let b = generate_token(32);
        assert_ne!(a.plain, b.plain);
        assert_eq!(a.plain.len(), 43);
        assert_eq!(a.hash, hash_token(&a.plain));
        assert_ne!(a.hash, a.plain);
        // 32 byte digest, padded base64
        assert_eq!(a.hash.len(), 44);
    }
}

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("failed to hash password")]
pub struct HashError;

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|_| HashError)?;
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| HashError)
}

/// Verify a password against a stored hash. Unparseable hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("1234567890").unwrap();
        let second = hash_password("1234567890").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("1234567890", "not-a-phc-string"));
        assert!(!verify_password("", ""));
    }
}

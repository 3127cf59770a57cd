//! Argon2 password hashing shared by the advertiser and admin credential
//! tables.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};

#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(String);

/// Hashes `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError(e.to_string()))
}

/// Returns false for a wrong password and for a hash that does not parse.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("senha123").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("senha123", &hash));
        assert!(!verify_password("senha124", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("senha123").unwrap();
        let b = hash_password("senha123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("senha123", "not-a-hash"));
        assert!(!verify_password("", ""));
    }
}

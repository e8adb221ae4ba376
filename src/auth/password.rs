//! Password hashing with Argon2id.

use crate::auth::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2Hasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Argon2id cost parameters. Fixed at the OWASP recommended minimum; not
/// user-tunable.
#[derive(Clone, Copy, Debug)]
pub struct PasswordConfig {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl PasswordConfig {
    /// Cheap parameters so tests do not burn CPU on hashing.
    #[cfg(any(test, debug_assertions))]
    #[must_use]
    pub fn fast() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PasswordHasher {
    config: PasswordConfig,
}

impl PasswordHasher {
    #[must_use]
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Hash a password into a PHC string with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Hashing` if parameters are rejected or hashing
    /// fails
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AuthError::Hashing(err.to_string()))
    }

    /// Verify a password against a stored PHC hash, constant-time.
    ///
    /// `Ok(false)` is a clean mismatch; any other verifier failure (for
    /// example a corrupt stored hash) is `AuthError::HashComparison`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HashComparison` if the stored hash cannot be
    /// parsed or compared
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| AuthError::HashComparison(err.to_string()))?;

        // Params come from the PHC string itself
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(AuthError::HashComparison(err.to_string())),
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            None,
        )
        .map_err(|err| AuthError::Hashing(err.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordConfig::fast())
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hasher = hasher();
        let hash = hasher.hash("correct horse battery staple").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hasher = hasher();
        let hash = hasher.hash("correct horse battery staple").unwrap();

        assert!(!hasher.verify("tr0ub4dor&3", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();

        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_garbage_hash_is_an_error() {
        let err = hasher().verify("password", "not-a-phc-string").unwrap_err();

        assert!(matches!(err, AuthError::HashComparison(_)));
    }
}

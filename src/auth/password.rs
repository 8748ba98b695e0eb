use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version};
use rand_core::OsRng;

use crate::config::AuthConfig;

/// One-way salted hashing of login passwords.
///
/// The work factor is fixed at construction from [`AuthConfig`]; every call
/// to [`Self::hash`] draws a fresh salt, so equal passwords produce distinct
/// PHC strings.
#[derive(Clone)]
#[must_use]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(config: &AuthConfig) -> Result<Self, argon2::Error> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Ok(Self { argon2 })
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self.argon2.hash_password(plaintext.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Constant-time check of `plaintext` against a stored PHC string.
    /// Anything that fails to parse as a hash simply does not match.
    #[must_use]
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::try_from(stored_hash) else {
            tracing::debug!("Stored password hash failed to parse");
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

use crate::types::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Password digest service.
///
/// Digests are Argon2id PHC strings. The configured cost is the Argon2 time
/// cost; memory and parallelism stay at the library defaults.
pub struct PasswordService {
    params: Params,
    dummy_hash: String,
}

impl PasswordService {
    /// Creates a new PasswordService with the given time cost.
    ///
    /// A throwaway digest is computed up front so that lookups of unknown
    /// users can be verified at the same cost as real ones.
    pub fn new(cost: u32) -> Result<Self> {
        let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| AppError::Configuration(format!("Invalid hash cost {}: {}", cost, e)))?;

        let mut service = Self {
            params,
            dummy_hash: String::new(),
        };
        service.dummy_hash = service.hash("jobly-dummy-password")?;

        Ok(service)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password using Argon2id with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verifies a password against a stored digest.
    ///
    /// A digest that cannot be parsed verifies as `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Rejecting malformed password digest: {}", e);
                return false;
            }
        };

        // Parameters come from the digest itself, so older costs still verify.
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Burns one verification against the throwaway digest. Always `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }
}

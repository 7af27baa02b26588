//! Credential hashing
//!
//! Passwords are stored as bcrypt strings (`$2b$<cost>$<salt+digest>`).
//! The scheme sits behind [`CredentialHasher`] so callers never see it.

use crate::models::Password;

/// Work factor used by the server
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Hashing could not produce a stored credential
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Hashes and verifies staff passwords
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &Password) -> Result<String, HashError>;

    /// Check a candidate against a stored hash. Malformed hashes never verify.
    fn verify(&self, candidate: &str, stored: &str) -> bool;
}

/// bcrypt with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// `cost` outside bcrypt's 4..=31 makes every `hash` call fail.
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::with_cost(DEFAULT_BCRYPT_COST)
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, password: &Password) -> Result<String, HashError> {
        Ok(bcrypt::hash(password.expose(), self.cost)?)
    }

    fn verify(&self, candidate: &str, stored: &str) -> bool {
        match bcrypt::verify(candidate, stored) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is unreadable");
                false
            }
        }
    }
}

//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashingError {
        /// Hashing or hash parsing failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes and verifies passwords.
///
/// Implementations may be CPU heavy and should keep that work off the async
/// executor threads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash suitable for storage.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashingError>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`.
    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashingError>;
}

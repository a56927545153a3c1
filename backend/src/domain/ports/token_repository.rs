//! Port for API token storage.

use async_trait::async_trait;

use crate::domain::{AuthToken, TokenKey, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum TokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
        /// The user already holds a token.
        AlreadyExists { user_id: String } => "user {user_id} already has a token",
    }
}

/// Storage for one token per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Fetch the token issued to a user, if any.
    async fn find_by_user(&self, user_id: &UserId)
    -> Result<Option<AuthToken>, TokenPersistenceError>;

    /// Store a newly issued token.
    ///
    /// Fails with [`TokenPersistenceError::AlreadyExists`] if the user already
    /// holds one; callers re-read the winner in that case.
    async fn insert(&self, token: &AuthToken) -> Result<(), TokenPersistenceError>;

    /// Resolve a presented key to its owner.
    async fn find_user_by_key(&self, key: &TokenKey) -> Result<Option<User>, TokenPersistenceError>;
}

//! Driving port for account management and token authentication.
//!
//! Inbound adapters call this port without knowing how users, tokens or
//! password hashes are stored, so handler tests can swap in doubles.

use async_trait::async_trait;

use crate::domain::{
    AuthToken, Error, LoginCredentials, NewUser, ProfileUpdate, TokenKey, User, UserId,
};

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create an active, unprivileged account.
    async fn create_user(&self, new_user: NewUser) -> Result<User, Error>;

    /// Create an active account with staff and superuser flags set.
    async fn create_super_user(&self, new_user: NewUser) -> Result<User, Error>;

    /// Check credentials and return the user's token, issuing one on first
    /// use.
    async fn obtain_token(&self, credentials: LoginCredentials) -> Result<AuthToken, Error>;

    /// Resolve a presented token key to an active user.
    async fn authenticate(&self, key: &TokenKey) -> Result<User, Error>;

    /// Apply changes to the user's own profile.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error>;
}

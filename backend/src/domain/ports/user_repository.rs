//! Driven port for account storage.

use async_trait::async_trait;

use crate::domain::{Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Account storage failures.
    pub enum UserPersistenceError {
        /// The store was unreachable.
        Connection { message: String } => "user store unavailable: {message}",
        /// The statement itself failed.
        Query { message: String } => "user store query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
        /// The user to update does not exist.
        NotFound { id: String } => "user {id} not found",
    }
}

/// Storage for user accounts.
///
/// Email addresses are unique; adapters must report collisions as
/// [`UserPersistenceError::DuplicateEmail`] rather than a generic query
/// failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite an existing user record.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Look up by primary key.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;
}

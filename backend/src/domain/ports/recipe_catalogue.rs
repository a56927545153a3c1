//! Driving ports for the caller's own tags and ingredients.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, ItemName, Tag, UserId};

/// Tag use-cases scoped to the authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagCatalogue: Send + Sync {
    /// Tags owned by `owner`.
    async fn list(&self, owner: &UserId) -> Result<Vec<Tag>, Error>;

    /// Create a tag owned by `owner`.
    async fn create(&self, owner: &UserId, name: ItemName) -> Result<Tag, Error>;
}

/// Ingredient use-cases scoped to the authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientCatalogue: Send + Sync {
    /// Ingredients owned by `owner`.
    async fn list(&self, owner: &UserId) -> Result<Vec<Ingredient>, Error>;

    /// Create an ingredient owned by `owner`.
    async fn create(&self, owner: &UserId, name: ItemName) -> Result<Ingredient, Error>;
}

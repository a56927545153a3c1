//! Ports for tag and ingredient persistence.
//!
//! Both repositories share one error type: they differ only in the table
//! they touch.

use async_trait::async_trait;

use crate::domain::{Ingredient, NewIngredient, NewTag, Tag, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag and ingredient repository adapters.
    pub enum RecipeItemPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe item repository query failed: {message}",
    }
}

/// Storage for user-scoped tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Tags owned by `user_id`, ordered by name descending.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Tag>, RecipeItemPersistenceError>;

    /// Persist a tag and return it with its assigned identifier.
    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipeItemPersistenceError>;
}

/// Storage for user-scoped ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Ingredients owned by `user_id`, ordered by name descending.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Ingredient>, RecipeItemPersistenceError>;

    /// Persist an ingredient and return it with its assigned identifier.
    async fn create(
        &self,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, RecipeItemPersistenceError>;
}

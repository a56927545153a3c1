//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IngredientCatalogue, TagCatalogue, UserAccounts};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account creation, tokens and profiles.
    pub accounts: Arc<dyn UserAccounts>,
    /// The caller's tags.
    pub tags: Arc<dyn TagCatalogue>,
    /// The caller's ingredients.
    pub ingredients: Arc<dyn IngredientCatalogue>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use recipe_backend::domain::{IngredientService, TagService, UserAccountService};
    /// use recipe_backend::inbound::http::state::HttpState;
    /// use recipe_backend::outbound::crypto::Argon2PasswordHasher;
    /// use recipe_backend::outbound::memory::{InMemoryAccounts, InMemoryRecipeItems};
    ///
    /// let accounts = Arc::new(InMemoryAccounts::new());
    /// let items = Arc::new(InMemoryRecipeItems::new());
    /// let hasher = Arc::new(Argon2PasswordHasher::new().expect("default params"));
    /// let state = HttpState::new(
    ///     Arc::new(UserAccountService::new(accounts.clone(), accounts, hasher)),
    ///     Arc::new(TagService::new(items.clone())),
    ///     Arc::new(IngredientService::new(items)),
    /// );
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(
        accounts: Arc<dyn UserAccounts>,
        tags: Arc<dyn TagCatalogue>,
        ingredients: Arc<dyn IngredientCatalogue>,
    ) -> Self {
        Self {
            accounts,
            tags,
            ingredients,
        }
    }
}

//! Builders wiring driving ports to Diesel or in-memory adapters.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use recipe_backend::domain::ports::{
    IngredientRepository, PasswordHasher, PasswordHashingError, TagRepository, TokenRepository,
    UserRepository,
};
use recipe_backend::domain::{IngredientService, TagService, UserAccountService};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::crypto::Argon2PasswordHasher;
use recipe_backend::outbound::memory::{InMemoryAccounts, InMemoryRecipeItems};
use recipe_backend::outbound::persistence::{
    DbPool, DieselIngredientRepository, DieselTagRepository, DieselTokenRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Repository handles backing the driving ports.
struct Repositories {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    tags: Arc<dyn TagRepository>,
    ingredients: Arc<dyn IngredientRepository>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tokens: Arc::new(DieselTokenRepository::new(pool.clone())),
            tags: Arc::new(DieselTagRepository::new(pool.clone())),
            ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
        }
    }

    fn in_memory() -> Self {
        let accounts = Arc::new(InMemoryAccounts::new());
        let items = Arc::new(InMemoryRecipeItems::new());
        Self {
            users: accounts.clone(),
            tokens: accounts,
            tags: items.clone(),
            ingredients: items,
        }
    }
}

fn build_state(repositories: Repositories, hasher: Arc<dyn PasswordHasher>) -> HttpState {
    let Repositories {
        users,
        tokens,
        tags,
        ingredients,
    } = repositories;
    HttpState::new(
        Arc::new(UserAccountService::new(users, tokens, hasher)),
        Arc::new(TagService::new(tags)),
        Arc::new(IngredientService::new(ingredients)),
    )
}

/// Build HTTP state from the configured adapters.
///
/// Uses Diesel repositories when a pool is available; otherwise falls back to
/// in-memory storage, which loses all data on restart.
///
/// # Errors
///
/// Returns [`PasswordHashingError`] if the Argon2 parameters are rejected.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, PasswordHashingError> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new()?);
    let repositories = match &config.db_pool {
        Some(pool) => Repositories::diesel(pool),
        None => {
            warn!("no database configured; accounts and recipe items are held in memory");
            Repositories::in_memory()
        }
    };
    Ok(web::Data::new(build_state(repositories, hasher)))
}

#[cfg(test)]
mod tests {
    //! Wiring checks for the in-memory fallback.

    use super::*;
    use recipe_backend::domain::{Email, ItemName, NewUser, Password, UserName};
    use rstest::rstest;
    use std::net::SocketAddr;

    #[rstest]
    #[tokio::test]
    async fn in_memory_state_shares_one_account_store() {
        let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));
        let state = build_http_state(&config).expect("state");

        let user = state
            .accounts
            .create_user(NewUser::new(
                Email::new("cook@example.com").expect("email"),
                UserName::new("Cook").expect("name"),
                Password::new("secret123").expect("password"),
            ))
            .await
            .expect("user");
        let tag = state
            .tags
            .create(user.id(), ItemName::new("Vegan").expect("item name"))
            .await
            .expect("tag");

        let listed = state.tags.list(user.id()).await.expect("tags");
        assert_eq!(listed, vec![tag]);
    }
}

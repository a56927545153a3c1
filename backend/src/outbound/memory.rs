//! In-process adapters used when no database is configured and in tests.
//!
//! State lives behind a `std::sync::Mutex`; no lock is held across an await.
//! Constraint behaviour (unique email, one token per user) mirrors the
//! PostgreSQL schema so services see the same errors from either adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    IngredientRepository, RecipeItemPersistenceError, TagRepository, TokenPersistenceError,
    TokenRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthToken, Email, Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId, TokenKey, User,
    UserId, listing_order,
};

#[derive(Default)]
struct AccountState {
    users: HashMap<UserId, User>,
    tokens: HashMap<UserId, AuthToken>,
}

/// User and token storage held in memory.
#[derive(Default)]
pub struct InMemoryAccounts {
    state: Mutex<AccountState>,
}

impl InMemoryAccounts {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(
        &self,
        poisoned: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, AccountState>, E> {
        self.state
            .lock()
            .map_err(|_| poisoned("in-memory account store poisoned"))
    }
}

fn email_taken(state: &AccountState, email: &Email, except: Option<&UserId>) -> bool {
    state
        .users
        .values()
        .any(|user| user.email() == email && Some(user.id()) != except)
}

#[async_trait]
impl UserRepository for InMemoryAccounts {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if email_taken(&state, user.email(), None) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if !state.users.contains_key(user.id()) {
            return Err(UserPersistenceError::not_found(user.id().to_string()));
        }
        if email_taken(&state, user.email(), Some(user.id())) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.values().find(|user| user.email() == email).cloned())
    }
}

#[async_trait]
impl TokenRepository for InMemoryAccounts {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AuthToken>, TokenPersistenceError> {
        let state = self.lock(TokenPersistenceError::query)?;
        Ok(state.tokens.get(user_id).cloned())
    }

    async fn insert(&self, token: &AuthToken) -> Result<(), TokenPersistenceError> {
        let mut state = self.lock(TokenPersistenceError::query)?;
        if state.tokens.contains_key(token.user_id()) {
            return Err(TokenPersistenceError::already_exists(token.user_id().to_string()));
        }
        if !state.users.contains_key(token.user_id()) {
            return Err(TokenPersistenceError::query("token owner does not exist"));
        }
        state.tokens.insert(*token.user_id(), token.clone());
        Ok(())
    }

    async fn find_user_by_key(
        &self,
        key: &TokenKey,
    ) -> Result<Option<User>, TokenPersistenceError> {
        let state = self.lock(TokenPersistenceError::query)?;
        Ok(state
            .tokens
            .values()
            .find(|token| token.key() == key)
            .and_then(|token| state.users.get(token.user_id()))
            .cloned())
    }
}

/// Tag and ingredient storage held in memory.
///
/// Identifiers come from one counter per table, starting at 1.
pub struct InMemoryRecipeItems {
    tags: Mutex<Vec<Tag>>,
    ingredients: Mutex<Vec<Ingredient>>,
    next_tag_id: AtomicI64,
    next_ingredient_id: AtomicI64,
}

impl Default for InMemoryRecipeItems {
    fn default() -> Self {
        Self {
            tags: Mutex::new(Vec::new()),
            ingredients: Mutex::new(Vec::new()),
            next_tag_id: AtomicI64::new(1),
            next_ingredient_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryRecipeItems {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> RecipeItemPersistenceError {
    RecipeItemPersistenceError::query("in-memory recipe store poisoned")
}

#[async_trait]
impl TagRepository for InMemoryRecipeItems {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Tag>, RecipeItemPersistenceError> {
        let tags = self.tags.lock().map_err(poisoned)?;
        let mut owned: Vec<Tag> = tags.iter().filter(|t| t.user_id() == user_id).cloned().collect();
        owned.sort_by(|a, b| listing_order((a.name(), a.id()), (b.name(), b.id())));
        Ok(owned)
    }

    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipeItemPersistenceError> {
        let id = TagId::new(self.next_tag_id.fetch_add(1, Ordering::Relaxed));
        let created = Tag::new(id, tag.user_id, tag.name.clone());
        self.tags.lock().map_err(poisoned)?.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl IngredientRepository for InMemoryRecipeItems {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Ingredient>, RecipeItemPersistenceError> {
        let ingredients = self.ingredients.lock().map_err(poisoned)?;
        let mut owned: Vec<Ingredient> = ingredients
            .iter()
            .filter(|i| i.user_id() == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| listing_order((a.name(), a.id()), (b.name(), b.id())));
        Ok(owned)
    }

    async fn create(
        &self,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, RecipeItemPersistenceError> {
        let id = IngredientId::new(self.next_ingredient_id.fetch_add(1, Ordering::Relaxed));
        let created = Ingredient::new(id, ingredient.user_id, ingredient.name.clone());
        self.ingredients.lock().map_err(poisoned)?.push(created.clone());
        Ok(created)
    }
}

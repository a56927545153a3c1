//! PostgreSQL-backed `TokenRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TokenPersistenceError, TokenRepository};
use crate::domain::{AuthToken, TokenKey, User, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AuthTokenRow, NewAuthTokenRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users};

/// Diesel-backed implementation of the `TokenRepository` port.
#[derive(Clone)]
pub struct DieselTokenRepository {
    pool: DbPool,
}

impl DieselTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenPersistenceError {
    map_basic_pool_error(error, TokenPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenPersistenceError {
    map_basic_diesel_error(
        error,
        TokenPersistenceError::query,
        TokenPersistenceError::connection,
    )
}

fn row_to_token(row: AuthTokenRow) -> Result<AuthToken, TokenPersistenceError> {
    let key = TokenKey::parse(&row.key)
        .map_err(|err| TokenPersistenceError::query(format!("stored token invalid: {err}")))?;
    Ok(AuthToken::new(key, UserId::from_uuid(row.user_id)))
}

fn row_to_owner(row: UserRow) -> Result<User, TokenPersistenceError> {
    User::try_from(row)
        .map_err(|err| TokenPersistenceError::query(format!("stored user invalid: {err}")))
}

#[async_trait]
impl TokenRepository for DieselTokenRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AuthToken>, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AuthTokenRow> = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user_id.as_uuid()))
            .select(AuthTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_token).transpose()
    }

    async fn insert(&self, token: &AuthToken) -> Result<(), TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAuthTokenRow {
            key: token.key().as_str(),
            user_id: *token.user_id().as_uuid(),
        };

        diesel::insert_into(auth_tokens::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, Some("auth_tokens_user_id_key")) {
                    TokenPersistenceError::already_exists(token.user_id().to_string())
                } else if is_unique_violation(&err, None) {
                    // 160 random bits colliding is not expected in practice.
                    warn!("token key collision on insert");
                    TokenPersistenceError::query("token key collision")
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_user_by_key(
        &self,
        key: &TokenKey,
    ) -> Result<Option<User>, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::key.eq(key.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_owner).transpose()
    }
}

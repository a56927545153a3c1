//! Diesel row shapes for the four tables. Conversions into domain types
//! revalidate every field, so a corrupt row fails loudly instead of
//! leaking past the adapter.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Email, PasswordHash, User, UserId, UserName, UserParts, UserValidationError};

use super::schema::{auth_tokens, ingredients, tags, users};

/// `users` row as selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::restore(UserParts {
            id: UserId::from_uuid(row.id),
            email: Email::new(&row.email)?,
            name: UserName::new(&row.name)?,
            password_hash: PasswordHash::new(row.password_hash),
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        }))
    }
}

/// `users` row for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Mutable `users` columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// ---------------------------------------------------------------------------
// Token models
// ---------------------------------------------------------------------------

/// Row struct for reading from the auth_tokens table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = auth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthTokenRow {
    pub key: String,
    pub user_id: Uuid,
}

/// Insertable struct for issuing a token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub key: &'a str,
    pub user_id: Uuid,
}

// ---------------------------------------------------------------------------
// Recipe item models
// ---------------------------------------------------------------------------

/// Row struct for reading from the tags table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
}

/// Insertable struct for creating tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
}

/// Insertable struct for creating ingredients.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
}

//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Types validate on construction; document invariants and serialisation
//! contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - User, NewUser, ProfileUpdate: account aggregate and its inputs.
//! - AuthToken, TokenKey, LoginCredentials: token authentication.
//! - Tag, Ingredient, ItemName: user-owned recipe attributes.
//! - UserAccountService, TagService, IngredientService: port implementations.

pub mod auth;
pub mod error;
pub mod ports;
pub mod recipe;
pub mod recipe_catalogue_service;
pub mod trace_id;
pub mod user;
pub mod user_accounts_service;

pub use self::auth::{
    AuthToken, LoginCredentials, TOKEN_KEY_LENGTH, TokenKey, TokenKeyValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::recipe::{
    ITEM_NAME_MAX, Ingredient, IngredientId, ItemName, ItemNameValidationError, NewIngredient,
    NewTag, Tag, TagId, listing_order,
};
pub use self::recipe_catalogue_service::{IngredientService, TagService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, PASSWORD_MIN_LENGTH, Password, PasswordHash, Privileges, ProfileUpdate,
    USER_FIELD_MAX, User, UserId, UserName, UserParts, UserValidationError,
};
pub use self::user_accounts_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

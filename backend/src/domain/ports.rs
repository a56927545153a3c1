//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing) are implemented by outbound adapters;
//! driving ports (accounts, catalogues) are called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod recipe_catalogue;
mod recipe_repositories;
mod token_repository;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHashingError};
#[cfg(test)]
pub use recipe_catalogue::{MockIngredientCatalogue, MockTagCatalogue};
pub use recipe_catalogue::{IngredientCatalogue, TagCatalogue};
#[cfg(test)]
pub use recipe_repositories::{MockIngredientRepository, MockTagRepository};
pub use recipe_repositories::{IngredientRepository, RecipeItemPersistenceError, TagRepository};
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::{TokenPersistenceError, TokenRepository};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};

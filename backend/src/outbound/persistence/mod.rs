//! PostgreSQL storage through `diesel-async` and a bb8 pool.
//!
//! Row structs and the `table!` schema stay private to this module; the
//! repositories hand back domain types and port errors only. Unique
//! violations on `users.email` surface as a duplicate-email error, the rest
//! as query or connection failures.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new(database_url)).await?;
//! run_migrations(&database_url).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! ```

mod diesel_basic_error_mapping;
mod diesel_recipe_item_repositories;
mod diesel_token_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_recipe_item_repositories::{DieselIngredientRepository, DieselTagRepository};
pub use diesel_token_repository::DieselTokenRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

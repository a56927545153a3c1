//! PostgreSQL-backed tag and ingredient repositories using Diesel ORM.
//!
//! Both tables share a shape (`id`, `user_id`, `name`), so the adapters are
//! generated from one template.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IngredientRepository, RecipeItemPersistenceError, TagRepository};
use crate::domain::{
    Ingredient, IngredientId, ItemName, NewIngredient, NewTag, Tag, TagId, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{IngredientRow, NewIngredientRow, NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

fn map_pool_error(error: PoolError) -> RecipeItemPersistenceError {
    map_basic_pool_error(error, RecipeItemPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeItemPersistenceError {
    map_basic_diesel_error(
        error,
        RecipeItemPersistenceError::query,
        RecipeItemPersistenceError::connection,
    )
}

fn stored_name(raw: &str) -> Result<ItemName, RecipeItemPersistenceError> {
    ItemName::new(raw)
        .map_err(|err| RecipeItemPersistenceError::query(format!("stored name invalid: {err}")))
}

macro_rules! diesel_item_repository {
    (
        $(#[$meta:meta])*
        $repo:ident: $port:ident {
            table: $table:ident,
            row: $row:ty,
            new_row: $new_row:ident,
            new_item: $new_item:ty,
            item: $item:ident,
            id: $id:ident,
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl $port for $repo {
            async fn list_for_user(
                &self,
                user_id: &UserId,
            ) -> Result<Vec<$item>, RecipeItemPersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;

                let rows: Vec<$row> = $table::table
                    .filter($table::user_id.eq(user_id.as_uuid()))
                    .select(<$row>::as_select())
                    .order_by(($table::name.desc(), $table::id.desc()))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                rows.into_iter()
                    .map(|row| {
                        Ok($item::new(
                            $id::new(row.id),
                            UserId::from_uuid(row.user_id),
                            stored_name(&row.name)?,
                        ))
                    })
                    .collect()
            }

            async fn create(
                &self,
                new_item: &$new_item,
            ) -> Result<$item, RecipeItemPersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;

                let row: $row = diesel::insert_into($table::table)
                    .values(&$new_row {
                        user_id: *new_item.user_id.as_uuid(),
                        name: new_item.name.as_ref(),
                    })
                    .returning(<$row>::as_returning())
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                Ok($item::new(
                    $id::new(row.id),
                    new_item.user_id,
                    new_item.name.clone(),
                ))
            }
        }
    };
}

diesel_item_repository! {
    /// Diesel-backed implementation of the `TagRepository` port.
    DieselTagRepository: TagRepository {
        table: tags,
        row: TagRow,
        new_row: NewTagRow,
        new_item: NewTag,
        item: Tag,
        id: TagId,
    }
}

diesel_item_repository! {
    /// Diesel-backed implementation of the `IngredientRepository` port.
    DieselIngredientRepository: IngredientRepository {
        table: ingredients,
        row: IngredientRow,
        new_row: NewIngredientRow,
        new_item: NewIngredient,
        item: Ingredient,
        id: IngredientId,
    }
}

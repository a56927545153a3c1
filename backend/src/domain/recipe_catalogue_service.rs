//! Tag and ingredient services scoped to the authenticated owner.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{
    IngredientCatalogue, IngredientRepository, RecipeItemPersistenceError, TagCatalogue,
    TagRepository,
};
use super::{Error, Ingredient, ItemName, NewIngredient, NewTag, Tag, UserId, listing_order};

fn map_item_persistence_error(error: RecipeItemPersistenceError) -> Error {
    match error {
        RecipeItemPersistenceError::Connection { message } => Error::service_unavailable(message),
        RecipeItemPersistenceError::Query { message } => Error::internal(message),
    }
}

/// [`TagCatalogue`] backed by a [`TagRepository`].
#[derive(Clone)]
pub struct TagService {
    repository: Arc<dyn TagRepository>,
}

impl TagService {
    /// Wrap a tag repository.
    pub fn new(repository: Arc<dyn TagRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TagCatalogue for TagService {
    async fn list(&self, owner: &UserId) -> Result<Vec<Tag>, Error> {
        let mut tags = self
            .repository
            .list_for_user(owner)
            .await
            .map_err(map_item_persistence_error)?;
        tags.sort_by(|a, b| listing_order((a.name(), a.id()), (b.name(), b.id())));
        Ok(tags)
    }

    async fn create(&self, owner: &UserId, name: ItemName) -> Result<Tag, Error> {
        let tag = self
            .repository
            .create(&NewTag {
                user_id: *owner,
                name,
            })
            .await
            .map_err(map_item_persistence_error)?;
        debug!(user_id = %owner, tag_id = %tag.id(), "tag created");
        Ok(tag)
    }
}

/// [`IngredientCatalogue`] backed by an [`IngredientRepository`].
#[derive(Clone)]
pub struct IngredientService {
    repository: Arc<dyn IngredientRepository>,
}

impl IngredientService {
    /// Wrap an ingredient repository.
    pub fn new(repository: Arc<dyn IngredientRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl IngredientCatalogue for IngredientService {
    async fn list(&self, owner: &UserId) -> Result<Vec<Ingredient>, Error> {
        let mut ingredients = self
            .repository
            .list_for_user(owner)
            .await
            .map_err(map_item_persistence_error)?;
        ingredients.sort_by(|a, b| listing_order((a.name(), a.id()), (b.name(), b.id())));
        Ok(ingredients)
    }

    async fn create(&self, owner: &UserId, name: ItemName) -> Result<Ingredient, Error> {
        let ingredient = self
            .repository
            .create(&NewIngredient {
                user_id: *owner,
                name,
            })
            .await
            .map_err(map_item_persistence_error)?;
        debug!(user_id = %owner, ingredient_id = %ingredient.id(), "ingredient created");
        Ok(ingredient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockIngredientRepository, MockTagRepository};
    use crate::domain::{ErrorCode, IngredientId, TagId};
    use rstest::rstest;

    fn name(raw: &str) -> ItemName {
        ItemName::new(raw).expect("item name")
    }

    #[rstest]
    #[tokio::test]
    async fn tags_are_listed_by_name_descending() {
        let owner = UserId::random();
        let mut repository = MockTagRepository::new();
        repository.expect_list_for_user().returning(move |user_id| {
            Ok(vec![
                Tag::new(TagId::new(1), *user_id, name("Dessert")),
                Tag::new(TagId::new(2), *user_id, name("Vegan")),
                Tag::new(TagId::new(3), *user_id, name("Breakfast")),
            ])
        });
        let service = TagService::new(Arc::new(repository));

        let tags = service.list(&owner).await.expect("tags");
        let names: Vec<&str> = tags.iter().map(|t| t.name().as_ref()).collect();
        assert_eq!(names, vec!["Vegan", "Dessert", "Breakfast"]);
    }

    #[rstest]
    #[tokio::test]
    async fn created_tag_is_owned_by_caller() {
        let owner = UserId::random();
        let mut repository = MockTagRepository::new();
        repository
            .expect_create()
            .withf(move |new_tag| new_tag.user_id == owner && new_tag.name.as_ref() == "Test tag")
            .times(1)
            .returning(|new_tag| {
                Ok(Tag::new(TagId::new(7), new_tag.user_id, new_tag.name.clone()))
            });
        let service = TagService::new(Arc::new(repository));

        let tag = service.create(&owner, name("Test tag")).await.expect("tag");
        assert_eq!(tag.id(), TagId::new(7));
        assert_eq!(tag.user_id(), &owner);
    }

    #[rstest]
    #[tokio::test]
    async fn ingredient_ties_break_on_newest_id() {
        let owner = UserId::random();
        let mut repository = MockIngredientRepository::new();
        repository.expect_list_for_user().returning(|user_id| {
            Ok(vec![
                Ingredient::new(IngredientId::new(1), *user_id, name("Salt")),
                Ingredient::new(IngredientId::new(2), *user_id, name("Kale")),
                Ingredient::new(IngredientId::new(3), *user_id, name("Salt")),
            ])
        });
        let service = IngredientService::new(Arc::new(repository));

        let ids: Vec<i64> = service
            .list(&owner)
            .await
            .expect("ingredients")
            .iter()
            .map(|i| i.id().get())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[rstest]
    #[case::connection(RecipeItemPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case::query(RecipeItemPersistenceError::query("bad sql"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: RecipeItemPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut repository = MockIngredientRepository::new();
        repository
            .expect_create()
            .returning(move |_| Err(failure.clone()));
        let service = IngredientService::new(Arc::new(repository));

        let err = service
            .create(&UserId::random(), name("Cabbage"))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), expected);
    }
}

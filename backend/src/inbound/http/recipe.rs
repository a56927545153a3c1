//! Tag and ingredient handlers, scoped to the authenticated user.
//!
//! ```text
//! GET  /api/recipe/tags/
//! POST /api/recipe/tags/         {"name":"Vegan"}
//! GET  /api/recipe/ingredients/
//! POST /api/recipe/ingredients/  {"name":"Kale"}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Ingredient, ItemName, Tag};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{NAME, map_item_name_error, require};

/// Request body for creating a tag or an ingredient.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ItemRequest {
    /// Name, 1 to 255 characters after trimming.
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

impl ItemRequest {
    fn into_name(self) -> Result<ItemName, Error> {
        ItemName::new(require(self.name, NAME)?).map_err(map_item_name_error)
    }
}

/// A tag or ingredient as returned to its owner.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ItemResponse {
    /// Database identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Name.
    #[schema(example = "Vegan")]
    pub name: String,
}

impl From<&Tag> for ItemResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id().get(),
            name: tag.name().to_string(),
        }
    }
}

impl From<&Ingredient> for ItemResponse {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id().get(),
            name: ingredient.name().to_string(),
        }
    }
}

/// List the caller's tags, name descending.
#[utoipa::path(
    get,
    path = "/api/recipe/tags/",
    responses(
        (status = 200, description = "Caller's tags", body = [ItemResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listTags"
)]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let tags = state.tags.list(user.user().id()).await?;
    let body: Vec<ItemResponse> = tags.iter().map(ItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Create a tag owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/tags/",
    request_body = ItemRequest,
    responses(
        (status = 201, description = "Tag created", body = ItemResponse),
        (status = 400, description = "Blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createTag"
)]
pub async fn create_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ItemRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.into_inner().into_name()?;
    let tag = state.tags.create(user.user().id(), name).await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(&tag)))
}

/// List the caller's ingredients, name descending.
#[utoipa::path(
    get,
    path = "/api/recipe/ingredients/",
    responses(
        (status = 200, description = "Caller's ingredients", body = [ItemResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listIngredients"
)]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let ingredients = state.ingredients.list(user.user().id()).await?;
    let body: Vec<ItemResponse> = ingredients.iter().map(ItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Create an ingredient owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/ingredients/",
    request_body = ItemRequest,
    responses(
        (status = 201, description = "Ingredient created", body = ItemResponse),
        (status = 400, description = "Blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createIngredient"
)]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ItemRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.into_inner().into_name()?;
    let ingredient = state.ingredients.create(user.user().id(), name).await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(&ingredient)))
}

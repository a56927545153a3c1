//! OpenAPI document for the REST API.
//!
//! [`ApiDoc`] registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (users, recipe,
//!   health)
//! - **Schemas**: request/response DTOs plus domain type wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`], [`FieldErrorSchema`]) that describe
//!   the error envelope without coupling domain types to utoipa
//! - **Security**: the `Authorization: Token <key>` scheme
//!
//! Swagger UI serves the document in debug builds; the `openapi-dump` binary
//! prints it for client generators.

use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::recipe::{ItemRequest, ItemResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, FieldErrorSchema};
use crate::inbound::http::users::{
    CreateUserRequest, ProfileRequest, TokenRequest, TokenResponse, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the token security scheme in the generated document.
pub const TOKEN_AUTH_SCHEME: &str = "TokenAuth";

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_AUTH_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` where the key is issued by POST /api/user/token/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Accounts, token authentication, and the caller's recipe tags and ingredients.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::retrieve_profile,
        crate::inbound::http::users::patch_profile,
        crate::inbound::http::users::put_profile,
        crate::inbound::http::recipe::list_tags,
        crate::inbound::http::recipe::create_tag,
        crate::inbound::http::recipe::list_ingredients,
        crate::inbound::http::recipe::create_ingredient,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateUserRequest,
        TokenRequest,
        ProfileRequest,
        UserResponse,
        TokenResponse,
        ItemRequest,
        ItemResponse,
        ProbeStatus,
        ErrorSchema,
        ErrorCodeSchema,
        FieldErrorSchema
    )),
    tags(
        (name = "users", description = "Accounts, tokens and the caller's profile"),
        (name = "recipe", description = "The caller's tags and ingredients"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

//! User API handlers.
//!
//! ```text
//! POST  /api/user/create/ {"email":"joao@gmail.com","password":"testpass","name":"Joao"}
//! POST  /api/user/token/  {"email":"joao@gmail.com","password":"testpass"}
//! GET   /api/user/me/
//! PATCH /api/user/me/     {"name":"New name"}
//! PUT   /api/user/me/     {"email":"joao@gmail.com","password":"newpass"}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Email, Error, LoginCredentials, NewUser, Password, ProfileUpdate, User, UserName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, PASSWORD, map_user_validation_error, missing_field_error, require,
};

/// Request body for `POST /api/user/create/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Login email; the domain part is lowercased.
    #[schema(example = "joao@gmail.com")]
    pub email: Option<String>,
    /// At least five characters.
    #[schema(write_only, example = "testpass")]
    pub password: Option<String>,
    /// Optional display name.
    #[schema(example = "Joao")]
    pub name: Option<String>,
}

/// Request body for `POST /api/user/token/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    /// Account email.
    #[schema(example = "joao@gmail.com")]
    pub email: Option<String>,
    /// Account password.
    #[schema(write_only, example = "testpass")]
    pub password: Option<String>,
}

/// Request body for `PUT` and `PATCH /api/user/me/`.
///
/// `PATCH` applies whichever fields are present; `PUT` requires `email` and
/// `password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProfileRequest {
    /// New login email.
    pub email: Option<String>,
    /// New password, at least five characters.
    #[schema(write_only)]
    pub password: Option<String>,
    /// New display name.
    pub name: Option<String>,
}

/// Public view of an account. The password never leaves the server.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    /// Login email.
    #[schema(example = "joao@gmail.com")]
    pub email: String,
    /// Display name, possibly empty.
    #[schema(example = "Joao")]
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_string(),
            name: user.name().as_ref().to_owned(),
        }
    }
}

/// Response body for `POST /api/user/token/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Key to send as `Authorization: Token <key>`.
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        let email = Email::new(require(value.email, EMAIL)?).map_err(map_user_validation_error)?;
        let password = Password::for_account(&require(value.password, PASSWORD)?)
            .map_err(map_user_validation_error)?;
        let name = UserName::new(value.name.unwrap_or_default())
            .map_err(map_user_validation_error)?;
        Ok(NewUser::new(email, name, password))
    }
}

impl TryFrom<TokenRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: TokenRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, EMAIL)?;
        let password = require(value.password, PASSWORD)?;
        LoginCredentials::try_from_parts(&email, &password).map_err(map_user_validation_error)
    }
}

fn profile_update(value: ProfileRequest) -> Result<ProfileUpdate, Error> {
    Ok(ProfileUpdate {
        email: value
            .email
            .map(Email::new)
            .transpose()
            .map_err(map_user_validation_error)?,
        name: value
            .name
            .map(UserName::new)
            .transpose()
            .map_err(map_user_validation_error)?,
        password: value
            .password
            .map(|raw| Password::for_account(&raw))
            .transpose()
            .map_err(map_user_validation_error)?,
    })
}

/// Create a new account.
#[utoipa::path(
    post,
    path = "/api/user/create/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid payload or email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = NewUser::try_from(payload.into_inner())?;
    let user = state.accounts.create_user(new_user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for the account's API token.
///
/// Repeated calls return the same key.
#[utoipa::path(
    post,
    path = "/api/user/token/",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing fields or invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createToken",
    security([])
)]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let token = state.accounts.obtain_token(credentials).await?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        token: token.key().as_str().to_owned(),
    }))
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/user/me/",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "retrieveProfile"
)]
pub async fn retrieve_profile(user: AuthenticatedUser) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user.user())))
}

/// Update some fields of the authenticated user's profile.
#[utoipa::path(
    patch,
    path = "/api/user/me/",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "patchProfile"
)]
pub async fn patch_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let update = profile_update(payload.into_inner())?;
    let updated = state.accounts.update_profile(user.user().id(), update).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}

/// Replace the authenticated user's credentials and profile.
#[utoipa::path(
    put,
    path = "/api/user/me/",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile replaced", body = UserResponse),
        (status = 400, description = "Invalid payload or missing required fields", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
pub async fn put_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    if payload.email.is_none() {
        return Err(missing_field_error(EMAIL));
    }
    if payload.password.is_none() {
        return Err(missing_field_error(PASSWORD));
    }
    let update = profile_update(payload)?;
    let updated = state.accounts.update_profile(user.user().id(), update).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}

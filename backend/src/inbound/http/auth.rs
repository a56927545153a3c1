//! Token authentication extractor.
//!
//! Handlers that take [`AuthenticatedUser`] only run once the
//! `Authorization` header names an active account. Accepted schemes are
//! `Token <key>` and `Bearer <key>`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, TokenKey, User};

use super::state::HttpState;

const SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// The account that presented a valid token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// Borrow the authenticated user.
    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Extract the key from an `Authorization` header value.
pub(crate) fn parse_authorization(value: &str) -> Result<TokenKey, Error> {
    let mut parts = value.split_whitespace();
    let (Some(scheme), Some(raw_key), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::unauthorized("invalid token header"));
    };
    if !SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return Err(Error::unauthorized("unsupported authorization scheme"));
    }
    TokenKey::parse(raw_key).map_err(|err| {
        debug!(error = %err, "malformed token presented");
        Error::unauthorized("invalid token")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map(str::to_owned));

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state not configured"))?;
            let raw = match header {
                None => {
                    return Err(Error::unauthorized(
                        "authentication credentials were not provided",
                    ));
                }
                Some(Err(_)) => return Err(Error::unauthorized("invalid token header")),
                Some(Ok(raw)) => raw,
            };
            let key = parse_authorization(&raw)?;
            let user = state.accounts.authenticate(&key).await?;
            Ok(AuthenticatedUser(user))
        })
    }
}

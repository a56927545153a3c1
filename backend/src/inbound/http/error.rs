//! Renders [`Error`] as an HTTP response.
//!
//! Every failure leaves the service with the same JSON envelope. Internal
//! messages are logged and replaced before they reach the client.

use actix_web::error::JsonPayloadError;
use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Challenge advertised with every `401` response.
pub const TOKEN_CHALLENGE: &str = "Token";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const REDACTED_MESSAGE: &str = "Internal server error";

/// Body sent to the client; internal errors keep only their trace id.
fn public_body(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let body = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => body.with_trace_id(id),
        None => body,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self.code() {
            ErrorCode::Unauthorized => {
                response.insert_header((WWW_AUTHENTICATE, TOKEN_CHALLENGE));
            }
            ErrorCode::InternalError => {
                error!(message = self.message(), "internal error reached the client boundary");
            }
            _ => {}
        }
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(public_body(self))
    }
}

/// Turn JSON extractor failures into `400` domain errors.
///
/// Registered through `web::JsonConfig::error_handler` so malformed bodies
/// share the error schema with validation failures.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("malformed request body: {inner}"),
        _ => "request body could not be read".to_owned(),
    };
    Error::invalid_field("body", "parse_error", message).into()
}

#[cfg(test)]
mod tests;

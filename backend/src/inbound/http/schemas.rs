//! OpenAPI descriptions of the error envelope.
//!
//! `domain::Error` stays free of utoipa derives; these mirror types are
//! registered in its place under the domain type's name.

use utoipa::ToSchema;

/// Documents [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Validation failed, the body was malformed, or credentials were wrong.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No token, or a token that does not name an active account.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// No such resource.
    #[schema(rename = "not_found")]
    NotFound,
    /// Known path, unsupported method.
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    /// Concurrent write lost a race.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Anything else; the message is redacted.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Documents the `details` payload attached to field validation errors.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct FieldErrorSchema {
    /// Offending request field, or `non_field_errors`.
    #[schema(example = "email")]
    field: String,
    /// DRF-style code such as `required`, `blank`, `min_length` or `unique`.
    #[schema(example = "unique")]
    code: String,
}

/// Documents [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Machine-readable code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "a user with email test@londonappdev.com already exists")]
    message: String,
    /// Value of the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Present on field validation errors.
    details: Option<FieldErrorSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn property_names<T: PartialSchema>() -> Vec<String> {
        let RefOr::T(Schema::Object(object)) = T::schema() else {
            panic!("expected object schema");
        };
        object.properties.keys().cloned().collect()
    }

    #[test]
    fn envelope_uses_camel_case_trace_id() {
        let names = property_names::<ErrorSchema>();
        assert!(names.iter().any(|n| n == "traceId"));
        assert!(names.iter().all(|n| n != "trace_id"));
    }

    #[test]
    fn field_details_name_field_and_code() {
        let mut names = property_names::<FieldErrorSchema>();
        names.sort();
        assert_eq!(names, vec!["code", "field"]);
    }
}

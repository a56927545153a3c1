//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod recipe;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

use actix_web::{HttpRequest, HttpResponse, Resource, web};

use crate::domain::Error;
pub use error::ApiResult;

/// Register the REST API and health probes.
///
/// Each path is an explicit resource so an unregistered method on a known
/// path answers `405 Method Not Allowed` with the usual error body. The caller supplies
/// `web::Data<HttpState>` and `web::Data<HealthState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(resource("/api/user/create/").route(web::post().to(users::create_user)))
        .service(resource("/api/user/token/").route(web::post().to(users::create_token)))
        .service(
            resource("/api/user/me/")
                .route(web::get().to(users::retrieve_profile))
                .route(web::patch().to(users::patch_profile))
                .route(web::put().to(users::put_profile)),
        )
        .service(
            resource("/api/recipe/tags/")
                .route(web::get().to(recipe::list_tags))
                .route(web::post().to(recipe::create_tag)),
        )
        .service(
            resource("/api/recipe/ingredients/")
                .route(web::get().to(recipe::list_ingredients))
                .route(web::post().to(recipe::create_ingredient)),
        )
        .service(resource("/health/ready").route(web::get().to(health::ready)))
        .service(resource("/health/live").route(web::get().to(health::live)));
}

fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::route().to(method_not_allowed))
}

async fn method_not_allowed(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed(format!(
        "method \"{}\" not allowed",
        req.method()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case::profile_post("POST", "/api/user/me/")]
    #[case::tags_delete("DELETE", "/api/recipe/tags/")]
    #[case::token_get("GET", "/api/user/token/")]
    #[case::probe_post("POST", "/health/live")]
    #[actix_web::test]
    async fn unsupported_methods_get_the_error_envelope(
        #[case] method: &str,
        #[case] path: &str,
    ) {
        let app = actix_test::init_service(App::new().configure(configure)).await;
        let method = actix_web::http::Method::from_bytes(method.as_bytes()).expect("method");
        let req = actix_test::TestRequest::default()
            .method(method.clone())
            .uri(path)
            .to_request();

        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "method_not_allowed");
        assert_eq!(body["message"], format!("method \"{method}\" not allowed"));
    }
}

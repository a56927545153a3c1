//! Assembles the actix `App` and binds it.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use recipe_backend::Trace;
#[cfg(debug_assertions)]
use recipe_backend::doc::ApiDoc;
use recipe_backend::inbound::http::configure;
use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Bind the listener and return the running [`Server`] handle.
///
/// Repositories come from `config.db_pool` when present and from memory
/// otherwise. `health_state` turns ready once the socket is bound; awaiting
/// the returned handle drives the server.
///
/// # Errors
/// Fails when the password hasher cannot be built or the address is taken.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)
        .map_err(|err| std::io::Error::other(format!("password hasher setup failed: {err}")))?;
    let probes = health_state.clone();
    let server = HttpServer::new(move || build_app(probes.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Smoke tests for the assembled application.

    use super::*;
    use actix_web::test;
    use recipe_backend::test_support::in_memory_state;

    #[actix_web::test]
    async fn assembled_app_serves_health_and_traces() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app =
            test::init_service(build_app(health, web::Data::new(in_memory_state()))).await;

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());
        assert!(res.headers().contains_key("trace-id"));
    }

    #[actix_web::test]
    async fn assembled_app_requires_token_for_profile() {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            web::Data::new(in_memory_state()),
        ))
        .await;

        let req = test::TestRequest::get().uri("/api/user/me/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}

//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and behind the `test-support` feature.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use argon2::Params;

use crate::Trace;
use crate::domain::{IngredientService, TagService, UserAccountService};
use crate::inbound::http::configure;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::HttpState;
use crate::outbound::crypto::Argon2PasswordHasher;
use crate::outbound::memory::{InMemoryAccounts, InMemoryRecipeItems};

/// Argon2id hasher using the cheapest parameters `argon2` accepts.
///
/// # Panics
///
/// Panics if `argon2` rejects its own minimum parameters.
#[expect(clippy::expect_used, reason = "test helper")]
pub fn fast_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_costs(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST)
        .expect("minimum argon2 params")
}

/// HTTP state wired to fresh in-memory adapters.
///
/// # Examples
///
/// ```rust
/// use recipe_backend::test_support::in_memory_state;
///
/// let state = in_memory_state();
/// let _tags = state.tags.clone();
/// ```
pub fn in_memory_state() -> HttpState {
    let accounts = Arc::new(InMemoryAccounts::new());
    let items = Arc::new(InMemoryRecipeItems::new());
    HttpState::new(
        Arc::new(UserAccountService::new(
            accounts.clone(),
            accounts,
            Arc::new(fast_hasher()),
        )),
        Arc::new(TagService::new(items.clone())),
        Arc::new(IngredientService::new(items)),
    )
}

/// Full application over the given state, wrapped in [`Trace`] and with
/// ready health probes.
pub fn build_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = HealthState::new();
    health.mark_ready();
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(health))
        .wrap(Trace)
        .configure(configure)
}

//! bb8 pool of `diesel-async` PostgreSQL connections shared by the Diesel
//! repositories.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::{debug, warn};

use crate::domain::ports::define_port_error;

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

define_port_error! {
    /// Failures building the pool or checking out a connection.
    pub enum PoolError {
        /// No connection became available before the checkout timeout.
        Checkout { message: String } => "database connection checkout failed: {message}",
        /// The pool could not be constructed.
        Build { message: String } => "database pool setup failed: {message}",
    }
}

/// Pool sizing and the target database.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use recipe_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://recipe@localhost/recipe")
///     .with_max_size(20)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections, two kept idle, and a 30 second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: Some(DEFAULT_MIN_IDLE),
            connection_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Upper bound on open connections. Zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// Idle connections bb8 keeps warm; `None` lets the pool drain.
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// How long `get` waits for a free connection.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum pool size.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Idle target, never above the pool size.
    fn effective_min_idle(&self) -> Option<u32> {
        self.min_idle.map(|idle| idle.min(self.max_size))
    }
}

/// URL with any password replaced, safe to log.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };
    match rest.rsplit_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***@{host}")
        }
        None => url.to_owned(),
    }
}

/// Shared handle to the connection pool. Cloning is cheap.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] for an unusable URL or when the initial
    /// connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url());

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.effective_min_idle())
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| {
                warn!(
                    url = %redact_url(config.database_url()),
                    error = %err,
                    "database pool setup failed"
                );
                PoolError::build(err.to_string())
            })?;

        debug!(
            url = %redact_url(config.database_url()),
            max_size = config.max_size,
            "database pool ready"
        );
        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when none frees up within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply_without_overrides() {
        let config = PoolConfig::new("postgres://localhost/recipe");

        assert_eq!(config.database_url(), "postgres://localhost/recipe");
        assert_eq!(config.max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(config.effective_min_idle(), Some(DEFAULT_MIN_IDLE));
        assert_eq!(config.connection_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }

    #[rstest]
    #[case::clamped_to_size(1, Some(2), Some(1))]
    #[case::within_size(4, Some(2), Some(2))]
    #[case::draining(4, None, None)]
    #[case::zero_size_raised(0, Some(2), Some(1))]
    fn idle_target_never_exceeds_size(
        #[case] max_size: u32,
        #[case] min_idle: Option<u32>,
        #[case] expected: Option<u32>,
    ) {
        let config = PoolConfig::new("postgres://localhost/recipe")
            .with_max_size(max_size)
            .with_min_idle(min_idle);

        assert_eq!(config.effective_min_idle(), expected);
    }

    #[rstest]
    #[case("postgres://app:hunter2@db:5432/recipes", "postgres://app:***@db:5432/recipes")]
    #[case("postgres://app@db/recipes", "postgres://app:***@db/recipes")]
    #[case("postgres://db/recipes", "postgres://db/recipes")]
    #[case("not a url", "not a url")]
    fn urls_are_redacted_for_logs(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(redact_url(url), expected);
    }

    #[rstest]
    fn errors_carry_the_underlying_message() {
        assert!(
            PoolError::checkout("connection refused")
                .to_string()
                .contains("connection refused")
        );
        assert!(PoolError::build("invalid URL").to_string().contains("invalid URL"));
    }
}

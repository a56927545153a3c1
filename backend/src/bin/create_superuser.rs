//! Create a superuser account directly in the database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::domain::ports::UserAccounts;
use recipe_backend::domain::{NewUser, UserAccountService};
use recipe_backend::outbound::crypto::Argon2PasswordHasher;
use recipe_backend::outbound::persistence::{
    DbPool, DieselTokenRepository, DieselUserRepository, PoolConfig, run_migrations,
};

/// A one-shot command should fail fast when the database is unreachable.
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create an active staff account with superuser privileges",
    version
)]
struct CliArgs {
    /// Login email address.
    #[arg(long, value_name = "email")]
    email: String,
    /// Account password.
    #[arg(long, value_name = "password", env = "RECIPE_SUPERUSER_PASSWORD")]
    password: String,
    /// Display name.
    #[arg(long, value_name = "name", default_value = "")]
    name: String,
    /// Database connection URL.
    #[arg(long = "database-url", value_name = "url", env = "RECIPE_DATABASE_URL")]
    database_url: Option<String>,
}

impl CliArgs {
    fn new_user(&self) -> Result<NewUser> {
        NewUser::try_from_parts(&self.email, &self.password, &self.name)
            .wrap_err("invalid account details")
    }
}

fn resolve_database_url(value: Option<&str>) -> Result<&str> {
    match value.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url),
        Some(_) => Err(eyre!("database URL must not be empty")),
        None => Err(eyre!(
            "database URL missing: set --database-url or RECIPE_DATABASE_URL"
        )),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let new_user = args.new_user()?;
    let database_url = resolve_database_url(args.database_url.as_deref())?;

    run_migrations(database_url)
        .await
        .wrap_err("apply database migrations")?;
    let pool_config = PoolConfig::new(database_url)
        .with_max_size(1)
        .with_min_idle(None)
        .with_connection_timeout(CHECKOUT_TIMEOUT);
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("create database pool")?;

    let accounts = UserAccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTokenRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new().wrap_err("configure password hasher")?),
    );
    let user = accounts
        .create_super_user(new_user)
        .await
        .map_err(|error| eyre!("create superuser: {error}"))?;

    println!("created superuser {} ({})", user.email(), user.id());
    Ok(())
}

//! Provision a staff superuser account directly in the database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use recipe_backend::domain::{AccountService, PlainPassword};
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselUserRepository, PoolConfig, apply_migrations,
};
use recipe_backend::outbound::security::BcryptPasswordHasher;
use recipe_backend::settings::AppSettings;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create a staff superuser; the password policy is not applied",
    version
)]
struct CliArgs {
    /// Login email; normalised before storage.
    #[arg(long, value_name = "email")]
    email: String,
    /// Plain password to hash.
    #[arg(long, value_name = "password")]
    password: String,
    /// Database connection URL. Falls back to `RECIPE_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = AppSettings::load_from_iter([OsString::from("create-superuser")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let database_url = resolve_database_url(args.database_url.as_deref(), &settings)?;

    apply_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let accounts = AccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselAuthTokenRepository::new(pool)),
        Arc::new(BcryptPasswordHasher::new(settings.bcrypt_cost())),
    );
    let user = accounts
        .create_superuser(&args.email, &PlainPassword::new(args.password))
        .await
        .map_err(|error| io::Error::other(format!("create superuser: {}", error.message())))?;

    println!("email={}", user.email());
    println!("superuser={}", user.is_superuser());
    Ok(())
}

fn resolve_database_url(cli: Option<&str>, settings: &AppSettings) -> io::Result<String> {
    cli.map(str::trim)
        .filter(|url| !url.is_empty())
        .or_else(|| settings.database_url())
        .map(str::to_owned)
        .ok_or_else(|| {
            io::Error::other("a database URL is required (--database-url or RECIPE_DATABASE_URL)")
        })
}

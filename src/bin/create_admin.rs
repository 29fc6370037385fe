//! Creates the first admin account.
//!
//! Usage: `create_admin --email admin@example.com --password '...'`
//! (or `ADMIN_EMAIL` / `ADMIN_PASSWORD`). Re-running with an existing email is a no-op.

use anyhow::{bail, Context, Result};
use validator::ValidateEmail;

use art_portfolio_backend::{
    auth::password::hash_password,
    db::postgres::DbConnection,
    entities::user::{normalize_email, UserInsert},
    password::validate_password_strength,
    repositories::user::{SqlxUserRepo, UserRepository},
    settings::AppConfig,
};

fn arg_or_env(args: &[String], flag: &str, env_key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
        .or_else(|| std::env::var(env_key).ok())
        .filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::new().context("failed to load configuration")?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let email = arg_or_env(&args, "--email", "ADMIN_EMAIL")
        .map(|e| normalize_email(&e))
        .context("admin email missing: pass --email or set ADMIN_EMAIL")?;
    let password = arg_or_env(&args, "--password", "ADMIN_PASSWORD")
        .context("admin password missing: pass --password or set ADMIN_PASSWORD")?;

    if !email.validate_email() {
        bail!("invalid admin email: {email}");
    }
    if let Err(e) = validate_password_strength(&password) {
        bail!("admin password rejected: {e}");
    }

    let db = DbConnection::from_config(&config);
    db.run_migrations().await.context("failed to run migrations")?;

    let users = SqlxUserRepo::new(db);
    if users.get_user_by_email(&email).await?.is_some() {
        tracing::info!(%email, "Admin already exists, nothing to do");
        return Ok(());
    }

    let password_hash = hash_password(&password)?;
    let id = users.create_user(&UserInsert { email: email.clone(), password_hash }).await?;

    tracing::info!(%email, user_id = %id, "Admin user created");
    Ok(())
}

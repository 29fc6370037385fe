//! Loads the sample gallery and page sections into an empty database.
//!
//! Only missing content is inserted, so it is safe to re-run.

use anyhow::{Context, Result};

use art_portfolio_backend::{
    db::postgres::DbConnection,
    repositories::{artwork::SqlxArtworkRepo, content::SqlxContentRepo},
    settings::AppConfig,
    use_cases::seed::SeedHandler,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::new().context("failed to load configuration")?;
    let db = DbConnection::from_config(&config);
    db.run_migrations().await.context("failed to run migrations")?;

    let seeder = SeedHandler::new(SqlxArtworkRepo::new(db.clone()), SqlxContentRepo::new(db));
    let report = seeder.seed_missing().await?;

    tracing::info!(
        artworks = report.artworks,
        hero = report.hero,
        about = report.about,
        footer = report.footer,
        "Seeding finished"
    );
    Ok(())
}

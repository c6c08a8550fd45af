use dotenvy::dotenv;
use quickhost::config::database;
use quickhost::errors::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Bootstraps the `QuickHost` database: connects to the configured `SQLite`
/// file and creates any missing tables. The dashboard and mail frontends
/// link against the library crate and share this schema.
#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let url = database::get_database_url();
    info!(url = %url, "connecting to database");

    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    info!("database schema is up to date");

    Ok(())
}

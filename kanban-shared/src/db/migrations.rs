/// Schema migrations
///
/// Migration files live in `migrations/` at the workspace root and are
/// embedded at compile time with `sqlx::migrate!`. The schema is the
/// users → workspaces → boards → lists → cards chain, each link declared
/// `ON DELETE CASCADE`.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use kanban_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = std::env::var("DATABASE_URL")?;
/// ensure_database_exists(&url).await?;
/// let pool = create_pool(DatabaseConfig::from_url(url)).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::migrate::{MigrateDatabase, MigrateError};
use sqlx::{postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Applies every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let migrator = sqlx::migrate!("../migrations");
    info!(known = migrator.iter().count(), "Applying board schema migrations");

    migrator.run(pool).await.map_err(|e| {
        warn!(error = %e, "Board schema migration failed");
        e
    })?;

    info!("Board schema is up to date");
    Ok(())
}

/// Versions of the migrations recorded as applied, oldest first
pub async fn applied_versions(pool: &PgPool) -> Result<Vec<i64>, sqlx::Error> {
    let tracked: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await?;

    if !tracked {
        debug!("No migration has run against this database");
        return Ok(Vec::new());
    }

    sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = true ORDER BY version")
        .fetch_all(pool)
        .await
}

/// Creates the database named in `database_url` when it is missing
///
/// Intended for development and the integration test suites.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Board database present");
        return Ok(());
    }

    info!("Board database missing, creating it");
    Postgres::create_database(database_url).await
}

mod handle;
mod repository;

pub use handle::*;
pub use repository::*;

use crate::config::DatabaseConfig;

pub type PostgresHandle<'c> = Handle<'c, sqlx::Postgres>;
pub type SqliteHandle<'c> = Handle<'c, sqlx::Sqlite>;

pub fn map_err(e: sqlx::Error) -> crate::Error {
    if is_unique_violation(&e) {
        return crate::Error::Conflict("unique constraint violated".into());
    }
    crate::Error::Database(anyhow::Error::new(e))
}

/// Postgres `23505`, SQLite `SQLITE_CONSTRAINT_PRIMARYKEY` (1555) and
/// `SQLITE_CONSTRAINT_UNIQUE` (2067).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if matches!(db_err.code().as_deref(), Some("23505" | "1555" | "2067"))
    )
}

pub async fn connect_postgres(
    config: &DatabaseConfig,
) -> crate::Result<sqlx::PgPool> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(map_err)
}

/// An in-memory url gives each connection its own database, so keep
/// `max_connections = 1` for `sqlite::memory:`. That one connection is never
/// retired, or the database would vanish with it.
pub async fn connect_sqlite(
    config: &DatabaseConfig,
) -> crate::Result<sqlx::SqlitePool> {
    let mut options = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(config.max_connections);
    if is_sqlite_memory(&config.url) {
        options = options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    options.connect(&config.url).await.map_err(map_err)
}

fn is_sqlite_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

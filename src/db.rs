//! Database connection pool and migration management.
//!
//! The pool is created once at startup and passed to every handler through
//! Axum `State` extraction. There is no global: the pool handle is the only
//! way to reach the database, and multi-statement operations check a
//! dedicated connection out of it for the lifetime of their transaction.

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// The pool is bounded at a fixed concurrency ceiling; when it is
/// exhausted, callers queue on checkout rather than failing outright.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        // Limit concurrent connections
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each file
/// runs only once. This replaces the pile of one-off schema-alteration
/// scripts this service grew up with.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

//! Persistence for the bug tracker.
//!
//! - [`models`]: row structs and input DTOs.
//! - [`repositories`]: zero-sized `*Repo` structs issuing SQL against `&PgPool`.
//! - [`store`]: the storage traits services depend on, plus [`PgStore`].
//! - [`memory`]: [`MemoryStore`], an in-process backend with the same
//!   listing semantics.

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use memory::MemoryStore;
pub use store::{AdminUserStore, CategoryStore, IssueStore, PgStore, Store};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

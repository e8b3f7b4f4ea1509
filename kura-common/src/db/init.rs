//! Database initialization
//!
//! Opens (creating if needed) the SQLite database and creates the registrant
//! tables. Every statement is idempotent, so this runs on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets list requests proceed while a registration is being written
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_members_table(&pool).await?;
    create_aspirants_table(&pool).await?;

    Ok(pool)
}

/// Create the members table
///
/// national_id is unique per table, not across members and aspirants.
pub async fn create_members_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            national_id TEXT NOT NULL UNIQUE,
            mobile TEXT NOT NULL,
            email TEXT NOT NULL,
            county TEXT NOT NULL,
            constituency TEXT NOT NULL,
            ward TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_members_created_at ON members(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the aspirants table
pub async fn create_aspirants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS aspirants (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            national_id TEXT NOT NULL UNIQUE,
            mobile TEXT NOT NULL,
            email TEXT NOT NULL,
            county TEXT NOT NULL,
            constituency TEXT NOT NULL,
            ward TEXT NOT NULL,
            position TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_aspirants_created_at ON aspirants(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

//! # Schema Migrations
//!
//! SQL files under `migrations/sqlite/` are embedded at compile time and
//! applied in filename order. sqlx records each applied file in
//! `_sqlx_migrations` and refuses to run if an applied file was edited, so
//! schema changes always go into a new `NNN_description.sql`.
//!
//! ```text
//! 001_initial_schema.sql
//!   room_types        hotel room categories, nightly base price
//!   room_inventories  one row per (room_type_id, date), 0 ≤ booked ≤ total
//!   bookings          stays with frozen total price and status
//! ```

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applied vs embedded migration counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl MigrationStatus {
    /// No embedded migration is pending.
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(migrations = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let tracked: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    let applied: i64 = if tracked {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    } else {
        0
    };

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: applied.max(0) as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn bare_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_has_nothing_applied() {
        let pool = bare_pool().await;

        let status = migration_status(&pool).await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());

        run_migrations(&pool).await.unwrap();
        assert!(migration_status(&pool).await.unwrap().is_current());
    }

    #[tokio::test]
    async fn test_unreadable_history_is_an_error() {
        let pool = bare_pool().await;
        // A history table without the columns sqlx writes
        sqlx::query("CREATE TABLE _sqlx_migrations (version INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();

        let err = migration_status(&pool).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)), "got {err:?}");
    }
}

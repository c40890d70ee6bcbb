//! # Room Type Repository
//!
//! Read access to room types for the booking core, plus the inserts used by
//! the seed binary and tests. Hotel and amenity management live elsewhere.

use chrono::Utc;
use roomledger_core::{NewRoomType, RoomType};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

const SELECT_ROOM_TYPE: &str = r#"
    SELECT id, hotel_id, name, capacity, base_price_cents, description, created_at, updated_at
    FROM room_types
"#;

/// Repository for room type lookups.
#[derive(Debug, Clone)]
pub struct RoomTypeRepository {
    pool: SqlitePool,
}

impl RoomTypeRepository {
    /// Creates a new RoomTypeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoomTypeRepository { pool }
    }

    /// Gets a room type by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<RoomType>> {
        let mut conn = self.pool.acquire().await?;
        fetch_room_type(&mut conn, id).await
    }

    /// Lists the room types of a hotel.
    pub async fn list_by_hotel(&self, hotel_id: i64) -> DbResult<Vec<RoomType>> {
        let room_types = sqlx::query_as::<_, RoomType>(&format!(
            "{SELECT_ROOM_TYPE} WHERE hotel_id = ?1 ORDER BY id"
        ))
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(room_types)
    }

    /// Registers a room type.
    pub async fn insert(&self, new: &NewRoomType) -> DbResult<RoomType> {
        let now = Utc::now();

        debug!(hotel_id = new.hotel_id, name = %new.name, "Inserting room type");

        let room_type = sqlx::query_as::<_, RoomType>(
            r#"
            INSERT INTO room_types (
                hotel_id, name, capacity, base_price_cents, description,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING id, hotel_id, name, capacity, base_price_cents, description, created_at, updated_at
            "#,
        )
        .bind(new.hotel_id)
        .bind(&new.name)
        .bind(new.capacity)
        .bind(new.base_price_cents)
        .bind(&new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(room_type)
    }

    /// Counts all room types.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM room_types")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Fetches a room type on an existing connection or transaction.
pub(crate) async fn fetch_room_type(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<RoomType>> {
    let room_type = sqlx::query_as::<_, RoomType>(&format!("{SELECT_ROOM_TYPE} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(room_type)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn suite(hotel_id: i64, name: &str, base_price_cents: i64) -> NewRoomType {
        NewRoomType {
            hotel_id,
            name: name.to_string(),
            capacity: 2,
            base_price_cents,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.room_types();

        let created = repo.insert(&suite(1, "Deluxe", 1000)).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Deluxe");
        assert_eq!(fetched.base_price().cents(), 1000);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_room_type() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.room_types().get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_hotel() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.room_types();

        repo.insert(&suite(1, "Standard", 800)).await.unwrap();
        repo.insert(&suite(1, "Suite", 2500)).await.unwrap();
        repo.insert(&suite(2, "Dorm", 300)).await.unwrap();

        let hotel_one = repo.list_by_hotel(1).await.unwrap();
        assert_eq!(hotel_one.len(), 2);
        assert_eq!(hotel_one[0].name, "Standard");
    }
}

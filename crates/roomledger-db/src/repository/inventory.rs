//! # Inventory Ledger
//!
//! Per-(room type, night) capacity records.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Inventory Ledger                                  │
//! │                                                                         │
//! │  set_inventory(room_type, date, total, policy)   operator upsert        │
//! │    ├── no row    → INSERT total, booked = 0                             │
//! │    └── row       → ResetBooked:    total, booked = 0   (warn if > 0)    │
//! │                    PreserveBooked: total, booked kept  (reject < booked)│
//! │                                                                         │
//! │  check_availability(room_type, stay)             unlocked pre-check     │
//! │  list_range(room_type, stay)                     read nights            │
//! │                                                                         │
//! │  claim_nights / release_nights                   used inside the        │
//! │                                                  reservation and status │
//! │                                                  transactions only      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are never deleted in normal flow.

use chrono::{DateTime, NaiveDate, Utc};
use roomledger_core::{
    check_availability, Availability, CoreError, InventoryRecord, InventoryResetPolicy, StayRange,
    ValidationError,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbResult, LedgerResult};
use crate::lock::lock_dates;
use crate::repository::room_type::fetch_room_type;

const SELECT_INVENTORY: &str = r#"
    SELECT id, room_type_id, date, total_rooms, booked_rooms, created_at, updated_at
    FROM room_inventories
"#;

/// Repository for nightly inventory.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Creates or overwrites the inventory of one night.
    ///
    /// ## Preconditions
    /// `date >= today` and `total_rooms >= 0` are checked by the caller
    /// (see `roomledger_core::validation::validate_inventory_input`). The
    /// room type is checked here, under the night lock.
    ///
    /// ## Errors
    /// - `Rejected(RoomTypeNotFound)` if the room type does not exist
    /// - `Rejected(Validation(BelowBooked))` under `PreserveBooked` when
    ///   `total_rooms` is below the rooms already booked
    pub async fn set_inventory(
        &self,
        room_type_id: i64,
        date: NaiveDate,
        total_rooms: i64,
        policy: InventoryResetPolicy,
    ) -> LedgerResult<InventoryRecord> {
        let mut tx = self.pool.begin().await?;

        lock_dates(&mut tx, room_type_id, date, date).await?;

        if fetch_room_type(&mut tx, room_type_id).await?.is_none() {
            return Err(CoreError::RoomTypeNotFound(room_type_id).into());
        }

        let now = Utc::now();
        let existing = fetch_night(&mut tx, room_type_id, date).await?;

        let record = match existing {
            None => {
                debug!(room_type_id, %date, total_rooms, "Creating inventory night");
                insert_night(&mut tx, room_type_id, date, total_rooms, now).await?
            }
            Some(current) => {
                let booked_rooms = match policy {
                    InventoryResetPolicy::ResetBooked => {
                        if current.booked_rooms > 0 {
                            warn!(
                                room_type_id,
                                %date,
                                discarded_booked = current.booked_rooms,
                                total_rooms,
                                "Inventory reset discards booked count"
                            );
                        }
                        0
                    }
                    InventoryResetPolicy::PreserveBooked => {
                        if total_rooms < current.booked_rooms {
                            return Err(ValidationError::BelowBooked {
                                date,
                                requested: total_rooms,
                                booked: current.booked_rooms,
                            }
                            .into());
                        }
                        current.booked_rooms
                    }
                };

                debug!(room_type_id, %date, total_rooms, booked_rooms, ?policy, "Overwriting inventory night");
                update_night(&mut tx, current.id, total_rooms, booked_rooms, now).await?
            }
        };

        tx.commit().await?;

        info!(
            room_type_id,
            %date,
            total_rooms = record.total_rooms,
            booked_rooms = record.booked_rooms,
            "Inventory set"
        );

        Ok(record)
    }

    /// Gets the record of one night.
    pub async fn get(&self, room_type_id: i64, date: NaiveDate) -> DbResult<Option<InventoryRecord>> {
        let mut conn = self.pool.acquire().await?;
        fetch_night(&mut conn, room_type_id, date).await
    }

    /// Lists the records for the nights of `stay`, ordered by date.
    pub async fn list_range(&self, room_type_id: i64, stay: &StayRange) -> DbResult<Vec<InventoryRecord>> {
        let mut conn = self.pool.acquire().await?;
        fetch_nights(&mut conn, room_type_id, stay).await
    }

    /// Unlocked availability check.
    ///
    /// Read-only and safe to repeat. A positive answer is a hint only; the
    /// reservation re-checks under lock before it commits.
    pub async fn check_availability(&self, room_type_id: i64, stay: &StayRange) -> DbResult<Availability> {
        let records = self.list_range(room_type_id, stay).await?;
        Ok(check_availability(stay, &records))
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Reads one night on an existing connection or transaction.
pub(crate) async fn fetch_night(
    conn: &mut SqliteConnection,
    room_type_id: i64,
    date: NaiveDate,
) -> DbResult<Option<InventoryRecord>> {
    let record = sqlx::query_as::<_, InventoryRecord>(&format!(
        "{SELECT_INVENTORY} WHERE room_type_id = ?1 AND date = ?2"
    ))
    .bind(room_type_id)
    .bind(date)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

/// Reads the nights of `stay` on an existing connection or transaction.
pub(crate) async fn fetch_nights(
    conn: &mut SqliteConnection,
    room_type_id: i64,
    stay: &StayRange,
) -> DbResult<Vec<InventoryRecord>> {
    let records = sqlx::query_as::<_, InventoryRecord>(&format!(
        "{SELECT_INVENTORY} WHERE room_type_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date"
    ))
    .bind(room_type_id)
    .bind(stay.first_night())
    .bind(stay.last_night())
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

/// Adds one booked room to every night of `stay` that has capacity left.
///
/// Returns the number of nights incremented. The caller compares it with
/// `stay.nights()`; anything less means the transaction must roll back.
pub(crate) async fn claim_nights(
    conn: &mut SqliteConnection,
    room_type_id: i64,
    stay: &StayRange,
    now: DateTime<Utc>,
) -> DbResult<u64> {
    let claimed = sqlx::query(
        r#"
        UPDATE room_inventories
        SET booked_rooms = booked_rooms + 1, updated_at = ?4
        WHERE room_type_id = ?1
          AND date BETWEEN ?2 AND ?3
          AND booked_rooms < total_rooms
        "#,
    )
    .bind(room_type_id)
    .bind(stay.first_night())
    .bind(stay.last_night())
    .bind(now)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(claimed)
}

/// Removes one booked room from every night of `stay`, never below zero.
///
/// Returns the number of nights decremented.
pub(crate) async fn release_nights(
    conn: &mut SqliteConnection,
    room_type_id: i64,
    stay: &StayRange,
    now: DateTime<Utc>,
) -> DbResult<u64> {
    let released = sqlx::query(
        r#"
        UPDATE room_inventories
        SET booked_rooms = booked_rooms - 1, updated_at = ?4
        WHERE room_type_id = ?1
          AND date BETWEEN ?2 AND ?3
          AND booked_rooms > 0
        "#,
    )
    .bind(room_type_id)
    .bind(stay.first_night())
    .bind(stay.last_night())
    .bind(now)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(released)
}

async fn insert_night(
    conn: &mut SqliteConnection,
    room_type_id: i64,
    date: NaiveDate,
    total_rooms: i64,
    now: DateTime<Utc>,
) -> DbResult<InventoryRecord> {
    let record = sqlx::query_as::<_, InventoryRecord>(
        r#"
        INSERT INTO room_inventories (room_type_id, date, total_rooms, booked_rooms, created_at, updated_at)
        VALUES (?1, ?2, ?3, 0, ?4, ?4)
        RETURNING id, room_type_id, date, total_rooms, booked_rooms, created_at, updated_at
        "#,
    )
    .bind(room_type_id)
    .bind(date)
    .bind(total_rooms)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(record)
}

async fn update_night(
    conn: &mut SqliteConnection,
    id: i64,
    total_rooms: i64,
    booked_rooms: i64,
    now: DateTime<Utc>,
) -> DbResult<InventoryRecord> {
    let record = sqlx::query_as::<_, InventoryRecord>(
        r#"
        UPDATE room_inventories
        SET total_rooms = ?2, booked_rooms = ?3, updated_at = ?4
        WHERE id = ?1
        RETURNING id, room_type_id, date, total_rooms, booked_rooms, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(total_rooms)
    .bind(booked_rooms)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(record)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::pool::{Database, DbConfig};
    use roomledger_core::NewRoomType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let room_type = db
            .room_types()
            .insert(&NewRoomType {
                hotel_id: 1,
                name: "Twin".to_string(),
                capacity: 2,
                base_price_cents: 1000,
                description: None,
            })
            .await
            .unwrap();
        (db, room_type.id)
    }

    async fn force_booked(db: &Database, room_type_id: i64, day: NaiveDate, booked: i64) {
        sqlx::query("UPDATE room_inventories SET booked_rooms = ?3 WHERE room_type_id = ?1 AND date = ?2")
            .bind(room_type_id)
            .bind(day)
            .bind(booked)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_inventory_creates_night() {
        let (db, rt) = setup().await;

        let record = db
            .inventory()
            .set_inventory(rt, date(2024, 6, 1), 10, InventoryResetPolicy::ResetBooked)
            .await
            .unwrap();

        assert_eq!(record.total_rooms, 10);
        assert_eq!(record.booked_rooms, 0);
        assert_eq!(db.inventory().get(rt, date(2024, 6, 1)).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_reset_policy_zeroes_booked_rooms() {
        let (db, rt) = setup().await;
        let inventory = db.inventory();

        inventory
            .set_inventory(rt, date(2024, 6, 1), 10, InventoryResetPolicy::ResetBooked)
            .await
            .unwrap();
        force_booked(&db, rt, date(2024, 6, 1), 4).await;

        let record = inventory
            .set_inventory(rt, date(2024, 6, 1), 8, InventoryResetPolicy::ResetBooked)
            .await
            .unwrap();

        assert_eq!(record.total_rooms, 8);
        assert_eq!(record.booked_rooms, 0);
    }

    #[tokio::test]
    async fn test_preserve_policy_keeps_booked_rooms() {
        let (db, rt) = setup().await;
        let inventory = db.inventory();

        inventory
            .set_inventory(rt, date(2024, 6, 1), 10, InventoryResetPolicy::PreserveBooked)
            .await
            .unwrap();
        force_booked(&db, rt, date(2024, 6, 1), 4).await;

        let record = inventory
            .set_inventory(rt, date(2024, 6, 1), 6, InventoryResetPolicy::PreserveBooked)
            .await
            .unwrap();
        assert_eq!(record.total_rooms, 6);
        assert_eq!(record.booked_rooms, 4);

        let err = inventory
            .set_inventory(rt, date(2024, 6, 1), 3, InventoryResetPolicy::PreserveBooked)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::Validation(ValidationError::BelowBooked {
                requested: 3,
                booked: 4,
                ..
            }))
        ));

        // Rejected write left the row untouched
        let row = inventory.get(rt, date(2024, 6, 1)).await.unwrap().unwrap();
        assert_eq!((row.total_rooms, row.booked_rooms), (6, 4));
    }

    #[tokio::test]
    async fn test_set_inventory_unknown_room_type() {
        let (db, _) = setup().await;

        let err = db
            .inventory()
            .set_inventory(404, date(2024, 6, 1), 5, InventoryResetPolicy::ResetBooked)
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::Rejected(CoreError::RoomTypeNotFound(404))));
    }

    #[tokio::test]
    async fn test_check_availability_reports_missing_nights() {
        let (db, rt) = setup().await;
        let inventory = db.inventory();

        for day in [1, 3] {
            inventory
                .set_inventory(rt, date(2024, 1, day), 5, InventoryResetPolicy::ResetBooked)
                .await
                .unwrap();
        }

        let stay = StayRange::new(date(2024, 1, 1), date(2024, 1, 4)).unwrap();
        let first = inventory.check_availability(rt, &stay).await.unwrap();
        let second = inventory.check_availability(rt, &stay).await.unwrap();

        assert!(!first.is_available());
        assert_eq!(first.missing_nights(), &[date(2024, 1, 2)]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_claim_and_release_are_guarded() {
        let (db, rt) = setup().await;
        let inventory = db.inventory();

        inventory
            .set_inventory(rt, date(2024, 1, 1), 1, InventoryResetPolicy::ResetBooked)
            .await
            .unwrap();
        let stay = StayRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(claim_nights(&mut conn, rt, &stay, Utc::now()).await.unwrap(), 1);
        assert_eq!(claim_nights(&mut conn, rt, &stay, Utc::now()).await.unwrap(), 0);
        assert_eq!(release_nights(&mut conn, rt, &stay, Utc::now()).await.unwrap(), 1);
        assert_eq!(release_nights(&mut conn, rt, &stay, Utc::now()).await.unwrap(), 0);
    }
}

//! # Reservation Committer
//!
//! Turns a validated booking request into a booking, atomically.
//!
//! ## Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reserve(user, room_type, [start, end))                                 │
//! │                                                                         │
//! │  0. room type lookup            → Rejected(RoomTypeNotFound)            │
//! │     unlocked pre-check          → Rejected(InsufficientInventory)       │
//! │  ─────────────────────── BEGIN ───────────────────────────────────────  │
//! │  1. lock_nights                 (blocks other writers)                  │
//! │  2. re-read nights, re-check    → ROLLBACK, InsufficientInventory       │
//! │  3. booked_rooms + 1 per night  (guarded: booked < total)               │
//! │     rows touched != nights      → ROLLBACK, TransactionFailed           │
//! │  4. total = base_price × nights                                         │
//! │  5. INSERT booking (pending)                                            │
//! │  ─────────────────────── COMMIT ──────────────────────────────────────  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every early return drops the transaction, which rolls it back. A request
//! cancelled mid-flight (the future is dropped) rolls back the same way, so
//! no partial increment is ever visible.

use chrono::Utc;
use roomledger_core::pricing::quote_stay;
use roomledger_core::validation::ValidBookingRequest;
use roomledger_core::{check_availability, Availability, Booking, BookingStatus, CoreError, StayRange};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::error::{DbError, LedgerResult};
use crate::lock::lock_nights;
use crate::repository::booking::BOOKING_COLUMNS;
use crate::repository::inventory::{claim_nights, fetch_nights};
use crate::repository::room_type::fetch_room_type;

/// Executes reservations against the inventory ledger.
#[derive(Debug, Clone)]
pub struct ReservationCommitter {
    pool: SqlitePool,
}

impl ReservationCommitter {
    /// Creates a new ReservationCommitter.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationCommitter { pool }
    }

    /// Reserves one room of `request.room_type_id` for every night of the
    /// stay and creates a pending booking for `user_id`.
    ///
    /// ## Errors
    /// - `Rejected(RoomTypeNotFound)`
    /// - `Rejected(InsufficientInventory)` with the offending nights
    /// - `Persistence(..)` on any store failure; nothing was written
    #[instrument(
        skip(self, request),
        fields(
            room_type_id = request.room_type_id,
            start_date = %request.stay.start_date(),
            end_date = %request.stay.end_date(),
        )
    )]
    pub async fn reserve(&self, user_id: i64, request: &ValidBookingRequest) -> LedgerResult<Booking> {
        let room_type_id = request.room_type_id;
        let stay = &request.stay;

        // Fast path: refuse without taking the write lock
        {
            let mut conn = self.pool.acquire().await?;

            if fetch_room_type(&mut conn, room_type_id).await?.is_none() {
                return Err(CoreError::RoomTypeNotFound(room_type_id).into());
            }

            let records = fetch_nights(&mut conn, room_type_id, stay).await?;
            let precheck = check_availability(stay, &records);
            if !precheck.is_available() {
                debug!("Pre-check rejected reservation");
                return Err(insufficient(room_type_id, stay, precheck).into());
            }
        }

        let mut tx = self.pool.begin().await?;

        lock_nights(&mut tx, room_type_id, stay).await?;

        let room_type = fetch_room_type(&mut tx, room_type_id)
            .await?
            .ok_or(CoreError::RoomTypeNotFound(room_type_id))?;

        let records = fetch_nights(&mut tx, room_type_id, stay).await?;
        let availability = check_availability(stay, &records);
        if !availability.is_available() {
            debug!(
                missing = availability.missing_nights().len(),
                sold_out = availability.sold_out_nights().len(),
                "Re-check under lock rejected reservation"
            );
            return Err(insufficient(room_type_id, stay, availability).into());
        }

        let now = Utc::now();
        let claimed = claim_nights(&mut tx, room_type_id, stay, now).await?;
        if claimed != stay.nights() as u64 {
            return Err(DbError::TransactionFailed(format!(
                "claimed {} of {} nights for room type {}",
                claimed,
                stay.nights(),
                room_type_id
            ))
            .into());
        }

        let total_price = quote_stay(room_type.base_price(), stay)?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                user_id, room_type_id, start_date, end_date,
                total_price_cents, guest_count, special_requests, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(room_type_id)
        .bind(stay.start_date())
        .bind(stay.end_date())
        .bind(total_price.cents())
        .bind(request.guest_count)
        .bind(&request.special_requests)
        .bind(BookingStatus::Pending)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            booking_id = booking.id,
            user_id,
            nights = stay.nights(),
            total_price = %total_price,
            "Reservation committed"
        );

        Ok(booking)
    }
}

fn insufficient(room_type_id: i64, stay: &StayRange, availability: Availability) -> CoreError {
    let (missing_nights, sold_out_nights) = match availability {
        Availability::Available { .. } => (Vec::new(), Vec::new()),
        Availability::Unavailable {
            missing_nights,
            sold_out_nights,
            ..
        } => (missing_nights, sold_out_nights),
    };

    CoreError::InsufficientInventory {
        room_type_id,
        start_date: stay.start_date(),
        end_date: stay.end_date(),
        missing_nights,
        sold_out_nights,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use roomledger_core::{InventoryResetPolicy, NewRoomType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(room_type_id: i64, start: NaiveDate, end: NaiveDate) -> ValidBookingRequest {
        ValidBookingRequest {
            room_type_id,
            stay: StayRange::new(start, end).unwrap(),
            guest_count: 2,
            special_requests: Some("High floor".to_string()),
        }
    }

    async fn setup(base_price_cents: i64) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let room_type = db
            .room_types()
            .insert(&NewRoomType {
                hotel_id: 1,
                name: "Double".to_string(),
                capacity: 2,
                base_price_cents,
                description: None,
            })
            .await
            .unwrap();
        (db, room_type.id)
    }

    async fn stock(db: &Database, room_type_id: i64, days: &[NaiveDate], total: i64) {
        for day in days {
            db.inventory()
                .set_inventory(room_type_id, *day, total, InventoryResetPolicy::ResetBooked)
                .await
                .unwrap();
        }
    }

    async fn booked(db: &Database, room_type_id: i64, day: NaiveDate) -> i64 {
        db.inventory().get(room_type_id, day).await.unwrap().unwrap().booked_rooms
    }

    #[tokio::test]
    async fn test_reserve_prices_four_nights() {
        let (db, rt) = setup(1000).await;
        let nights: Vec<_> = (1..=4).map(|d| date(2024, 1, d)).collect();
        stock(&db, rt, &nights, 5).await;

        let booking = db
            .reservations()
            .reserve(7, &request(rt, date(2024, 1, 1), date(2024, 1, 5)))
            .await
            .unwrap();

        assert_eq!(booking.total_price_cents, 4000);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.user_id, 7);
        assert_eq!(booking.guest_count, 2);
        assert_eq!(booking.special_requests.as_deref(), Some("High floor"));
    }

    #[tokio::test]
    async fn test_end_to_end_three_nights() {
        let (db, rt) = setup(12_500).await;
        let nights = [date(2024, 6, 1), date(2024, 6, 2), date(2024, 6, 3)];
        stock(&db, rt, &nights, 10).await;

        let booking = db
            .reservations()
            .reserve(1, &request(rt, date(2024, 6, 1), date(2024, 6, 4)))
            .await
            .unwrap();

        assert_eq!(booking.total_price_cents, 12_500 * 3);
        for night in nights {
            assert_eq!(booked(&db, rt, night).await, 1);
        }
    }

    #[tokio::test]
    async fn test_missing_night_rejects_without_writes() {
        let (db, rt) = setup(1000).await;
        stock(&db, rt, &[date(2024, 1, 1), date(2024, 1, 3)], 5).await;

        let err = db
            .reservations()
            .reserve(1, &request(rt, date(2024, 1, 1), date(2024, 1, 4)))
            .await
            .unwrap_err();

        match err {
            LedgerError::Rejected(CoreError::InsufficientInventory { missing_nights, .. }) => {
                assert_eq!(missing_nights, vec![date(2024, 1, 2)]);
            }
            other => panic!("expected InsufficientInventory, got {other:?}"),
        }
        assert_eq!(booked(&db, rt, date(2024, 1, 1)).await, 0);
        assert_eq!(booked(&db, rt, date(2024, 1, 3)).await, 0);
        assert_eq!(db.bookings().count_for_room_type(rt).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sold_out_last_night_is_atomic() {
        let (db, rt) = setup(1000).await;
        stock(&db, rt, &[date(2024, 3, 1), date(2024, 3, 2)], 2).await;
        stock(&db, rt, &[date(2024, 3, 3)], 0).await;

        let err = db
            .reservations()
            .reserve(1, &request(rt, date(2024, 3, 1), date(2024, 3, 4)))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_rejection(),
            Some(CoreError::InsufficientInventory { sold_out_nights, .. }) if sold_out_nights == &vec![date(2024, 3, 3)]
        ));
        for day in 1..=3 {
            assert_eq!(booked(&db, rt, date(2024, 3, day)).await, 0);
        }
        assert_eq!(db.bookings().count_for_room_type(rt).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_last_room_then_rejection() {
        let (db, rt) = setup(1000).await;
        stock(&db, rt, &[date(2024, 5, 10)], 1).await;
        let req = request(rt, date(2024, 5, 10), date(2024, 5, 11));

        db.reservations().reserve(1, &req).await.unwrap();
        let err = db.reservations().reserve(2, &req).await.unwrap_err();

        assert!(err.is_business_rejection());
        assert_eq!(booked(&db, rt, date(2024, 5, 10)).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_room_type() {
        let (db, _) = setup(1000).await;

        let err = db
            .reservations()
            .reserve(1, &request(99, date(2024, 1, 1), date(2024, 1, 2)))
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::Rejected(CoreError::RoomTypeNotFound(99))));
    }

    #[tokio::test]
    async fn test_checkout_night_needs_no_inventory() {
        let (db, rt) = setup(900).await;
        stock(&db, rt, &[date(2024, 8, 1)], 1).await;

        let booking = db
            .reservations()
            .reserve(3, &request(rt, date(2024, 8, 1), date(2024, 8, 2)))
            .await
            .unwrap();

        assert_eq!(booking.total_price_cents, 900);
    }
}

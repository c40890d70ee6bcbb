//! # Booking Ledger
//!
//! Persisted bookings and their status lifecycle.
//!
//! ## Booking Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Booking Lifecycle                                 │
//! │                                                                         │
//! │  1. CREATE (ReservationCommitter only)                                 │
//! │     └── reserve() → Booking { status: Pending }                        │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── get_by_id(), list_for_user(), list(filter)                     │
//! │                                                                         │
//! │  3. ADMINISTRATIVE STATUS UPDATE                                       │
//! │     └── update_status() → checked against the status machine          │
//! │     └── cancel + release_on_cancel → nights decremented in same tx    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use roomledger_core::{Booking, BookingStatus, CoreError};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbResult, LedgerResult};
use crate::lock::lock_booking;
use crate::repository::inventory::release_nights;

pub(crate) const BOOKING_COLUMNS: &str = "id, user_id, room_type_id, start_date, end_date, \
     total_price_cents, guest_count, special_requests, status, created_at, updated_at";

// =============================================================================
// Listing Types
// =============================================================================

/// Filter for the administrative booking listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingFilter {
    /// Only bookings in this status, if set.
    pub status: Option<BookingStatus>,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl BookingFilter {
    /// First page, no status filter.
    pub fn new(per_page: u32) -> Self {
        BookingFilter {
            status: None,
            page: 1,
            per_page,
        }
    }

    fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }
}

/// One page of bookings, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPage {
    pub data: Vec<Booking>,
    pub page: u32,
    pub per_page: u32,
    /// Matching bookings across all pages.
    pub total: i64,
}

/// Result of an administrative status update.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub booking: Booking,
    pub previous: BookingStatus,
    /// Nights decremented by the cancellation release, 0 if none.
    pub released_nights: u64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for booking reads and status updates.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Gets a booking by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Booking>> {
        let mut conn = self.pool.acquire().await?;
        fetch_booking(&mut conn, id).await
    }

    /// Lists a user's own bookings, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Lists bookings for administrators, newest first, optionally by status.
    pub async fn list(&self, filter: BookingFilter) -> DbResult<BookingPage> {
        let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM bookings");
        push_status_filter(&mut count_query, filter.status);
        let total: i64 = count_query.build_query_scalar().fetch_one(&self.pool).await?;

        let mut page_query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {BOOKING_COLUMNS} FROM bookings"));
        push_status_filter(&mut page_query, filter.status);
        page_query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(filter.per_page))
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let data = page_query.build_query_as::<Booking>().fetch_all(&self.pool).await?;

        debug!(
            status = ?filter.status,
            page = filter.page,
            returned = data.len(),
            total,
            "Listed bookings"
        );

        Ok(BookingPage {
            data,
            page: filter.page,
            per_page: filter.per_page,
            total,
        })
    }

    /// Moves a booking to `next`, enforcing the status machine.
    ///
    /// ## What This Does
    /// 1. Locks the booking's nights
    /// 2. Reads the booking (NotFound if absent)
    /// 3. Validates `current → next` (same status is a no-op)
    /// 4. If `release_on_cancel` and the booking held inventory, decrements
    ///    every night of the stay, never below zero
    /// 5. Writes the new status and commits
    ///
    /// ## Errors
    /// - `Rejected(BookingNotFound)`
    /// - `Rejected(InvalidStatusTransition)`
    pub async fn update_status(
        &self,
        id: i64,
        next: BookingStatus,
        release_on_cancel: bool,
    ) -> LedgerResult<StatusChange> {
        // The first statement must take the write lock, so read the stay
        // outside the transaction and lock by it before re-reading inside.
        let hint = self.get_by_id(id).await?.ok_or(CoreError::BookingNotFound(id))?;

        let mut tx = self.pool.begin().await?;

        lock_booking(&mut tx, &hint).await?;

        let current = fetch_booking(&mut tx, id)
            .await?
            .ok_or(CoreError::BookingNotFound(id))?;
        let previous = current.status;
        let status = previous.transition_to(next)?;

        if status == previous {
            debug!(booking_id = id, %status, "Status unchanged");
            return Ok(StatusChange {
                booking: current,
                previous,
                released_nights: 0,
            });
        }

        let mut released_nights = 0;
        if release_on_cancel && status == BookingStatus::Cancelled && previous.holds_inventory() {
            if let Some(stay) = current.stay() {
                released_nights = release_nights(&mut tx, current.room_type_id, &stay, Utc::now()).await?;
                if released_nights < stay.nights() as u64 {
                    warn!(
                        booking_id = id,
                        released_nights,
                        nights = stay.nights(),
                        "Some nights had no booked room to release"
                    );
                }
            }
        }

        let booking = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = ?2, updated_at = ?3 WHERE id = ?1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            booking_id = id,
            from = %previous,
            to = %status,
            released_nights,
            "Booking status updated"
        );

        Ok(StatusChange {
            booking,
            previous,
            released_nights,
        })
    }

    /// Counts bookings for a room type (diagnostics and tests).
    pub async fn count_for_room_type(&self, room_type_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE room_type_id = ?1")
            .bind(room_type_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn push_status_filter(query: &mut QueryBuilder<'_, Sqlite>, status: Option<BookingStatus>) {
    if let Some(status) = status {
        query.push(" WHERE status = ").push_bind(status);
    }
}

/// Reads one booking on an existing connection or transaction.
pub(crate) async fn fetch_booking(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Booking>> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(booking)
}

// =============================================================================
// Unit Tests
// =============================================================================

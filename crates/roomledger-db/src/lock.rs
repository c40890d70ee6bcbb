//! # Night Locks
//!
//! The locking read that opens every inventory-mutating transaction.
//!
//! ## How It Works On SQLite
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                   (deferred, no lock yet)        │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE room_inventories                 ← first statement              │
//! │     SET booked_rooms = booked_rooms        takes the write lock,        │
//! │   WHERE room_type_id = ?                   waits up to busy_timeout     │
//! │     AND date BETWEEN first AND last        if another writer holds it   │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  SELECT ... (sees latest committed rows, nobody can write until we end) │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT / ROLLBACK                       ← lock released                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite has a single writer per database file, so the lock is coarser
//! than the nights named in the statement: every writer is serialized, not
//! only those touching overlapping nights. The statement still names the
//! nights so the same call maps onto `SELECT ... FOR UPDATE` on a store with
//! row locks.
//!
//! The lock MUST be the first statement of the transaction. A transaction
//! that reads first and writes later can hit `SQLITE_BUSY` on upgrade
//! without the busy handler retrying it.

use chrono::NaiveDate;
use roomledger_core::{Booking, StayRange};
use sqlx::SqliteConnection;
use tracing::trace;

use crate::error::DbResult;

/// Locks the nights of `stay` for `room_type_id` until the transaction ends.
///
/// ## Example
/// ```rust,ignore
/// let mut tx = pool.begin().await?;
/// lock_nights(&mut tx, room_type_id, &stay).await?;
/// let rows = inventory_rows(&mut tx, room_type_id, &stay).await?;
/// ```
pub async fn lock_nights(
    conn: &mut SqliteConnection,
    room_type_id: i64,
    stay: &StayRange,
) -> DbResult<()> {
    lock_dates(conn, room_type_id, stay.first_night(), stay.last_night()).await
}

/// Locks the nights an existing booking occupies.
pub async fn lock_booking(conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
    let (first, last) = booked_span(booking);
    lock_dates(conn, booking.room_type_id, first, last).await
}

/// First and last booked night. The check-out date is not a night.
fn booked_span(booking: &Booking) -> (NaiveDate, NaiveDate) {
    match booking.stay() {
        Some(stay) => (stay.first_night(), stay.last_night()),
        // Rows violating end_date > start_date; lock what is there
        None => (booking.start_date, booking.end_date),
    }
}

/// Locks the inclusive date range `[first, last]` for `room_type_id`.
///
/// Dates without a row still take the lock; set-inventory relies on this
/// when creating a night that does not exist yet.
pub async fn lock_dates(
    conn: &mut SqliteConnection,
    room_type_id: i64,
    first: NaiveDate,
    last: NaiveDate,
) -> DbResult<()> {
    let touched = sqlx::query(
        r#"
        UPDATE room_inventories
        SET booked_rooms = booked_rooms
        WHERE room_type_id = ?1 AND date BETWEEN ?2 AND ?3
        "#,
    )
    .bind(room_type_id)
    .bind(first)
    .bind(last)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    trace!(room_type_id, %first, %last, touched, "Night lock acquired");

    Ok(())
}

//! # Domain Types
//!
//! Core domain types used throughout RoomLedger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │    RoomType     │   │  InventoryRecord    │   │    Booking      │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id             │◄──│  room_type_id  ┐    │   │  id             │   │
//! │  │  hotel_id       │   │  date          ┘ UQ │   │  user_id        │   │
//! │  │  capacity       │   │  total_rooms        │   │  room_type_id   │   │
//! │  │  base_price     │   │  booked_rooms       │   │  start/end_date │   │
//! │  └─────────────────┘   └─────────────────────┘   │  total_price    │   │
//! │   read-only here         0 ≤ booked ≤ total      │  status         │   │
//! │                                                   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::stay::StayRange;

// =============================================================================
// Room Type
// =============================================================================

/// A sellable room category of a hotel.
///
/// Read-only from the booking core's perspective: the price is read at
/// booking time and frozen into the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RoomType {
    pub id: i64,
    pub hotel_id: i64,
    pub name: String,
    /// Maximum guests per room.
    pub capacity: i64,
    /// Nightly base price in cents.
    pub base_price_cents: i64,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl RoomType {
    /// Returns the nightly base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

/// Fields needed to register a room type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomType {
    pub hotel_id: i64,
    pub name: String,
    pub capacity: i64,
    pub base_price_cents: i64,
    pub description: Option<String>,
}

// =============================================================================
// Inventory Record
// =============================================================================

/// Capacity ledger entry for one room type on one calendar night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryRecord {
    pub id: i64,
    pub room_type_id: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Rooms offered that night.
    pub total_rooms: i64,
    /// Rooms already reserved that night.
    pub booked_rooms: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// At least one room is still free this night.
    #[inline]
    pub fn can_book(&self) -> bool {
        self.total_rooms > self.booked_rooms
    }
}

/// How re-setting inventory for an existing night treats its booked count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryResetPolicy {
    /// Overwrite total_rooms and zero booked_rooms.
    ///
    /// Existing reservations stop being counted for that night.
    #[default]
    ResetBooked,
    /// Overwrite total_rooms, keep booked_rooms.
    ///
    /// Rejected when the new total is below the booked count.
    PreserveBooked,
}

impl FromStr for InventoryResetPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" | "reset_booked" => Ok(InventoryResetPolicy::ResetBooked),
            "preserve" | "preserve_booked" => Ok(InventoryResetPolicy::PreserveBooked),
            other => Err(ValidationError::InvalidFormat {
                field: "inventory_reset_policy".to_string(),
                reason: format!("unknown policy '{}', expected reset or preserve", other),
            }),
        }
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle state of a booking. See [`crate::status`] for transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created by a successful reservation, awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed by the hotel.
    Confirmed,
    /// Cancelled before or after confirmation.
    Cancelled,
    /// Stay finished.
    Completed,
}

impl BookingStatus {
    /// Stable lowercase name, as stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: "must be one of: pending, confirmed, cancelled, completed".to_string(),
            }),
        }
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A confirmed reservation against the inventory ledger.
///
/// Uses the snapshot pattern: `total_price_cents` is computed from the room
/// type's base price at booking time and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub room_type_id: i64,
    /// Check-in (inclusive).
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    /// Check-out (exclusive).
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub total_price_cents: i64,
    pub guest_count: i64,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The stay this booking occupies.
    ///
    /// `None` only for rows that violate the `end_date > start_date` check.
    pub fn stay(&self) -> Option<StayRange> {
        StayRange::new(self.start_date, self.end_date).ok()
    }

    /// Whether `user_id` owns this booking.
    #[inline]
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// A request to reserve a stay, as received from the caller.
///
/// Dates are presence-validated by the caller; ordering and "not in the
/// past" are checked by [`crate::validation::validate_booking_request`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingRequest {
    pub room_type_id: i64,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub guest_count: i64,
    #[serde(default)]
    pub special_requests: Option<String>,
}

// =============================================================================
// Actor
// =============================================================================

/// Role carried by an authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Guest,
    Admin,
}

/// The authenticated caller, passed explicitly into every entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub role: ActorRole,
}

impl Actor {
    /// A regular guest user.
    pub const fn guest(user_id: i64) -> Self {
        Actor {
            user_id,
            role: ActorRole::Guest,
        }
    }

    /// An administrator.
    pub const fn admin(user_id: i64) -> Self {
        Actor {
            user_id,
            role: ActorRole::Admin,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == ActorRole::Admin
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

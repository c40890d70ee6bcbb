//! # Error Types
//!
//! Domain-specific error types for roomledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  roomledger-core errors (this file)                                    │
//! │  ├── CoreError        - Business rejections                            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  roomledger-db errors (separate crate)                                 │
//! │  ├── DbError          - Persistence faults                             │
//! │  └── LedgerError      - Rejected(CoreError) | Persistence(DbError)     │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError → client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is a request-level rejection, never a system fault.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rejections raised by the booking core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced room type does not exist.
    #[error("Room type not found: {0}")]
    RoomTypeNotFound(i64),

    /// Referenced booking does not exist.
    #[error("Booking not found: {0}")]
    BookingNotFound(i64),

    /// Availability cannot be guaranteed for the requested stay.
    ///
    /// ## When This Occurs
    /// - A night in the stay has no inventory record at all
    /// - A night in the stay has `booked_rooms == total_rooms`
    /// - Both checked again under lock, so a stale pre-check that passed can
    ///   still end here
    ///
    /// ## Flow
    /// ```text
    /// reserve(room_type=1, 06-01 → 06-04)
    ///      │
    ///      ▼
    /// lock nights 06-01, 06-02, 06-03
    ///      │
    ///      ▼
    /// 06-02 has 10/10 booked
    ///      │
    ///      ▼
    /// InsufficientInventory { sold_out_nights: [06-02], .. }  (rolled back)
    /// ```
    #[error(
        "Insufficient inventory for room type {room_type_id} from {start_date} to {end_date}"
    )]
    InsufficientInventory {
        room_type_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        missing_nights: Vec<NaiveDate>,
        sold_out_nights: Vec<NaiveDate>,
    },

    /// Actor tried to view or mutate something it does not own.
    #[error("Actor {actor_id} is not allowed to access {resource}")]
    Forbidden { actor_id: i64, resource: String },

    /// Status change not allowed by the booking lifecycle.
    #[error("Booking cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Price computation overflowed.
    #[error("Price overflow: {base_cents} × {nights} nights")]
    PriceOverflow { base_cents: i64, nights: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a Forbidden error for a resource description.
    pub fn forbidden(actor_id: i64, resource: impl Into<String>) -> Self {
        CoreError::Forbidden {
            actor_id,
            resource: resource.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any transaction starts; no state changes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Date is earlier than allowed.
    #[error("{field} must be on or after {earliest}")]
    DateInPast { field: String, earliest: NaiveDate },

    /// Check-out is not after check-in.
    #[error("end_date ({end_date}) must be after start_date ({start_date})")]
    EmptyStay {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// Invalid format (e.g., unparsable date, unknown status).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Inventory cannot shrink below what is already booked.
    #[error("total_rooms {requested} is below the {booked} rooms already booked on {date}")]
    BelowBooked {
        date: NaiveDate,
        requested: i64,
        booked: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

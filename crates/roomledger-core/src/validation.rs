//! # Validation Module
//!
//! Input validation for booking and inventory requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                       │
//! │  ├── JSON shape, date parsing                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── start_date >= today, end_date > start_date                        │
//! │  ├── guest_count >= 1, special_requests <= 500 chars                   │
//! │  └── total_rooms >= 0, inventory date >= today                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(room_type_id, date)                                        │
//! │  ├── CHECK (0 <= booked_rooms <= total_rooms)                          │
//! │  └── Foreign key: room_type_id                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before a transaction starts.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::stay::StayRange;
use crate::types::BookingRequest;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_SPECIAL_REQUESTS_LEN, MIN_GUEST_COUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Booking Validators
// =============================================================================

/// Validates a stay against `today`.
///
/// ## Rules
/// - `start_date >= today`
/// - `end_date > start_date`
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use roomledger_core::validation::validate_stay;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
///
/// assert_eq!(validate_stay(start, end, today).unwrap().nights(), 2);
/// assert!(validate_stay(today.pred_opt().unwrap(), end, today).is_err());
/// ```
pub fn validate_stay(
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> ValidationResult<StayRange> {
    if start_date < today {
        return Err(ValidationError::DateInPast {
            field: "start_date".to_string(),
            earliest: today,
        });
    }

    StayRange::new(start_date, end_date)
}

/// Validates a guest count.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_guest_count(guest_count: i64) -> ValidationResult<()> {
    if guest_count < MIN_GUEST_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "guest_count".to_string(),
            min: MIN_GUEST_COUNT,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates optional special requests and normalizes blanks to `None`.
///
/// ## Rules
/// - At most 500 characters
pub fn validate_special_requests(text: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(text) = text else {
        return Ok(None);
    };

    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    if text.chars().count() > MAX_SPECIAL_REQUESTS_LEN {
        return Err(ValidationError::TooLong {
            field: "special_requests".to_string(),
            max: MAX_SPECIAL_REQUESTS_LEN,
        });
    }

    Ok(Some(text.to_string()))
}

/// A booking request that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBookingRequest {
    pub room_type_id: i64,
    pub stay: StayRange,
    pub guest_count: i64,
    pub special_requests: Option<String>,
}

/// Validates a complete booking request.
///
/// Room type existence is checked later against the store.
pub fn validate_booking_request(
    request: &BookingRequest,
    today: NaiveDate,
) -> ValidationResult<ValidBookingRequest> {
    validate_id("room_type_id", request.room_type_id)?;
    let stay = validate_stay(request.start_date, request.end_date, today)?;
    validate_guest_count(request.guest_count)?;
    let special_requests = validate_special_requests(request.special_requests.as_deref())?;

    Ok(ValidBookingRequest {
        room_type_id: request.room_type_id,
        stay,
        guest_count: request.guest_count,
        special_requests,
    })
}

// =============================================================================
// Inventory Validators
// =============================================================================

/// Validates a set-inventory request.
///
/// ## Rules
/// - `date >= today`
/// - `total_rooms >= 0`
pub fn validate_inventory_input(
    date: NaiveDate,
    total_rooms: i64,
    today: NaiveDate,
) -> ValidationResult<()> {
    if date < today {
        return Err(ValidationError::DateInPast {
            field: "date".to_string(),
            earliest: today,
        });
    }

    if total_rooms < 0 {
        return Err(ValidationError::OutOfRange {
            field: "total_rooms".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Misc Validators
// =============================================================================

/// Validates a positive row id.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a date in YYYY-MM-DD format".to_string(),
    })
}

/// Resolves page/per_page query values to `(page, per_page)`, 1-based.
pub fn validate_pagination(page: Option<u32>, per_page: Option<u32>) -> ValidationResult<(u32, u32)> {
    let page = page.unwrap_or(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE);

    if page == 0 {
        return Err(ValidationError::OutOfRange {
            field: "page".to_string(),
            min: 1,
            max: u32::MAX as i64,
        });
    }

    if per_page == 0 || per_page > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "per_page".to_string(),
            min: 1,
            max: MAX_PAGE_SIZE as i64,
        });
    }

    Ok((page, per_page))
}

// =============================================================================
// Unit Tests
// =============================================================================

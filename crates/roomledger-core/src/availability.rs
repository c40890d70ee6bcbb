//! # Availability Checker
//!
//! Decides whether every night of a stay can take one more booking.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_availability(stay, records)                                      │
//! │                                                                         │
//! │  expected nights = end_date − start_date                                │
//! │                                                                         │
//! │  records (room type 1, nights 06-01..06-03):                            │
//! │    06-01  10/4   ✓ can_book                                             │
//! │    06-02  ──     ✗ missing      → missing_nights                        │
//! │    06-03  10/10  ✗ sold out     → sold_out_nights                       │
//! │                                                                         │
//! │  Available  ⇔  no missing night  AND  every record can_book             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The function is pure. Run it once on an unlocked read as a fast
//! pre-check, and again on rows read after the night lock is held; only the
//! second result may authorize a commit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::stay::StayRange;
use crate::types::InventoryRecord;

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Availability {
    /// Every night has a record with capacity left.
    Available { nights: i64 },
    /// At least one night is missing or sold out.
    Unavailable {
        nights: i64,
        missing_nights: Vec<NaiveDate>,
        sold_out_nights: Vec<NaiveDate>,
    },
}

impl Availability {
    /// The boolean answer.
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available { .. })
    }

    /// Number of nights the stay spans.
    pub fn nights(&self) -> i64 {
        match self {
            Availability::Available { nights } | Availability::Unavailable { nights, .. } => *nights,
        }
    }

    /// Nights with no inventory record.
    pub fn missing_nights(&self) -> &[NaiveDate] {
        match self {
            Availability::Available { .. } => &[],
            Availability::Unavailable { missing_nights, .. } => missing_nights,
        }
    }

    /// Nights whose record has no capacity left.
    pub fn sold_out_nights(&self) -> &[NaiveDate] {
        match self {
            Availability::Available { .. } => &[],
            Availability::Unavailable {
                sold_out_nights, ..
            } => sold_out_nights,
        }
    }
}

/// Checks `records` against the nights of `stay`.
///
/// Records for other room types or for dates outside the stay are ignored,
/// so callers may pass a wider read. The caller is responsible for passing
/// records of a single room type.
pub fn check_availability(stay: &StayRange, records: &[InventoryRecord]) -> Availability {
    let nights = stay.nights();

    let in_range: Vec<&InventoryRecord> = records
        .iter()
        .filter(|r| stay.contains_night(r.date))
        .collect();

    let covered: BTreeSet<NaiveDate> = in_range.iter().map(|r| r.date).collect();

    let missing_nights: Vec<NaiveDate> = stay
        .each_night()
        .filter(|night| !covered.contains(night))
        .collect();

    let sold_out: BTreeSet<NaiveDate> = in_range
        .iter()
        .filter(|r| !r.can_book())
        .map(|r| r.date)
        .collect();

    if covered.len() as i64 == nights && missing_nights.is_empty() && sold_out.is_empty() {
        Availability::Available { nights }
    } else {
        Availability::Unavailable {
            nights,
            missing_nights,
            sold_out_nights: sold_out.into_iter().collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

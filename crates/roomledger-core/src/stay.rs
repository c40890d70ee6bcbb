//! # Stay Ranges
//!
//! A stay runs from check-in (inclusive) to check-out (exclusive).
//!
//! ## Nights vs Dates
//! ```text
//! start_date = 06-01                       end_date = 06-04
//!      │                                        │
//!      ▼                                        ▼
//!  ┌────────┐  ┌────────┐  ┌────────┐      ┌────────┐
//!  │ 06-01  │  │ 06-02  │  │ 06-03  │      │ 06-04  │
//!  │ night  │  │ night  │  │ night  │      │checkout│
//!  └────────┘  └────────┘  └────────┘      └────────┘
//!  first_night ─────────── last_night
//!
//!  nights() = end_date − start_date = 3
//! ```
//!
//! Inventory is consumed per night, so every query over inventory uses the
//! inclusive range `[first_night, last_night]`.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A non-empty check-in/check-out range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl StayRange {
    /// Creates a stay range.
    ///
    /// ## Errors
    /// `ValidationError::EmptyStay` unless `end_date > start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, ValidationError> {
        if end_date <= start_date {
            return Err(ValidationError::EmptyStay {
                start_date,
                end_date,
            });
        }

        Ok(StayRange {
            start_date,
            end_date,
        })
    }

    /// Check-in date.
    #[inline]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Check-out date (not occupied).
    #[inline]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// First occupied night.
    #[inline]
    pub const fn first_night(&self) -> NaiveDate {
        self.start_date
    }

    /// Last occupied night, the day before check-out.
    pub fn last_night(&self) -> NaiveDate {
        // end_date > start_date >= NaiveDate::MIN, so a predecessor exists
        self.end_date.pred_opt().unwrap_or(self.start_date)
    }

    /// Number of nights, always >= 1.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Iterates every occupied night in order.
    pub fn each_night(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let start = self.start_date;
        (0..self.nights() as u64).filter_map(move |offset| start.checked_add_days(Days::new(offset)))
    }

    /// Whether `date` is one of the occupied nights.
    pub fn contains_night(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nights_exclude_checkout() {
        let stay = StayRange::new(date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        assert_eq!(stay.nights(), 4);
        assert_eq!(stay.first_night(), date(2024, 1, 1));
        assert_eq!(stay.last_night(), date(2024, 1, 4));
    }

    #[test]
    fn test_single_night() {
        let stay = StayRange::new(date(2024, 6, 1), date(2024, 6, 2)).unwrap();
        assert_eq!(stay.nights(), 1);
        assert_eq!(stay.first_night(), stay.last_night());
        assert_eq!(stay.each_night().collect::<Vec<_>>(), vec![date(2024, 6, 1)]);
    }

    #[test]
    fn test_each_night_crosses_month_boundary() {
        let stay = StayRange::new(date(2024, 2, 28), date(2024, 3, 2)).unwrap();
        let nights: Vec<_> = stay.each_night().collect();
        assert_eq!(nights, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
        assert_eq!(stay.nights(), 3);
    }

    #[test]
    fn test_rejects_empty_or_inverted_range() {
        assert!(matches!(
            StayRange::new(date(2024, 1, 5), date(2024, 1, 5)),
            Err(ValidationError::EmptyStay { .. })
        ));
        assert!(StayRange::new(date(2024, 1, 5), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_contains_night() {
        let stay = StayRange::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        assert!(stay.contains_night(date(2024, 1, 1)));
        assert!(stay.contains_night(date(2024, 1, 2)));
        assert!(!stay.contains_night(date(2024, 1, 3)));
        assert!(!stay.contains_night(date(2023, 12, 31)));
    }
}

//! # Clock
//!
//! "Today" is an input, not a global. Date rules (`start_date >= today`,
//! `date >= today`) take it from a [`Clock`] so tests can pin the calendar.

use chrono::{NaiveDate, Utc};

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    /// Today's date in the booking calendar.
    fn today(&self) -> NaiveDate;
}

/// Production clock: today's UTC date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Test clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub const fn new(today: NaiveDate) -> Self {
        FixedClock { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

//! # Booking Status Machine
//!
//! ```text
//!                  ┌────────────┐
//!   reserve() ───► │  pending   │
//!                  └─────┬──────┘
//!             ┌──────────┴──────────┐
//!             ▼                     ▼
//!      ┌────────────┐        ┌────────────┐
//!      │ confirmed  │──────► │ cancelled  │ (terminal)
//!      └─────┬──────┘        └────────────┘
//!            ▼
//!      ┌────────────┐
//!      │ completed  │ (terminal)
//!      └────────────┘
//! ```
//!
//! Only `reserve()` creates bookings, always as `pending`. Every later move is
//! an administrative action checked here. Re-applying the current status is
//! an idempotent no-op.

use crate::error::{CoreError, CoreResult};
use crate::types::BookingStatus;

impl BookingStatus {
    /// The booking still counts against inventory.
    pub const fn holds_inventory(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Whether `self → next` is allowed.
    pub const fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (*self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    /// Validates `self → next` and returns the resulting status.
    ///
    /// ## Errors
    /// `CoreError::InvalidStatusTransition` when the lifecycle forbids it.
    pub fn transition_to(self, next: BookingStatus) -> CoreResult<BookingStatus> {
        if self == next || self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: self,
                to: next,
            })
        }
    }
}

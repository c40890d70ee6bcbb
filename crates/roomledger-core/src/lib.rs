//! # roomledger-core: Pure Booking Logic for RoomLedger
//!
//! This crate is the **heart** of RoomLedger. It decides whether a stay can be
//! booked and what it costs, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RoomLedger Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    POST /room-types/{id}/booking, POST .../inventories, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ roomledger-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌──────────────┐  ┌───────────┐  ┌─────────┐  │   │
//! │  │   │   stay    │  │ availability │  │  pricing  │  │ status  │  │   │
//! │  │   │ StayRange │  │   checker    │  │  nights × │  │ machine │  │   │
//! │  │   │  nights   │  │              │  │  base     │  │         │  │   │
//! │  │   └───────────┘  └──────────────┘  └───────────┘  └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  roomledger-db (Database Layer)                 │   │
//! │  │      SQLite queries, night locks, reservation transaction       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (RoomType, InventoryRecord, Booking, Actor)
//! - [`stay`] - Check-in/check-out ranges and the nights they occupy
//! - [`availability`] - Per-night capacity decision over inventory records
//! - [`pricing`] - Nightly base price × nights
//! - [`status`] - Booking status lifecycle
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`clock`] - Source of "today" for date rules
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use roomledger_core::money::Money;
//! use roomledger_core::pricing::quote_stay;
//! use roomledger_core::stay::StayRange;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//! let stay = StayRange::new(start, end).unwrap();
//!
//! // Check-out day is not a night: 4 nights
//! assert_eq!(stay.nights(), 4);
//!
//! let total = quote_stay(Money::from_cents(1000), &stay).unwrap();
//! assert_eq!(total.cents(), 4000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod clock;
pub mod error;
pub mod money;
pub mod pricing;
pub mod stay;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use availability::{check_availability, Availability};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use stay::StayRange;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of the free-text special requests on a booking.
pub const MAX_SPECIAL_REQUESTS_LEN: usize = 500;

/// Minimum number of guests on a booking.
pub const MIN_GUEST_COUNT: i64 = 1;

/// Default page size for administrative booking listings.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

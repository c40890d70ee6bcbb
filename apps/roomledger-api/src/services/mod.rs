//! Service implementations.
//!
//! Services hold the use cases behind the HTTP routes. They take an explicit
//! [`roomledger_core::Actor`] and never touch request state.

pub mod booking_service;

pub use booking_service::{BookingDetail, BookingService, BookingServiceConfig};

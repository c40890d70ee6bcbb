//! # Repository Module
//!
//! Database repository implementations for RoomLedger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and What They Own                       │
//! │                                                                         │
//! │  HTTP handler / service                                                │
//! │       │                                                                 │
//! │       │  db.reservations().reserve(user_id, &request)                  │
//! │       ▼                                                                 │
//! │  ReservationCommitter ── writes ──► room_inventories (+1 per night)    │
//! │                       └─ writes ──► bookings (INSERT pending)          │
//! │                                                                         │
//! │  InventoryRepository  ── owns ────► room_inventories (upsert)          │
//! │  BookingRepository    ── owns ────► bookings (reads, status)           │
//! │  RoomTypeRepository   ── reads ───► room_types                         │
//! │                                                                         │
//! │  SQL lives here and nowhere else.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`RoomTypeRepository`] - Room type lookups
//! - [`InventoryRepository`] - Nightly inventory upsert and reads
//! - [`BookingRepository`] - Booking reads, listing and status updates
//! - [`ReservationCommitter`] - The locked reservation transaction

pub mod booking;
pub mod inventory;
pub mod reservation;
pub mod room_type;

pub use booking::{BookingFilter, BookingPage, BookingRepository, StatusChange};
pub use inventory::InventoryRepository;
pub use reservation::ReservationCommitter;
pub use room_type::RoomTypeRepository;

//! # RoomLedger API
//!
//! HTTP server for room inventory and bookings.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          RoomLedger API                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Public        │  │  Guest         │  │  Admin                     ││
//! │  │                │  │  (Bearer JWT)  │  │  (Bearer JWT, role=admin)  ││
//! │  │ • /health      │  │ • book a stay  │  │ • set nightly inventory    ││
//! │  │ • availability │  │ • own bookings │  │ • list / get bookings      ││
//! │  │                │  │ • detail       │  │ • update booking status    ││
//! │  └───────┬────────┘  └───────┬────────┘  └─────────────┬──────────────┘│
//! │          └───────────────────┼─────────────────────────┘               │
//! │                              ▼                                          │
//! │                  ┌──────────────────────┐                               │
//! │                  │   BookingService     │  validation, actor checks     │
//! │                  └──────────┬───────────┘                               │
//! │                             ▼                                           │
//! │                  ┌──────────────────────┐                               │
//! │                  │   roomledger-db      │  SQLite, locked transactions  │
//! │                  └──────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - HTTP port (default: 8080)
//! - `DATABASE_PATH` - SQLite file (default: ./roomledger.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DB_BUSY_TIMEOUT_SECS` - Write lock wait (default: 5)
//! - `JWT_SECRET` - Secret for bearer token verification
//! - `JWT_LIFETIME_SECS` - Lifetime of locally issued tokens (default: 3600)
//! - `INVENTORY_RESET_POLICY` - `reset` or `preserve` (default: reset)
//! - `RELEASE_INVENTORY_ON_CANCEL` - `true` or `false` (default: false)
//! - `DEFAULT_PAGE_SIZE` - Admin listing page size (default: 15)

use std::sync::Arc;

use axum::extract::FromRef;
use roomledger_core::Clock;
use roomledger_db::Database;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;

// Re-exports
pub use auth::JwtManager;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use services::{BookingService, BookingServiceConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database handle
    pub db: Database,

    /// Bearer token verification
    pub jwt: Arc<JwtManager>,

    /// Booking use cases
    pub bookings: BookingService,
}

impl AppState {
    /// Wires the state from configuration.
    pub fn new(db: Database, config: &ApiConfig, clock: Arc<dyn Clock>) -> Self {
        let jwt = Arc::new(JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs));

        let bookings = BookingService::new(
            db.clone(),
            clock,
            BookingServiceConfig {
                reset_policy: config.inventory_reset_policy,
                release_on_cancel: config.release_inventory_on_cancel,
                default_page_size: config.default_page_size,
            },
        );

        AppState { db, jwt, bookings }
    }
}

impl FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

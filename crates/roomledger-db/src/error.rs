//! # Database Error Types
//!
//! Store failures, and the split between refusals and faults.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← constraint kind, busy, pool                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LedgerError ← Rejected(CoreError) | Persistence(DbError)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in roomledger-api) ← Serialized { code, message }           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Rejected` error means the request was refused and nothing changed. A
//! `Persistence` error means the store failed; the transaction was rolled back.

use roomledger_core::{CoreError, ValidationError};
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Store failures.
///
/// Constraint variants mean a guard in this crate was bypassed: every write
/// is checked in code before it reaches the schema.
#[derive(Debug, Error)]
pub enum DbError {
    /// A `fetch_one` found no row.
    #[error("Row not found")]
    NotFound,

    /// The write lock was not obtained within `busy_timeout`.
    ///
    /// ## When This Occurs
    /// - A long queue of reservations on the same database
    /// - A writer holding the lock longer than the timeout
    #[error("Database busy: {0}")]
    Busy(String),

    /// UNIQUE index violated, e.g. a second row for one (room_type_id, date).
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Row references a room type that does not exist.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// CHECK violated.
    ///
    /// ## When This Occurs
    /// - A write would leave `booked_rooms` above `total_rooms` or below 0
    /// - A booking row with `end_date <= start_date`
    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A transaction could not complete as locked.
    ///
    /// ## When This Occurs
    /// - A guarded write touched fewer nights than the lock covered
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

// SQLITE_BUSY and its extended codes (BUSY_RECOVERY, BUSY_SNAPSHOT, ...)
fn is_sqlite_busy(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| c & 0xff == 5)
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();

                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation(message),
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation(message),
                    ErrorKind::CheckViolation => DbError::CheckViolation(message),
                    _ if is_sqlite_busy(db_err.code().as_deref()) => DbError::Busy(message),
                    _ => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Ledger Error
// =============================================================================

/// Outcome of a ledger operation that can be refused or can fail.
///
/// ## Why Two Arms
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Rejected(CoreError)        Persistence(DbError)                        │
/// │  ───────────────────        ────────────────────                        │
/// │  InsufficientInventory      busy timeout, disk, pool                    │
/// │  RoomTypeNotFound           constraint bypassed                         │
/// │  InvalidStatusTransition                                                │
/// │  Validation                                                             │
/// │                                                                         │
/// │  → 4xx, expected            → 500, logged                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Business rejection. No state changed.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Store failure. The transaction was rolled back.
    #[error(transparent)]
    Persistence(#[from] DbError),
}

impl LedgerError {
    /// True for request-level rejections.
    pub fn is_business_rejection(&self) -> bool {
        matches!(self, LedgerError::Rejected(_))
    }

    /// The business rejection, if this is one.
    pub fn as_rejection(&self) -> Option<&CoreError> {
        match self {
            LedgerError::Rejected(err) => Some(err),
            LedgerError::Persistence(_) => None,
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Rejected(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Persistence(DbError::from(err))
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

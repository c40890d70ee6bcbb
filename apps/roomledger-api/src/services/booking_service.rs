//! Booking service.
//!
//! The use cases of the booking engine, one method per operation:
//!
//! ```text
//! ┌────────────────────────┬──────────┬───────────────────────────────────┐
//! │ Operation              │ Actor    │ Delegates to                      │
//! ├────────────────────────┼──────────┼───────────────────────────────────┤
//! │ check_availability     │ anyone   │ InventoryRepository (unlocked)    │
//! │ reserve                │ any user │ ReservationCommitter              │
//! │ set_inventory          │ admin    │ InventoryRepository (locked)      │
//! │ list_own_bookings      │ any user │ BookingRepository                 │
//! │ booking_detail         │ owner    │ BookingRepository + RoomTypes     │
//! │ admin_list_bookings    │ admin    │ BookingRepository                 │
//! │ admin_get_booking      │ admin    │ BookingRepository                 │
//! │ admin_update_status    │ admin    │ BookingRepository (locked)        │
//! └────────────────────────┴──────────┴───────────────────────────────────┘
//! ```
//!
//! Input is validated here, before any transaction starts. "Today" comes
//! from the injected [`Clock`].

use std::sync::Arc;

use chrono::NaiveDate;
use roomledger_core::validation::{
    validate_booking_request, validate_id, validate_inventory_input, validate_pagination,
};
use roomledger_core::{
    Actor, Availability, Booking, BookingRequest, BookingStatus, Clock, CoreError, CoreResult,
    InventoryRecord, InventoryResetPolicy, RoomType, StayRange, DEFAULT_PAGE_SIZE,
};
use roomledger_db::{BookingFilter, BookingPage, Database, LedgerResult, StatusChange};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Policies the service applies on behalf of the deployment.
#[derive(Debug, Clone, Copy)]
pub struct BookingServiceConfig {
    pub reset_policy: InventoryResetPolicy,
    pub release_on_cancel: bool,
    pub default_page_size: u32,
}

impl Default for BookingServiceConfig {
    fn default() -> Self {
        BookingServiceConfig {
            reset_policy: InventoryResetPolicy::ResetBooked,
            release_on_cancel: false,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A booking together with its room type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetail {
    pub booking: Booking,
    pub room_type: RoomType,
}

/// Booking engine use cases.
#[derive(Clone)]
pub struct BookingService {
    db: Database,
    clock: Arc<dyn Clock>,
    config: BookingServiceConfig,
}

impl BookingService {
    /// Create a new booking service.
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: BookingServiceConfig) -> Self {
        BookingService { db, clock, config }
    }

    // =========================================================================
    // Public operations
    // =========================================================================

    /// Read-only availability of `room_type_id` for `[start_date, end_date)`.
    ///
    /// Repeated calls with no writes in between return the same answer.
    pub async fn check_availability(
        &self,
        room_type_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> LedgerResult<Availability> {
        validate_id("room_type_id", room_type_id)?;
        let stay = StayRange::new(start_date, end_date)?;

        if self.db.room_types().get_by_id(room_type_id).await?.is_none() {
            return Err(CoreError::RoomTypeNotFound(room_type_id).into());
        }

        let availability = self.db.inventory().check_availability(room_type_id, &stay).await?;
        debug!(room_type_id, nights = stay.nights(), available = availability.is_available(), "Availability checked");

        Ok(availability)
    }

    /// Reserves the stay in `request` for the actor and returns the pending
    /// booking.
    pub async fn reserve(&self, actor: Actor, request: &BookingRequest) -> LedgerResult<Booking> {
        let valid = validate_booking_request(request, self.clock.today())?;
        self.db.reservations().reserve(actor.user_id, &valid).await
    }

    // =========================================================================
    // User bookings
    // =========================================================================

    /// The actor's own bookings, newest first.
    pub async fn list_own_bookings(&self, actor: Actor) -> LedgerResult<Vec<Booking>> {
        Ok(self.db.bookings().list_for_user(actor.user_id).await?)
    }

    /// One of the actor's own bookings with its room type.
    ///
    /// ## Errors
    /// - `BookingNotFound` if no such booking exists
    /// - `Forbidden` if the booking belongs to another user
    pub async fn booking_detail(&self, actor: Actor, booking_id: i64) -> LedgerResult<BookingDetail> {
        let booking = self.find_booking(booking_id).await?;

        if !booking.is_owned_by(actor.user_id) {
            return Err(CoreError::forbidden(actor.user_id, format!("booking {}", booking_id)).into());
        }

        let room_type = self
            .db
            .room_types()
            .get_by_id(booking.room_type_id)
            .await?
            .ok_or(CoreError::RoomTypeNotFound(booking.room_type_id))?;

        Ok(BookingDetail { booking, room_type })
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Creates or overwrites the inventory of one night.
    pub async fn set_inventory(
        &self,
        actor: Actor,
        room_type_id: i64,
        date: NaiveDate,
        total_rooms: i64,
    ) -> LedgerResult<InventoryRecord> {
        require_admin(actor, "inventory")?;
        validate_id("room_type_id", room_type_id)?;
        validate_inventory_input(date, total_rooms, self.clock.today())?;

        self.db
            .inventory()
            .set_inventory(room_type_id, date, total_rooms, self.config.reset_policy)
            .await
    }

    /// All bookings, newest first, optionally filtered by status.
    pub async fn admin_list_bookings(
        &self,
        actor: Actor,
        status: Option<BookingStatus>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> LedgerResult<BookingPage> {
        require_admin(actor, "bookings")?;
        let (page, per_page) = validate_pagination(page, per_page.or(Some(self.config.default_page_size)))?;

        let filter = BookingFilter {
            status,
            page,
            per_page,
        };

        Ok(self.db.bookings().list(filter).await?)
    }

    /// Any booking by id.
    pub async fn admin_get_booking(&self, actor: Actor, booking_id: i64) -> LedgerResult<Booking> {
        require_admin(actor, format!("booking {}", booking_id))?;
        self.find_booking(booking_id).await
    }

    /// Moves a booking to `status`, honoring the status machine and the
    /// cancellation release policy.
    pub async fn admin_update_status(
        &self,
        actor: Actor,
        booking_id: i64,
        status: BookingStatus,
    ) -> LedgerResult<StatusChange> {
        require_admin(actor, format!("booking {}", booking_id))?;
        validate_id("booking_id", booking_id)?;

        let change = self
            .db
            .bookings()
            .update_status(booking_id, status, self.config.release_on_cancel)
            .await?;

        info!(
            booking_id,
            admin_id = actor.user_id,
            from = %change.previous,
            to = %change.booking.status,
            released_nights = change.released_nights,
            "Booking status updated"
        );

        Ok(change)
    }

    async fn find_booking(&self, booking_id: i64) -> LedgerResult<Booking> {
        validate_id("booking_id", booking_id)?;

        let booking = self
            .db
            .bookings()
            .get_by_id(booking_id)
            .await?
            .ok_or(CoreError::BookingNotFound(booking_id))?;

        Ok(booking)
    }
}

fn require_admin(actor: Actor, resource: impl Into<String>) -> CoreResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(CoreError::forbidden(actor.user_id, resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomledger_core::{FixedClock, NewRoomType, ValidationError};
    use roomledger_db::{DbConfig, LedgerError};

    const ADMIN: Actor = Actor::admin(1);
    const ALICE: Actor = Actor::guest(10);
    const BOB: Actor = Actor::guest(20);

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    async fn service(config: BookingServiceConfig) -> (BookingService, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let room_type = db
            .room_types()
            .insert(&NewRoomType {
                hotel_id: 1,
                name: "Deluxe".to_string(),
                capacity: 2,
                base_price_cents: 1000,
                description: None,
            })
            .await
            .unwrap();

        let clock = Arc::new(FixedClock::new(date(1, 1)));
        (BookingService::new(db, clock, config), room_type.id)
    }

    fn request(room_type_id: i64, start: NaiveDate, end: NaiveDate) -> BookingRequest {
        BookingRequest {
            room_type_id,
            start_date: start,
            end_date: end,
            guest_count: 2,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_reserve_and_view_own_booking() {
        let (svc, rt) = service(BookingServiceConfig::default()).await;
        for d in 1..=4 {
            svc.set_inventory(ADMIN, rt, date(1, d), 3).await.unwrap();
        }

        let booking = svc.reserve(ALICE, &request(rt, date(1, 1), date(1, 5))).await.unwrap();
        assert_eq!(booking.total_price_cents, 4000);
        assert_eq!(booking.user_id, ALICE.user_id);

        let detail = svc.booking_detail(ALICE, booking.id).await.unwrap();
        assert_eq!(detail.room_type.id, rt);

        let own = svc.list_own_bookings(ALICE).await.unwrap();
        assert_eq!(own.len(), 1);
        assert!(svc.list_own_bookings(BOB).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_users_booking_is_forbidden() {
        let (svc, rt) = service(BookingServiceConfig::default()).await;
        svc.set_inventory(ADMIN, rt, date(2, 1), 1).await.unwrap();
        let booking = svc.reserve(ALICE, &request(rt, date(2, 1), date(2, 2))).await.unwrap();

        let err = svc.booking_detail(BOB, booking.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::Forbidden { .. })));

        let err = svc.booking_detail(BOB, 999).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::BookingNotFound(999))));
    }

    #[tokio::test]
    async fn test_reserve_in_the_past_rejected() {
        let (svc, rt) = service(BookingServiceConfig::default()).await;

        let err = svc
            .reserve(ALICE, &request(rt, NaiveDate::from_ymd_opt(2023, 12, 30).unwrap(), date(1, 2)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::Validation(ValidationError::DateInPast { .. }))
        ));
    }

    #[tokio::test]
    async fn test_set_inventory_requires_admin() {
        let (svc, rt) = service(BookingServiceConfig::default()).await;

        let err = svc.set_inventory(ALICE, rt, date(3, 1), 5).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::Forbidden { .. })));

        let err = svc.set_inventory(ADMIN, rt, date(3, 1), -1).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_availability_is_repeatable() {
        let (svc, rt) = service(BookingServiceConfig::default()).await;
        svc.set_inventory(ADMIN, rt, date(1, 1), 2).await.unwrap();
        svc.set_inventory(ADMIN, rt, date(1, 3), 2).await.unwrap();

        let first = svc.check_availability(rt, date(1, 1), date(1, 4)).await.unwrap();
        let second = svc.check_availability(rt, date(1, 1), date(1, 4)).await.unwrap();

        assert_eq!(first, second);
        assert!(!first.is_available());
        assert_eq!(first.missing_nights(), &[date(1, 2)]);

        let err = svc.check_availability(77, date(1, 1), date(1, 2)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::RoomTypeNotFound(77))));
    }

    #[tokio::test]
    async fn test_admin_listing_uses_configured_page_size() {
        let config = BookingServiceConfig {
            default_page_size: 2,
            ..BookingServiceConfig::default()
        };
        let (svc, rt) = service(config).await;
        svc.set_inventory(ADMIN, rt, date(4, 1), 10).await.unwrap();
        for _ in 0..3 {
            svc.reserve(ALICE, &request(rt, date(4, 1), date(4, 2))).await.unwrap();
        }

        let page = svc.admin_list_bookings(ADMIN, None, None, None).await.unwrap();
        assert_eq!(page.per_page, 2);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 3);

        let err = svc.admin_list_bookings(ALICE, None, None, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_cancel_releases_when_configured() {
        let config = BookingServiceConfig {
            release_on_cancel: true,
            ..BookingServiceConfig::default()
        };
        let (svc, rt) = service(config).await;
        svc.set_inventory(ADMIN, rt, date(5, 1), 1).await.unwrap();
        let booking = svc.reserve(ALICE, &request(rt, date(5, 1), date(5, 2))).await.unwrap();

        let change = svc
            .admin_update_status(ADMIN, booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(change.released_nights, 1);

        // The room is sellable again
        svc.reserve(BOB, &request(rt, date(5, 1), date(5, 2))).await.unwrap();
    }
}

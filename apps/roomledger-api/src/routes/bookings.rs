//! Guest booking routes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roomledger_core::validation::parse_date;
use roomledger_core::{Booking, BookingRequest, ValidationError};
use serde::Deserialize;

use crate::auth::AuthActor;
use crate::error::ApiResult;
use crate::services::BookingDetail;
use crate::AppState;

/// Body of a booking request. Presence is checked here, rules in the core.
#[derive(Debug, Deserialize)]
pub struct CreateBookingBody {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub guest_count: Option<i64>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// `POST /api/room-types/{room_type_id}/booking`
pub async fn create_booking(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateBookingBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let Path(room_type_id) = path?;
    let Json(body) = body?;

    let request = BookingRequest {
        room_type_id,
        start_date: parse_date("start_date", body.start_date.as_deref().unwrap_or_default())?,
        end_date: parse_date("end_date", body.end_date.as_deref().unwrap_or_default())?,
        guest_count: body.guest_count.ok_or_else(|| ValidationError::Required {
            field: "guest_count".to_string(),
        })?,
        special_requests: body.special_requests,
    };

    let booking = state.bookings.reserve(actor, &request).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// `GET /api/bookings`
pub async fn list_own_bookings(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Vec<Booking>>> {
    let bookings = state.bookings.list_own_bookings(actor).await?;
    Ok(Json(bookings))
}

/// `GET /api/bookings/{id}`
pub async fn get_own_booking(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<BookingDetail>> {
    let Path(booking_id) = path?;

    let detail = state.bookings.booking_detail(actor, booking_id).await?;
    Ok(Json(detail))
}

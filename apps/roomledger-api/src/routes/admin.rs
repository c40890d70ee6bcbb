//! Administrative routes. Every handler requires the admin role.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use roomledger_core::validation::parse_date;
use roomledger_core::{Booking, BookingStatus, InventoryRecord, ValidationError};
use roomledger_db::BookingPage;
use serde::Deserialize;

use crate::auth::AdminActor;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SetInventoryBody {
    pub date: Option<String>,
    pub total_rooms: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
}

/// `POST /api/admin/room-types/{room_type_id}/inventories`
pub async fn set_inventory(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<SetInventoryBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InventoryRecord>)> {
    let Path(room_type_id) = path?;
    let Json(body) = body?;

    let date = parse_date("date", body.date.as_deref().unwrap_or_default())?;
    let total_rooms = body.total_rooms.ok_or_else(|| ValidationError::Required {
        field: "total_rooms".to_string(),
    })?;

    let record = state
        .bookings
        .set_inventory(actor, room_type_id, date, total_rooms)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/admin/bookings?status&page&per_page`
pub async fn list_bookings(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    query: Result<Query<ListBookingsQuery>, QueryRejection>,
) -> ApiResult<Json<BookingPage>> {
    let Query(query) = query?;

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<BookingStatus>()?),
    };

    let page = state
        .bookings
        .admin_list_bookings(actor, status, query.page, query.per_page)
        .await?;

    Ok(Json(page))
}

/// `GET /api/admin/bookings/{id}`
pub async fn get_booking(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Booking>> {
    let Path(booking_id) = path?;

    let booking = state.bookings.admin_get_booking(actor, booking_id).await?;
    Ok(Json(booking))
}

/// `PUT /api/admin/bookings/{id}`
pub async fn update_booking_status(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> ApiResult<Json<Booking>> {
    let Path(booking_id) = path?;
    let Json(body) = body?;

    let status: BookingStatus = body
        .status
        .ok_or_else(|| ValidationError::Required {
            field: "status".to_string(),
        })?
        .parse()?;

    let change = state
        .bookings
        .admin_update_status(actor, booking_id, status)
        .await?;

    Ok(Json(change.booking))
}

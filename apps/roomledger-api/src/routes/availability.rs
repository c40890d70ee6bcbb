//! Public availability query.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use roomledger_core::validation::parse_date;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub room_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
    pub nights: i64,
    pub missing_nights: Vec<NaiveDate>,
    pub sold_out_nights: Vec<NaiveDate>,
}

/// `GET /api/room-types/{room_type_id}/availability?start_date&end_date`
pub async fn check_availability(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let Path(room_type_id) = path?;
    let Query(query) = query?;

    let start_date = parse_date("start_date", query.start_date.as_deref().unwrap_or_default())?;
    let end_date = parse_date("end_date", query.end_date.as_deref().unwrap_or_default())?;

    let availability = state
        .bookings
        .check_availability(room_type_id, start_date, end_date)
        .await?;

    Ok(Json(AvailabilityResponse {
        room_type_id,
        start_date,
        end_date,
        available: availability.is_available(),
        nights: availability.nights(),
        missing_nights: availability.missing_nights().to_vec(),
        sold_out_nights: availability.sold_out_nights().to_vec(),
    }))
}

//! Reservation routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use database::models::{NewReservation, Reservation, ReservationStatus};
use database::{reservation, ValidationError};

use crate::error::{ApiError, Result};
use crate::routes::{parse_id, Data};
use crate::state::AppState;

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub mobile_number: Option<String>,
}

/// Reservation fields as they arrive on the wire. Everything is optional
/// here; [`ReservationPayload::into_new_reservation`] is the validation step
/// that either produces a fully-typed record or a 400.
#[derive(Debug, Deserialize)]
pub struct ReservationPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile_number: Option<String>,
    pub reservation_date: Option<String>,
    pub reservation_time: Option<String>,
    pub people: Option<i64>,
    pub status: Option<String>,
}

impl ReservationPayload {
    fn into_new_reservation(self) -> std::result::Result<NewReservation, ValidationError> {
        let first_name = self.first_name.ok_or(ValidationError::Missing("first_name"))?;
        let last_name = self.last_name.ok_or(ValidationError::Missing("last_name"))?;
        let mobile_number = self
            .mobile_number
            .ok_or(ValidationError::Missing("mobile_number"))?;

        let raw_date = self
            .reservation_date
            .ok_or(ValidationError::Missing("reservation_date"))?;
        let reservation_date = parse_date("reservation_date", &raw_date)?;

        let raw_time = self
            .reservation_time
            .ok_or(ValidationError::Missing("reservation_time"))?;
        let reservation_time = parse_time("reservation_time", &raw_time)?;

        let people = self.people.ok_or(ValidationError::Missing("people"))?;

        let status = match self.status.as_deref() {
            Some(s) => s.parse::<ReservationStatus>()?,
            None => ReservationStatus::Booked,
        };

        Ok(NewReservation {
            first_name,
            last_name,
            mobile_number,
            reservation_date,
            reservation_time,
            people,
            status,
        })
    }
}

/// Status payload for `PUT /reservations/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: Option<String>,
}

fn parse_date(field: &'static str, raw: &str) -> std::result::Result<NaiveDate, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn parse_time(field: &'static str, raw: &str) -> std::result::Result<NaiveTime, ValidationError> {
    // The dashboard submits "HH:MM"; accept seconds too.
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| ValidationError::InvalidTime {
            field,
            value: raw.to_string(),
        })
}

/// List reservations for a date, or search by mobile number fragment.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Data<Vec<Reservation>>>> {
    let pool = state.db.pool();

    let reservations = if let Some(raw) = query.date.as_deref() {
        let date = parse_date("date", raw)?;
        reservation::list_on_date(pool, date).await?
    } else if let Some(fragment) = query.mobile_number.as_deref() {
        reservation::search_by_mobile(pool, fragment).await?
    } else {
        return Err(ApiError::BadRequest(
            "Either a date or a mobile_number query parameter is required.".to_string(),
        ));
    };

    Ok(Json(Data { data: reservations }))
}

/// Get a single reservation.
pub async fn read(
    State(state): State<AppState>,
    Path(reservation_id): Path<String>,
) -> Result<Json<Data<Reservation>>> {
    let id = parse_id("Reservation", &reservation_id)?;
    let found = reservation::get(state.db.pool(), id).await?;
    Ok(Json(Data { data: found }))
}

/// Create a reservation.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Data<ReservationPayload>>, JsonRejection>,
) -> Result<(StatusCode, Json<Data<Reservation>>)> {
    let Json(body) = payload.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let new = body.data.into_new_reservation()?;

    let created = reservation::create(state.db.pool(), &new).await?;
    Ok((StatusCode::CREATED, Json(Data { data: created })))
}

/// Update the editable fields of a reservation.
pub async fn update(
    State(state): State<AppState>,
    Path(reservation_id): Path<String>,
    payload: std::result::Result<Json<Data<ReservationPayload>>, JsonRejection>,
) -> Result<Json<Data<Reservation>>> {
    let id = parse_id("Reservation", &reservation_id)?;
    let Json(body) = payload.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let new = body.data.into_new_reservation()?;

    let updated = reservation::update(state.db.pool(), id, &new).await?;
    Ok(Json(Data { data: updated }))
}

/// Move a reservation through its status lifecycle (including cancel).
pub async fn update_status(
    State(state): State<AppState>,
    Path(reservation_id): Path<String>,
    payload: std::result::Result<Json<Data<StatusPayload>>, JsonRejection>,
) -> Result<Json<Data<Reservation>>> {
    let id = parse_id("Reservation", &reservation_id)?;
    let Json(body) = payload.map_err(|err| ApiError::BadRequest(err.body_text()))?;

    let raw = body.data.status.ok_or(ValidationError::Missing("status"))?;
    let status = raw.parse::<ReservationStatus>()?;

    let updated = reservation::update_status(state.db.pool(), id, status).await?;
    Ok(Json(Data { data: updated }))
}

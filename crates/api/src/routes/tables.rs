//! Table routes, including the seat/finish workflow endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use database::models::{NewTable, Table};
use database::{seating, table, ValidationError};

use crate::error::{ApiError, Result};
use crate::routes::{parse_id, Data};
use crate::state::AppState;

/// Table fields as they arrive on the wire.
#[derive(Debug, Deserialize)]
pub struct TablePayload {
    pub table_name: Option<String>,
    pub capacity: Option<i64>,
}

impl TablePayload {
    fn into_new_table(self) -> std::result::Result<NewTable, ValidationError> {
        let table_name = self.table_name.ok_or(ValidationError::Missing("table_name"))?;
        let capacity = self.capacity.ok_or(ValidationError::Missing("capacity"))?;
        Ok(NewTable {
            table_name,
            capacity,
        })
    }
}

/// Seat payload for `PUT /tables/{id}/seat`.
#[derive(Debug, Deserialize)]
pub struct SeatPayload {
    pub reservation_id: Option<i64>,
}

/// List all tables.
pub async fn list(State(state): State<AppState>) -> Result<Json<Data<Vec<Table>>>> {
    let tables = table::list(state.db.pool()).await?;
    Ok(Json(Data { data: tables }))
}

/// Create a table.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Data<TablePayload>>, JsonRejection>,
) -> Result<(StatusCode, Json<Data<Table>>)> {
    let Json(body) = payload.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let new = body.data.into_new_table()?;

    let created = table::create(state.db.pool(), &new).await?;
    Ok((StatusCode::CREATED, Json(Data { data: created })))
}

/// Seat a reservation at a table.
pub async fn seat(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
    payload: std::result::Result<Json<Data<SeatPayload>>, JsonRejection>,
) -> Result<Json<Data<Table>>> {
    let id = parse_id("Table", &table_id)?;

    // An unreadable or absent body is the same as a missing reservation_id;
    // the workflow still checks the table first so a bad table id stays 404.
    let reservation_id = match payload {
        Ok(Json(body)) => body.data.reservation_id,
        Err(_) => None,
    };

    let seated = seating::seat_reservation(state.db.pool(), id, reservation_id).await?;
    Ok(Json(Data { data: seated }))
}

/// Finish the reservation seated at a table, freeing it.
pub async fn finish(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
) -> Result<Json<Data<Table>>> {
    let id = parse_id("Table", &table_id)?;
    let freed = seating::finish_table(state.db.pool(), id).await?;
    Ok(Json(Data { data: freed }))
}

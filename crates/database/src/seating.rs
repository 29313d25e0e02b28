//! Seating workflow.
//!
//! Gates the compound table operations behind ordered precondition checks so
//! a table and its reservation never disagree about who is seated where:
//! a reservation moves booked → seated → finished while its table moves
//! free → occupied → free, and the pair changes together or not at all.
//!
//! The checks here read current state and fail fast with a friendly error;
//! the racy ones (table free, reservation booked) are re-verified inside the
//! [`table::seat`] / [`table::finish`] transaction, which is what actually
//! guarantees the invariant under concurrent requests.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DatabaseError, Result};
use crate::models::{ReservationStatus, Table};
use crate::validation::ValidationError;
use crate::{reservation, table};

/// Seat a reservation at a table.
///
/// Preconditions, checked in order (first failure wins):
/// 1. the table exists;
/// 2. a `reservation_id` was supplied;
/// 3. the reservation exists;
/// 4. the table's capacity fits the party;
/// 5. the table is free;
/// 6. the reservation is still `booked` — a party already seated elsewhere
///    cannot be seated twice.
pub async fn seat_reservation(
    pool: &SqlitePool,
    table_id: i64,
    reservation_id: Option<i64>,
) -> Result<Table> {
    let table = table::get(pool, table_id).await?;

    let reservation_id =
        reservation_id.ok_or(ValidationError::Missing("reservation_id"))?;

    let reservation = reservation::get(pool, reservation_id).await?;

    if table.capacity < reservation.people {
        return Err(DatabaseError::InsufficientCapacity { table_id });
    }

    if table.reservation_id.is_some() {
        return Err(DatabaseError::TableOccupied { id: table_id });
    }

    if reservation.status != ReservationStatus::Booked {
        return Err(DatabaseError::AlreadySeated {
            id: reservation_id,
            status: reservation.status,
        });
    }

    let seated = table::seat(pool, reservation_id, table_id).await?;

    info!(reservation_id, table_id, "Reservation seated");

    Ok(seated)
}

/// Finish the reservation currently seated at a table, freeing the table.
///
/// Preconditions: the table exists and currently holds a reservation.
pub async fn finish_table(pool: &SqlitePool, table_id: i64) -> Result<Table> {
    let table = table::get(pool, table_id).await?;

    let reservation_id = table
        .reservation_id
        .ok_or(DatabaseError::TableNotOccupied { id: table_id })?;

    let freed = table::finish(pool, reservation_id, table_id).await?;

    info!(reservation_id, table_id, "Table finished");

    Ok(freed)
}

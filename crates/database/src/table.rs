//! Table CRUD and the compound seat/finish operations.
//!
//! `seat` and `finish` are the only writers of a table's `occupied` flag and
//! `reservation_id` reference. Each runs its two writes (reservation status,
//! table assignment) in one transaction with conditional `WHERE` clauses, so
//! the free/booked checks are atomic with the writes: losing a race fails
//! the whole operation instead of leaving the pair half-updated.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewTable, ReservationStatus, Table};
use crate::validation;

/// List all tables ordered by name.
pub async fn list(pool: &SqlitePool) -> Result<Vec<Table>> {
    let tables = sqlx::query_as::<_, Table>(
        r#"
        SELECT table_id, table_name, capacity, occupied, reservation_id,
               created_at, updated_at
        FROM tables
        ORDER BY table_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tables)
}

/// Get a table by ID.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Table> {
    sqlx::query_as::<_, Table>(
        r#"
        SELECT table_id, table_name, capacity, occupied, reservation_id,
               created_at, updated_at
        FROM tables
        WHERE table_id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Table",
        id: id.to_string(),
    })
}

/// Create a new table. Tables start free with no assigned reservation.
pub async fn create(pool: &SqlitePool, new: &NewTable) -> Result<Table> {
    validation::validate_new_table(new)?;

    let result = sqlx::query(
        r#"
        INSERT INTO tables (table_name, capacity)
        VALUES (?, ?)
        "#,
    )
    .bind(&new.table_name)
    .bind(new.capacity)
    .execute(pool)
    .await?;

    get(pool, result.last_insert_rowid()).await
}

/// Seat a booked reservation at a free table.
///
/// One transaction, two conditional writes: the reservation moves to
/// `seated` only if it is still `booked`, and the table takes the reference
/// only if it is still free. Zero affected rows on either write aborts and
/// rolls back both, so no reader ever observes a seated reservation without
/// its table or vice versa.
pub async fn seat(pool: &SqlitePool, reservation_id: i64, table_id: i64) -> Result<Table> {
    let mut tx = pool.begin().await?;

    let reservation = sqlx::query(
        r#"
        UPDATE reservations
        SET status = 'seated', updated_at = datetime('now')
        WHERE reservation_id = ? AND status = 'booked'
        "#,
    )
    .bind(reservation_id)
    .execute(&mut *tx)
    .await?;

    if reservation.rows_affected() == 0 {
        // Dropping the transaction rolls it back.
        let status = sqlx::query_scalar::<_, ReservationStatus>(
            "SELECT status FROM reservations WHERE reservation_id = ?",
        )
        .bind(reservation_id)
        .fetch_optional(&mut *tx)
        .await?;

        return Err(match status {
            Some(status) => DatabaseError::AlreadySeated {
                id: reservation_id,
                status,
            },
            None => DatabaseError::NotFound {
                entity: "Reservation",
                id: reservation_id.to_string(),
            },
        });
    }

    let table = sqlx::query(
        r#"
        UPDATE tables
        SET reservation_id = ?, occupied = 1, updated_at = datetime('now')
        WHERE table_id = ? AND reservation_id IS NULL
        "#,
    )
    .bind(reservation_id)
    .bind(table_id)
    .execute(&mut *tx)
    .await?;

    if table.rows_affected() == 0 {
        // The workflow has already 404ed missing tables, so zero rows here
        // means the table gained a reservation since the precondition read.
        return Err(DatabaseError::TableOccupied { id: table_id });
    }

    let seated = sqlx::query_as::<_, Table>(
        r#"
        SELECT table_id, table_name, capacity, occupied, reservation_id,
               created_at, updated_at
        FROM tables
        WHERE table_id = ?
        "#,
    )
    .bind(table_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(seated)
}

/// Release a table from its seated reservation.
///
/// The mirror image of [`seat`]: the reservation moves to `finished` only if
/// it is still `seated`, and the table is cleared only if it still holds
/// that reservation. All-or-nothing, same as seat.
pub async fn finish(pool: &SqlitePool, reservation_id: i64, table_id: i64) -> Result<Table> {
    let mut tx = pool.begin().await?;

    let reservation = sqlx::query(
        r#"
        UPDATE reservations
        SET status = 'finished', updated_at = datetime('now')
        WHERE reservation_id = ? AND status = 'seated'
        "#,
    )
    .bind(reservation_id)
    .execute(&mut *tx)
    .await?;

    if reservation.rows_affected() == 0 {
        return Err(DatabaseError::TableNotOccupied { id: table_id });
    }

    let table = sqlx::query(
        r#"
        UPDATE tables
        SET reservation_id = NULL, occupied = 0, updated_at = datetime('now')
        WHERE table_id = ? AND reservation_id = ?
        "#,
    )
    .bind(table_id)
    .bind(reservation_id)
    .execute(&mut *tx)
    .await?;

    if table.rows_affected() == 0 {
        return Err(DatabaseError::TableNotOccupied { id: table_id });
    }

    let freed = sqlx::query_as::<_, Table>(
        r#"
        SELECT table_id, table_name, capacity, occupied, reservation_id,
               created_at, updated_at
        FROM tables
        WHERE table_id = ?
        "#,
    )
    .bind(table_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(freed)
}

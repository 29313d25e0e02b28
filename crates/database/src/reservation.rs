//! Reservation CRUD and status operations.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewReservation, Reservation, ReservationStatus};
use crate::validation::{self, ValidationError};

/// List reservations for a calendar date, excluding finished ones, ordered
/// by reservation time.
pub async fn list_on_date(pool: &SqlitePool, date: NaiveDate) -> Result<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT reservation_id, first_name, last_name, mobile_number,
               reservation_date, reservation_time, people, status,
               created_at, updated_at
        FROM reservations
        WHERE reservation_date = ? AND status != 'finished'
        ORDER BY reservation_time
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Search reservations by mobile number fragment, ordered by date.
///
/// The fragment is reduced to its digits and matched as a substring against
/// the stored number with formatting characters stripped, so "555" finds
/// both "(555) 123-4567" and "555-123-4567". An empty fragment matches
/// everything.
pub async fn search_by_mobile(pool: &SqlitePool, fragment: &str) -> Result<Vec<Reservation>> {
    let digits: String = fragment.chars().filter(|c| c.is_ascii_digit()).collect();

    let reservations = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT reservation_id, first_name, last_name, mobile_number,
               reservation_date, reservation_time, people, status,
               created_at, updated_at
        FROM reservations
        WHERE REPLACE(REPLACE(REPLACE(REPLACE(mobile_number,
                  '(', ''), ')', ''), ' ', ''), '-', '') LIKE ?
        ORDER BY reservation_date
        "#,
    )
    .bind(format!("%{}%", digits))
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Get a reservation by ID.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Reservation> {
    sqlx::query_as::<_, Reservation>(
        r#"
        SELECT reservation_id, first_name, last_name, mobile_number,
               reservation_date, reservation_time, people, status,
               created_at, updated_at
        FROM reservations
        WHERE reservation_id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Reservation",
        id: id.to_string(),
    })
}

/// Create a new reservation.
///
/// The payload must validate and carry status `booked`; reservations cannot
/// be created mid-lifecycle.
pub async fn create(pool: &SqlitePool, new: &NewReservation) -> Result<Reservation> {
    validation::validate_new_reservation(new)?;

    if new.status != ReservationStatus::Booked {
        return Err(ValidationError::StatusNotBooked(new.status).into());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO reservations
            (first_name, last_name, mobile_number, reservation_date,
             reservation_time, people, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.mobile_number)
    .bind(new.reservation_date)
    .bind(new.reservation_time)
    .bind(new.people)
    .bind(new.status)
    .execute(pool)
    .await?;

    get(pool, result.last_insert_rowid()).await
}

/// Update the customer-editable fields of an existing reservation.
///
/// The status column is deliberately not writable here; status moves only
/// through [`update_status`] and the seating workflow, so the transition
/// rules cannot be bypassed by a full-record update.
pub async fn update(pool: &SqlitePool, id: i64, new: &NewReservation) -> Result<Reservation> {
    validation::validate_new_reservation(new)?;

    let result = sqlx::query(
        r#"
        UPDATE reservations
        SET first_name = ?, last_name = ?, mobile_number = ?,
            reservation_date = ?, reservation_time = ?, people = ?,
            updated_at = datetime('now')
        WHERE reservation_id = ?
        "#,
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.mobile_number)
    .bind(new.reservation_date)
    .bind(new.reservation_time)
    .bind(new.people)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Reservation",
            id: id.to_string(),
        });
    }

    get(pool, id).await
}

/// Move a reservation to a new status.
///
/// Only the lifecycle transitions are allowed: booked → seated, booked →
/// cancelled, seated → finished. The write is conditional on the status the
/// transition was checked against, so a concurrent change fails the update
/// rather than skipping a state.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: ReservationStatus,
) -> Result<Reservation> {
    let current = get(pool, id).await?;

    if !current.status.can_transition_to(status) {
        return Err(DatabaseError::InvalidStatusTransition {
            from: current.status,
            to: status,
        });
    }

    let result = sqlx::query(
        r#"
        UPDATE reservations
        SET status = ?, updated_at = datetime('now')
        WHERE reservation_id = ? AND status = ?
        "#,
    )
    .bind(status)
    .bind(id)
    .bind(current.status)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // Lost a race with another writer; the transition no longer applies.
        return Err(DatabaseError::InvalidStatusTransition {
            from: current.status,
            to: status,
        });
    }

    get(pool, id).await
}

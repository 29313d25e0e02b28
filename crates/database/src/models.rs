//! Database models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::ValidationError;

/// Lifecycle status of a reservation.
///
/// Stored as lowercase TEXT. Allowed transitions: `booked` → `seated`,
/// `booked` → `cancelled`, `seated` → `finished`. Everything else is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReservationStatus {
    Booked,
    Seated,
    Finished,
    Cancelled,
}

impl ReservationStatus {
    /// Whether the status may move from `self` to `next`.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Booked, Seated) | (Booked, Cancelled) | (Seated, Finished)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Booked => "booked",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Finished => "finished",
            ReservationStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, ValidationError> {
        match s {
            "booked" => Ok(ReservationStatus::Booked),
            "seated" => Ok(ReservationStatus::Seated),
            "finished" => Ok(ReservationStatus::Finished),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A booking for a party at a date and time, tracked through a status
/// lifecycle. Reservations are never deleted; their end state is recorded
/// in `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Auto-incrementing ID.
    pub reservation_id: i64,
    /// Customer's first name.
    pub first_name: String,
    /// Customer's last name.
    pub last_name: String,
    /// Contact number, free text (e.g. "(555) 123-4567").
    pub mobile_number: String,
    /// Calendar date of the booking.
    pub reservation_date: NaiveDate,
    /// Time of day of the booking.
    pub reservation_time: NaiveTime,
    /// Party size.
    pub people: i64,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// A physical table with fixed capacity, optionally linked to the one
/// reservation currently seated at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Table {
    /// Auto-incrementing ID.
    pub table_id: i64,
    /// Display name (e.g. "Bar #1").
    pub table_name: String,
    /// Seating capacity.
    pub capacity: i64,
    /// Whether a party is currently seated here. Always agrees with
    /// `reservation_id`: occupied iff the reference is set.
    pub occupied: bool,
    /// Weak reference to the seated reservation, if any.
    pub reservation_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Validated input for creating or editing a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub people: i64,
    /// Status supplied by the client. New reservations must be `booked`.
    pub status: ReservationStatus,
}

/// Validated input for creating a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTable {
    pub table_name: String,
    pub capacity: i64,
}

//! Input validation for reservation and table records.

use std::fmt;

use crate::models::{NewReservation, NewTable, ReservationStatus};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent from the payload.
    Missing(&'static str),
    /// Required field present but empty.
    Empty(&'static str),
    /// Field shorter than the allowed minimum.
    TooShort { field: &'static str, min: usize },
    /// Field that must be a positive number.
    NotPositive(&'static str),
    /// Unparseable calendar date.
    InvalidDate { field: &'static str, value: String },
    /// Unparseable time of day.
    InvalidTime { field: &'static str, value: String },
    /// Status string outside the reservation lifecycle.
    UnknownStatus(String),
    /// New reservations must start out booked.
    StatusNotBooked(ReservationStatus),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "{} is required.", field),
            ValidationError::Empty(field) => write!(f, "{} cannot be empty.", field),
            ValidationError::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters long.", field, min)
            }
            ValidationError::NotPositive(field) => {
                write!(f, "{} must be a positive number.", field)
            }
            ValidationError::InvalidDate { field, value } => {
                write!(f, "{} is not a valid date: '{}'.", field, value)
            }
            ValidationError::InvalidTime { field, value } => {
                write!(f, "{} is not a valid time: '{}'.", field, value)
            }
            ValidationError::UnknownStatus(value) => {
                write!(f, "'{}' is not a known reservation status.", value)
            }
            ValidationError::StatusNotBooked(status) => {
                write!(f, "New reservations must be 'booked', not '{}'.", status)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Minimum allowed length for table names.
pub const MIN_TABLE_NAME_LENGTH: usize = 2;

/// Validate the field values of a reservation payload.
///
/// Presence of the fields is checked where the wire payload is decoded; this
/// checks the values themselves. The status rule is separate because it only
/// applies at creation (see [`crate::reservation::create`]).
pub fn validate_new_reservation(new: &NewReservation) -> Result<(), ValidationError> {
    if new.first_name.trim().is_empty() {
        return Err(ValidationError::Empty("first_name"));
    }

    if new.last_name.trim().is_empty() {
        return Err(ValidationError::Empty("last_name"));
    }

    if new.mobile_number.trim().is_empty() {
        return Err(ValidationError::Empty("mobile_number"));
    }

    if new.people < 1 {
        return Err(ValidationError::NotPositive("people"));
    }

    Ok(())
}

/// Validate a table payload.
pub fn validate_new_table(new: &NewTable) -> Result<(), ValidationError> {
    if new.table_name.chars().count() < MIN_TABLE_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: "table_name",
            min: MIN_TABLE_NAME_LENGTH,
        });
    }

    if new.capacity < 1 {
        return Err(ValidationError::NotPositive("capacity"));
    }

    Ok(())
}

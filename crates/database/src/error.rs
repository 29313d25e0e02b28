//! Database error types.

use thiserror::Error;

use crate::models::ReservationStatus;
use crate::validation::ValidationError;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} {id} cannot be found.")]
    NotFound { entity: &'static str, id: String },

    /// Input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Status change outside the reservation lifecycle
    #[error("Status cannot change from '{from}' to '{to}'.")]
    InvalidStatusTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Seat attempt on a reservation that is no longer booked
    #[error("Reservation {id} is already {status}.")]
    AlreadySeated { id: i64, status: ReservationStatus },

    /// Seat attempt on a table that already holds a reservation
    #[error("Table {id} is occupied.")]
    TableOccupied { id: i64 },

    /// Seat attempt on a table too small for the party
    #[error("Table {table_id} does not have sufficient capacity.")]
    InsufficientCapacity { table_id: i64 },

    /// Finish attempt on a table with no seated reservation
    #[error("Table {id} is not occupied.")]
    TableNotOccupied { id: i64 },
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;

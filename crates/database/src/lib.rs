//! SQLite persistence layer for the restaurant reservation service.
//!
//! This crate provides async database operations for reservations and
//! tables using SQLx with SQLite, plus the seating workflow that keeps the
//! two in agreement.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, models::{NewReservation, ReservationStatus}, reservation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:reservations.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a reservation
//!     let new = NewReservation {
//!         first_name: "Rick".to_string(),
//!         last_name: "Sanchez".to_string(),
//!         mobile_number: "202-555-0164".to_string(),
//!         reservation_date: "2025-12-30".parse()?,
//!         reservation_time: "20:00:00".parse()?,
//!         people: 6,
//!         status: ReservationStatus::Booked,
//!     };
//!     let created = reservation::create(db.pool(), &new).await?;
//!     println!("booked reservation {}", created.reservation_id);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod reservation;
pub mod seating;
pub mod table;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{NewReservation, NewTable, Reservation, ReservationStatus, Table};
pub use validation::ValidationError;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/reservations.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    /// Default pool size for database connections.
    /// Matches the small bounded pool the service has always run with.
    const DEFAULT_POOL_SIZE: u32 = 5;

    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_dinner_service_flow() {
        let db = test_db().await;
        let pool = db.pool();

        // Book a party of two
        let new = NewReservation {
            first_name: "Frank".to_string(),
            last_name: "Lloyd".to_string(),
            mobile_number: "(555) 123-4567".to_string(),
            reservation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            reservation_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            people: 2,
            status: ReservationStatus::Booked,
        };
        let booked = reservation::create(pool, &new).await.unwrap();

        // It shows up in the day's listing and in a phone search
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(reservation::list_on_date(pool, date).await.unwrap().len(), 1);
        assert_eq!(
            reservation::search_by_mobile(pool, "555").await.unwrap().len(),
            1
        );

        // Seat it, then turn the table
        let a1 = table::create(
            pool,
            &NewTable {
                table_name: "A1".to_string(),
                capacity: 2,
            },
        )
        .await
        .unwrap();

        let seated = seating::seat_reservation(pool, a1.table_id, Some(booked.reservation_id))
            .await
            .unwrap();
        assert!(seated.occupied);

        let freed = seating::finish_table(pool, a1.table_id).await.unwrap();
        assert!(!freed.occupied);

        // Finished reservations drop out of the dashboard listing
        assert!(reservation::list_on_date(pool, date)
            .await
            .unwrap()
            .is_empty());
    }
}

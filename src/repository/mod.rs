//! Repository layer for database operations
//!
//! Domain methods are implemented on [`Repository`] in one file per entity, prefixed
//! with the entity name (`books_*`, `borrow_records_*`, ...).

pub mod book_returns;
pub mod books;
pub mod borrow_records;
pub mod fines;
pub mod lock;
pub mod submissions;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

pub use lock::BookLock;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Round-trip to the database (readiness check)
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

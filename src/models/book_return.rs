//! Book return model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::fine::compute_fine;

/// Book return from database, one per borrow record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookReturn {
    pub id: i32,
    pub borrow_record_id: i32,
    pub return_date: DateTime<Utc>,
    /// Amount settled so far through submissions
    pub fine_paid: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book return request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookReturn {
    pub borrow_record_id: i32,
}

/// Book return with the overdue fine derived at read time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookReturnDetails {
    pub id: i32,
    pub borrow_record_id: i32,
    pub return_date: DateTime<Utc>,
    pub fine_paid: Decimal,
    /// Overdue fine recomputed against the current time
    pub fine: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookReturnDetails {
    pub fn new(book_return: BookReturn, return_due_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: book_return.id,
            borrow_record_id: book_return.borrow_record_id,
            return_date: book_return.return_date,
            fine_paid: book_return.fine_paid,
            fine: compute_fine(return_due_date, now),
            created_at: book_return.created_at,
            updated_at: book_return.updated_at,
        }
    }
}

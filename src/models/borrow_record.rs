//! Borrow record (loan) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Maximum number of open borrow records per user
pub const MAX_OPEN_BORROWS: i64 = 5;

/// Default loan period
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Borrow record from database. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub return_due_date: DateTime<Utc>,
    /// `false` while open, `true` once a return has been recorded
    pub returned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Open/closed state of a borrow record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowState {
    Open,
    Closed,
}

impl BorrowRecord {
    pub fn state(&self) -> BorrowState {
        if self.returned {
            BorrowState::Closed
        } else {
            BorrowState::Open
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.returned && self.return_due_date < now
    }
}

/// Create borrow record request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrowRecord {
    pub book_id: i32,
}

/// A borrow record ready for insertion, dates resolved at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBorrowRecord {
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub return_due_date: DateTime<Utc>,
}

impl NewBorrowRecord {
    /// Due date defaults to `borrow_date` plus the loan period
    pub fn new(
        user_id: i32,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        return_due_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user_id,
            book_id,
            borrow_date,
            return_due_date: return_due_date
                .unwrap_or_else(|| borrow_date + Duration::days(LOAN_PERIOD_DAYS)),
        }
    }
}

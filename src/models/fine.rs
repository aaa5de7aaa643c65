//! Fine model and the overdue fine formula

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Currency units charged per full overdue day
pub const DAILY_FINE: i64 = 5;

/// Fine from database, one per borrow record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub borrow_record_id: i32,
    pub fine_amount: Decimal,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fine {
    /// Mark the fine paid. Returns `false` if it was already paid.
    pub fn settle(&mut self) -> bool {
        if self.paid {
            return false;
        }
        self.paid = true;
        true
    }
}

/// Whole days elapsed past `return_due_date`, partial days truncated
pub fn overdue_days(return_due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if return_due_date < now {
        (now - return_due_date).num_days()
    } else {
        0
    }
}

/// Overdue fine at `now`: overdue days times [`DAILY_FINE`], zero when on time
pub fn compute_fine(return_due_date: DateTime<Utc>, now: DateTime<Utc>) -> Decimal {
    Decimal::from(overdue_days(return_due_date, now) * DAILY_FINE)
}

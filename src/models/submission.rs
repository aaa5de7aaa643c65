//! Submission (fine payment) model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Payment event recorded against a borrow record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: i32,
    pub borrow_record_id: i32,
    pub fine_id: Option<i32>,
    pub submission_date: DateTime<Utc>,
    pub amount_paid: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create submission request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSubmission {
    pub borrow_record_id: i32,
    pub fine_id: Option<i32>,
    pub amount_paid: Decimal,
}

/// Largest amount a `NUMERIC(10,2)` money column holds
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

impl CreateSubmission {
    pub fn validate_amount(&self) -> AppResult<()> {
        if self.amount_paid.is_sign_negative() && !self.amount_paid.is_zero() {
            return Err(AppError::Validation("Amount paid cannot be negative".to_string()));
        }
        if self.amount_paid.scale() > 2 {
            return Err(AppError::Validation(
                "Amount paid cannot have more than two decimal places".to_string(),
            ));
        }
        if self.amount_paid > max_amount() {
            return Err(AppError::Validation(format!(
                "Amount paid cannot exceed {}",
                max_amount()
            )));
        }
        Ok(())
    }
}

/// New `fine_paid` total after adding `amount`, bounded like any stored amount
pub fn add_to_fine_paid(current: Decimal, amount: Decimal) -> AppResult<Decimal> {
    current
        .checked_add(amount)
        .filter(|total| *total <= max_amount())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Total paid for this borrow record cannot exceed {}",
                max_amount()
            ))
        })
}

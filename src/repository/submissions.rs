//! Submissions domain methods on Repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{borrow_records, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        fine::Fine,
        submission::{add_to_fine_paid, CreateSubmission, Submission},
    },
};

/// Everything written by a submission
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub submission: Submission,
    /// The fine was unpaid and this submission settled it
    pub fine_settled: bool,
}

impl Repository {
    /// List submissions, optionally restricted to one user's records
    pub async fn submissions_list(&self, user_filter: Option<i32>) -> AppResult<Vec<Submission>> {
        let rows = sqlx::query_as::<_, Submission>(
            r#"
            SELECT s.* FROM submissions s
            JOIN borrow_records r ON r.id = s.borrow_record_id
            WHERE ($1::int IS NULL OR r.user_id = $1)
            ORDER BY s.submission_date DESC, s.id DESC
            "#,
        )
        .bind(user_filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get submission by ID, invisible outside `user_filter`
    pub async fn submissions_get_by_id(
        &self,
        id: i32,
        user_filter: Option<i32>,
    ) -> AppResult<Submission> {
        sqlx::query_as::<_, Submission>(
            r#"
            SELECT s.* FROM submissions s
            JOIN borrow_records r ON r.id = s.borrow_record_id
            WHERE s.id = $1 AND ($2::int IS NULL OR r.user_id = $2)
            "#,
        )
        .bind(id)
        .bind(user_filter)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission with id {} not found", id)))
    }

    /// Record a payment.
    ///
    /// The record must be returned. An unpaid fine is marked paid; a paid one is
    /// left alone. The submission row is always written, and the amount is added
    /// to the return's `fine_paid`.
    pub async fn submissions_create(
        &self,
        data: &CreateSubmission,
        now: DateTime<Utc>,
    ) -> AppResult<SubmissionOutcome> {
        let mut tx = self.pool.begin().await?;

        let record = borrow_records::lock_record(&mut tx, data.borrow_record_id).await?;
        if !record.returned {
            return Err(AppError::NotReturned(
                "Book must be returned before submission".to_string(),
            ));
        }

        let mut fine_settled = false;
        if let Some(fine_id) = data.fine_id {
            let mut fine = sqlx::query_as::<_, Fine>("SELECT * FROM fines WHERE id = $1 FOR UPDATE")
                .bind(fine_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", fine_id)))?;

            if fine.borrow_record_id != record.id {
                return Err(AppError::Validation(format!(
                    "Fine {} does not belong to borrow record {}",
                    fine_id, record.id
                )));
            }

            if fine.settle() {
                sqlx::query("UPDATE fines SET paid = TRUE, updated_at = NOW() WHERE id = $1")
                    .bind(fine.id)
                    .execute(&mut *tx)
                    .await?;
                fine_settled = true;
            }
        }

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (borrow_record_id, fine_id, submission_date, amount_paid)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(data.fine_id)
        .bind(now)
        .bind(data.amount_paid)
        .fetch_one(&mut *tx)
        .await?;

        let fine_paid: Decimal = sqlx::query_scalar(
            "SELECT fine_paid FROM book_returns WHERE borrow_record_id = $1 FOR UPDATE",
        )
        .bind(record.id)
        .fetch_one(&mut *tx)
        .await?;
        let fine_paid = add_to_fine_paid(fine_paid, data.amount_paid)?;

        sqlx::query(
            "UPDATE book_returns SET fine_paid = $1, updated_at = NOW() WHERE borrow_record_id = $2",
        )
        .bind(fine_paid)
        .bind(record.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SubmissionOutcome {
            submission,
            fine_settled,
        })
    }
}

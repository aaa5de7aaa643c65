//! Book returns domain methods on Repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use super::{books, borrow_records, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        book_return::{BookReturn, BookReturnDetails},
        borrow_record::{BorrowRecord, BorrowState},
        fine::{compute_fine, Fine},
    },
};

/// Book return joined with its record's due date
#[derive(Debug, FromRow)]
struct BookReturnRow {
    id: i32,
    borrow_record_id: i32,
    return_date: DateTime<Utc>,
    fine_paid: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    return_due_date: DateTime<Utc>,
}

impl BookReturnRow {
    fn into_details(self, now: DateTime<Utc>) -> BookReturnDetails {
        let due = self.return_due_date;
        let book_return = BookReturn {
            id: self.id,
            borrow_record_id: self.borrow_record_id,
            return_date: self.return_date,
            fine_paid: self.fine_paid,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        BookReturnDetails::new(book_return, due, now)
    }
}

const SELECT_RETURNS: &str = r#"
    SELECT br.id, br.borrow_record_id, br.return_date, br.fine_paid,
           br.created_at, br.updated_at, r.return_due_date
    FROM book_returns br
    JOIN borrow_records r ON r.id = br.borrow_record_id
"#;

/// Everything written by a return
#[derive(Debug, Clone)]
pub struct ReturnOutcome {
    pub book_return: BookReturn,
    pub fine: Option<Fine>,
    pub record: BorrowRecord,
}

impl Repository {
    /// List book returns, optionally restricted to one user's records
    pub async fn book_returns_list(
        &self,
        user_filter: Option<i32>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<BookReturnDetails>> {
        let query = format!(
            "{} WHERE ($1::int IS NULL OR r.user_id = $1) ORDER BY br.return_date DESC, br.id DESC",
            SELECT_RETURNS
        );
        let rows = sqlx::query_as::<_, BookReturnRow>(&query)
            .bind(user_filter)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|row| row.into_details(now)).collect())
    }

    /// Get book return by ID, invisible outside `user_filter`
    pub async fn book_returns_get_by_id(
        &self,
        id: i32,
        user_filter: Option<i32>,
        now: DateTime<Utc>,
    ) -> AppResult<BookReturnDetails> {
        let query = format!(
            "{} WHERE br.id = $1 AND ($2::int IS NULL OR r.user_id = $2)",
            SELECT_RETURNS
        );
        sqlx::query_as::<_, BookReturnRow>(&query)
            .bind(id)
            .bind(user_filter)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.into_details(now))
            .ok_or_else(|| AppError::NotFound(format!("Book return with id {} not found", id)))
    }

    /// Close a borrow record.
    ///
    /// Runs as one transaction holding the record's row lock: the return, the fine
    /// (if any), the `returned` flag and the availability increment either all
    /// commit or none do.
    pub async fn book_returns_create(
        &self,
        borrow_record_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<ReturnOutcome> {
        let mut tx = self.pool.begin().await?;

        let record = borrow_records::lock_record(&mut tx, borrow_record_id).await?;

        let already_has_return: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM book_returns WHERE borrow_record_id = $1)",
        )
        .bind(record.id)
        .fetch_one(&mut *tx)
        .await?;

        if record.state() == BorrowState::Closed || already_has_return {
            return Err(AppError::AlreadyReturned(
                "This book has already been returned".to_string(),
            ));
        }

        let amount = if record.is_overdue(now) {
            compute_fine(record.return_due_date, now)
        } else {
            Decimal::ZERO
        };

        let book_return = sqlx::query_as::<_, BookReturn>(
            r#"
            INSERT INTO book_returns (borrow_record_id, return_date, fine_paid)
            VALUES ($1, $2, 0)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let fine = if amount > Decimal::ZERO {
            let fine = sqlx::query_as::<_, Fine>(
                r#"
                INSERT INTO fines (borrow_record_id, fine_amount, paid)
                VALUES ($1, $2, FALSE)
                RETURNING *
                "#,
            )
            .bind(record.id)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?;
            Some(fine)
        } else {
            None
        };

        let record = sqlx::query_as::<_, BorrowRecord>(
            "UPDATE borrow_records SET returned = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(record.id)
        .fetch_one(&mut *tx)
        .await?;

        books::increment_availability(&mut tx, record.book_id).await?;

        tx.commit().await?;

        Ok(ReturnOutcome {
            book_return,
            fine,
            record,
        })
    }
}

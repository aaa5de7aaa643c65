//! Borrow records domain methods on Repository

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::borrow_record::{BorrowRecord, NewBorrowRecord, MAX_OPEN_BORROWS},
};

impl Repository {
    /// List borrow records, optionally restricted to one user
    pub async fn borrow_records_list(&self, user_filter: Option<i32>) -> AppResult<Vec<BorrowRecord>> {
        let rows = sqlx::query_as::<_, BorrowRecord>(
            r#"
            SELECT * FROM borrow_records
            WHERE ($1::int IS NULL OR user_id = $1)
            ORDER BY borrow_date DESC, id DESC
            "#,
        )
        .bind(user_filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get borrow record by ID, invisible outside `user_filter`
    pub async fn borrow_records_get_by_id(
        &self,
        id: i32,
        user_filter: Option<i32>,
    ) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE id = $1 AND ($2::int IS NULL OR user_id = $2)",
        )
        .bind(id)
        .bind(user_filter)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Count a user's open borrow records
    pub async fn borrow_records_count_open(&self, user_id: i32) -> AppResult<i64> {
        let mut conn = self.pool.acquire().await?;
        count_open(&mut conn, user_id).await
    }

    /// Borrow a book.
    ///
    /// Availability is checked under the book lock and the per-user cap under the
    /// member's row lock, in the same transaction as the decrement and the insert.
    /// The last copy can only be handed out once, and a member never ends up with
    /// more than `MAX_OPEN_BORROWS` open records.
    pub async fn borrow_records_create(
        &self,
        user_id: i32,
        book_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let mut lock = self.books_lock(book_id).await?;

        if !lock.book().is_available() {
            return Err(AppError::Unavailable(format!(
                "The book '{}' is currently not available",
                lock.book().title
            )));
        }

        // Serializes one member's borrows across different books. Lock order is
        // always book then user, and returns never lock users.
        lock_user(lock.conn(), user_id).await?;

        let open = count_open(lock.conn(), user_id).await?;
        if open >= MAX_OPEN_BORROWS {
            return Err(AppError::LimitExceeded(format!(
                "Borrowing limit reached ({}/{})",
                open, MAX_OPEN_BORROWS
            )));
        }

        lock.decrement_availability().await?;

        let record = NewBorrowRecord::new(user_id, book_id, now, None);
        let created = insert(lock.conn(), &record).await?;

        lock.commit().await?;
        Ok(created)
    }
}

async fn lock_user(conn: &mut PgConnection, user_id: i32) -> AppResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user_id)))?;
    Ok(())
}

async fn count_open(conn: &mut PgConnection, user_id: i32) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM borrow_records WHERE user_id = $1 AND returned = FALSE",
    )
    .bind(user_id)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

async fn insert(conn: &mut PgConnection, record: &NewBorrowRecord) -> AppResult<BorrowRecord> {
    let row = sqlx::query_as::<_, BorrowRecord>(
        r#"
        INSERT INTO borrow_records (user_id, book_id, borrow_date, return_due_date, returned)
        VALUES ($1, $2, $3, $4, FALSE)
        RETURNING *
        "#,
    )
    .bind(record.user_id)
    .bind(record.book_id)
    .bind(record.borrow_date)
    .bind(record.return_due_date)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Lock a borrow record row inside the caller's transaction
pub(crate) async fn lock_record(conn: &mut PgConnection, id: i32) -> AppResult<BorrowRecord> {
    sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
}

//! Books domain methods on Repository

use sqlx::PgConnection;

use super::{BookLock, Repository};
use crate::{
    error::{AppError, AppResult},
    models::book::{validate_total_copies, Book, NewBook, UpdateBook},
};

impl Repository {
    /// List all books
    pub async fn books_list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// List books with at least one copy on the shelf
    pub async fn books_list_available(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE copies_available > 0 ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn books_get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Check if an ISBN is already used by another book
    pub async fn books_isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id != $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a book
    pub async fn books_create(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, copies_available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .bind(book.copies_available)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Lock a book row for a read-check-write sequence
    pub async fn books_lock(&self, id: i32) -> AppResult<BookLock> {
        BookLock::acquire(&self.pool, id).await
    }

    /// Update book details under the book lock
    pub async fn books_update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let mut lock = self.books_lock(id).await?;

        if let Some(total_copies) = data.total_copies {
            validate_total_copies(total_copies)?;
            lock.set_total_copies(total_copies).await?;
        }
        lock.update_details(data).await?;

        lock.commit().await
    }

    /// Delete a book that has never been lent
    pub async fn books_delete(&self, id: i32) -> AppResult<()> {
        // Holding the lock keeps a concurrent borrow from slipping in
        let mut lock = self.books_lock(id).await?;

        let has_records: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrow_records WHERE book_id = $1)",
        )
        .bind(id)
        .fetch_one(lock.conn())
        .await?;

        if has_records {
            return Err(AppError::Conflict(
                "Book has borrow records and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(lock.conn())
            .await?;

        lock.commit().await?;
        Ok(())
    }
}

/// Put one copy back on the shelf, inside the caller's transaction
pub(crate) async fn increment_availability(conn: &mut PgConnection, book_id: i32) -> AppResult<Book> {
    sqlx::query_as::<_, Book>(
        r#"
        UPDATE books
        SET copies_available = copies_available + 1, updated_at = NOW()
        WHERE id = $1 AND copies_available < total_copies
        RETURNING *
        "#,
    )
    .bind(book_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| {
        AppError::Conflict(format!(
            "Book {} already has all copies available",
            book_id
        ))
    })
}

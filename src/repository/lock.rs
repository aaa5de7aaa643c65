//! Per-book critical section.
//!
//! [`BookLock`] opens a transaction and takes the row lock on one book
//! (`SELECT ... FOR UPDATE`). Everything that reads `copies_available` and acts on
//! it goes through the guard, so concurrent borrowers of the same book serialize
//! while borrowers of different books never wait on each other. Only one book is
//! ever locked per transaction.
//!
//! Dropping the guard without calling [`BookLock::commit`] rolls the transaction
//! back.

use sqlx::{PgConnection, Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, UpdateBook},
};

pub struct BookLock {
    tx: Transaction<'static, Postgres>,
    book: Book,
}

impl BookLock {
    /// Begin a transaction and lock the book row
    pub async fn acquire(pool: &Pool<Postgres>, book_id: i32) -> AppResult<Self> {
        let mut tx = pool.begin().await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        Ok(Self { tx, book })
    }

    /// The book as read under the lock
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Connection of the locked transaction, for writes that must commit with it
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Take one copy off the shelf
    pub async fn decrement_availability(&mut self) -> AppResult<()> {
        if !self.book.is_available() {
            return Err(AppError::Conflict(format!(
                "Book {} has no copies left to decrement",
                self.book.id
            )));
        }

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET copies_available = copies_available - 1, updated_at = NOW()
            WHERE id = $1 AND copies_available > 0
            RETURNING *
            "#,
        )
        .bind(self.book.id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!("Book {} has no copies left to decrement", self.book.id))
        })?;

        self.book = book;
        Ok(())
    }

    /// Change the owned copy count; availability is left untouched.
    ///
    /// The new count must cover the copies on the shelf plus those still out on
    /// loan, or a later return could not put its copy back.
    pub async fn set_total_copies(&mut self, total_copies: i32) -> AppResult<()> {
        let on_loan: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = $1 AND returned = FALSE",
        )
        .bind(self.book.id)
        .fetch_one(&mut *self.tx)
        .await?;

        let held = i64::from(self.book.copies_available) + on_loan;
        if i64::from(total_copies) < held {
            return Err(AppError::Validation(format!(
                "Total copies ({}) cannot be lower than copies held ({} available, {} on loan)",
                total_copies, self.book.copies_available, on_loan
            )));
        }

        self.book = sqlx::query_as::<_, Book>(
            "UPDATE books SET total_copies = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(total_copies)
        .bind(self.book.id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Apply title/author/ISBN changes; `None` fields are left as they are
    pub async fn update_details(&mut self, data: &UpdateBook) -> AppResult<()> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.title, "title");
        add_field!(data.author, "author");
        add_field!(data.isbn, "isbn");

        let query = format!(
            "UPDATE books SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Book>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.title);
        bind_field!(data.author);
        bind_field!(data.isbn);

        self.book = builder.bind(self.book.id).fetch_one(&mut *self.tx).await?;
        Ok(())
    }

    /// Commit and release the lock, returning the book as last written
    pub async fn commit(self) -> AppResult<Book> {
        self.tx.commit().await?;
        Ok(self.book)
    }
}

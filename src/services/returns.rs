//! Return & fine service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_return::{BookReturn, BookReturnDetails},
        fine::{compute_fine, Fine},
    },
    policy::Scope,
    repository::Repository,
};

#[derive(Clone)]
pub struct ReturnsService {
    repository: Repository,
}

impl ReturnsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Return a borrowed book, issuing a fine when it comes back late.
    ///
    /// `scope` is the caller's: members can only close their own records.
    pub async fn return_book(&self, borrow_record_id: i32, scope: Scope) -> AppResult<BookReturnDetails> {
        let record = self
            .repository
            .borrow_records_get_by_id(borrow_record_id, None)
            .await?;
        if !scope.permits(record.user_id) {
            return Err(AppError::Authorization(
                "Cannot return another member's book".to_string(),
            ));
        }

        let now = Utc::now();
        let outcome = match self.repository.book_returns_create(record.id, now).await {
            Ok(outcome) => outcome,
            Err(e @ AppError::AlreadyReturned(_)) => {
                tracing::info!(borrow_record_id, "Return rejected: already returned");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        match outcome.fine {
            Some(ref fine) => tracing::info!(
                borrow_record_id,
                book_id = outcome.record.book_id,
                fine_id = fine.id,
                fine_amount = %fine.fine_amount,
                "Book returned late, fine issued"
            ),
            None => tracing::info!(
                borrow_record_id,
                book_id = outcome.record.book_id,
                "Book returned"
            ),
        }

        Ok(BookReturnDetails::new(
            outcome.book_return,
            outcome.record.return_due_date,
            now,
        ))
    }

    /// Book returns visible in `scope`
    pub async fn list_returns(&self, scope: Scope) -> AppResult<Vec<BookReturnDetails>> {
        self.repository
            .book_returns_list(scope.user_filter(), Utc::now())
            .await
    }

    pub async fn get_return(&self, id: i32, scope: Scope) -> AppResult<BookReturnDetails> {
        self.repository
            .book_returns_get_by_id(id, scope.user_filter(), Utc::now())
            .await
    }

    /// Current overdue fine for a return, derived from its record's due date
    pub async fn compute_fine(&self, book_return: &BookReturn) -> AppResult<rust_decimal::Decimal> {
        let record = self
            .repository
            .borrow_records_get_by_id(book_return.borrow_record_id, None)
            .await?;
        Ok(compute_fine(record.return_due_date, Utc::now()))
    }

    /// Fines visible in `scope`
    pub async fn list_fines(&self, scope: Scope) -> AppResult<Vec<Fine>> {
        self.repository.fines_list(scope.user_filter()).await
    }

    pub async fn get_fine(&self, id: i32, scope: Scope) -> AppResult<Fine> {
        self.repository.fines_get_by_id(id, scope.user_filter()).await
    }
}

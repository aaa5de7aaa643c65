//! Lending ledger service: borrowing and borrow record queries

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::borrow_record::BorrowRecord,
    policy::Scope,
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a member
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        match self
            .repository
            .borrow_records_create(user_id, book_id, Utc::now())
            .await
        {
            Ok(record) => {
                tracing::info!(
                    borrow_record_id = record.id,
                    user_id,
                    book_id,
                    due = %record.return_due_date,
                    "Book borrowed"
                );
                Ok(record)
            }
            Err(e @ (AppError::Unavailable(_) | AppError::LimitExceeded(_))) => {
                tracing::info!(user_id, book_id, reason = %e, "Borrow rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Borrow records visible in `scope`
    pub async fn list(&self, scope: Scope) -> AppResult<Vec<BorrowRecord>> {
        match scope {
            Scope::All => self.list_all().await,
            Scope::Own(user_id) => self.list_for_user(user_id).await,
        }
    }

    /// Borrow records of one user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<BorrowRecord>> {
        self.repository.borrow_records_list(Some(user_id)).await
    }

    /// Every borrow record (admin view)
    pub async fn list_all(&self) -> AppResult<Vec<BorrowRecord>> {
        self.repository.borrow_records_list(None).await
    }

    pub async fn get(&self, id: i32, scope: Scope) -> AppResult<BorrowRecord> {
        self.repository
            .borrow_records_get_by_id(id, scope.user_filter())
            .await
    }

    /// Number of records the user still has out
    pub async fn count_open(&self, user_id: i32) -> AppResult<i64> {
        self.repository.borrow_records_count_open(user_id).await
    }
}

//! Settlement service: recording fine payments

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::submission::{CreateSubmission, Submission},
    policy::Scope,
    repository::Repository,
};

#[derive(Clone)]
pub struct SettlementService {
    repository: Repository,
}

impl SettlementService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a payment against a returned borrow record
    pub async fn submit_payment(&self, data: CreateSubmission, scope: Scope) -> AppResult<Submission> {
        data.validate_amount()?;

        let record = self
            .repository
            .borrow_records_get_by_id(data.borrow_record_id, None)
            .await?;
        if !scope.permits(record.user_id) {
            return Err(AppError::Authorization(
                "Cannot pay for another member's borrow record".to_string(),
            ));
        }

        let outcome = self.repository.submissions_create(&data, Utc::now()).await?;

        tracing::info!(
            submission_id = outcome.submission.id,
            borrow_record_id = data.borrow_record_id,
            fine_id = ?data.fine_id,
            amount_paid = %data.amount_paid,
            fine_settled = outcome.fine_settled,
            "Submission recorded"
        );

        Ok(outcome.submission)
    }

    /// Submissions visible in `scope`
    pub async fn list(&self, scope: Scope) -> AppResult<Vec<Submission>> {
        self.repository.submissions_list(scope.user_filter()).await
    }

    pub async fn get(&self, id: i32, scope: Scope) -> AppResult<Submission> {
        self.repository
            .submissions_get_by_id(id, scope.user_filter())
            .await
    }
}

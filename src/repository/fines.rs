//! Fines domain methods on Repository (read-only)

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::fine::Fine,
};

impl Repository {
    /// List fines, optionally restricted to one user's records
    pub async fn fines_list(&self, user_filter: Option<i32>) -> AppResult<Vec<Fine>> {
        let rows = sqlx::query_as::<_, Fine>(
            r#"
            SELECT f.* FROM fines f
            JOIN borrow_records r ON r.id = f.borrow_record_id
            WHERE ($1::int IS NULL OR r.user_id = $1)
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .bind(user_filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get fine by ID, invisible outside `user_filter`
    pub async fn fines_get_by_id(&self, id: i32, user_filter: Option<i32>) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>(
            r#"
            SELECT f.* FROM fines f
            JOIN borrow_records r ON r.id = f.borrow_record_id
            WHERE f.id = $1 AND ($2::int IS NULL OR r.user_id = $2)
            "#,
        )
        .bind(id)
        .bind(user_filter)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", id)))
    }
}

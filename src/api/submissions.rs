//! Payment submission endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::submission::{CreateSubmission, Submission},
};

use super::AuthenticatedUser;

/// List payment submissions; members only see their own
#[utoipa::path(
    get,
    path = "/submissions",
    tag = "submissions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Submissions", body = Vec<Submission>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_submissions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Submission>>> {
    let submissions = state.services.settlement.list(claims.scope()).await?;
    Ok(Json(submissions))
}

/// Get a submission by ID
#[utoipa::path(
    get,
    path = "/submissions/{id}",
    tag = "submissions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission", body = Submission),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn get_submission(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Submission>> {
    let submission = state.services.settlement.get(id, claims.scope()).await?;
    Ok(Json(submission))
}

/// Submit a payment against a returned borrow record (members only)
///
/// When `fine_id` is given the fine is marked paid.
#[utoipa::path(
    post,
    path = "/submissions",
    tag = "submissions",
    security(("bearer_auth" = [])),
    request_body = CreateSubmission,
    responses(
        (status = 201, description = "Payment recorded", body = Submission),
        (status = 400, description = "Invalid amount, or book not returned yet"),
        (status = 403, description = "Members only, or not your borrow record"),
        (status = 404, description = "Borrow record or fine not found")
    )
)]
pub async fn create_submission(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateSubmission>,
) -> AppResult<(StatusCode, Json<Submission>)> {
    claims.require_member()?;

    let submission = state
        .services
        .settlement
        .submit_payment(request, claims.scope())
        .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

//! Borrowing endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow_record::{BorrowRecord, CreateBorrowRecord},
};

use super::AuthenticatedUser;

/// List borrow records; members only see their own
#[utoipa::path(
    get,
    path = "/borrow-records",
    tag = "borrow_records",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrow records", body = Vec<BorrowRecord>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrow_records(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let records = state.services.loans.list(claims.scope()).await?;
    Ok(Json(records))
}

/// Get a borrow record by ID
#[utoipa::path(
    get,
    path = "/borrow-records/{id}",
    tag = "borrow_records",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow record", body = BorrowRecord),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn get_borrow_record(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state.services.loans.get(id, claims.scope()).await?;
    Ok(Json(record))
}

/// Borrow a book (members only)
#[utoipa::path(
    post,
    path = "/borrow-records",
    tag = "borrow_records",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRecord,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowRecord),
        (status = 403, description = "Members only"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "No copies available"),
        (status = 422, description = "Borrow limit reached")
    )
)]
pub async fn create_borrow_record(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrowRecord>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    claims.require_member()?;

    let record = state
        .services
        .loans
        .borrow(claims.user_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

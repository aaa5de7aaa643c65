//! Return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book_return::{BookReturnDetails, CreateBookReturn},
};

use super::AuthenticatedUser;

/// List book returns; members only see their own
#[utoipa::path(
    get,
    path = "/book-returns",
    tag = "book_returns",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Book returns", body = Vec<BookReturnDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_book_returns(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookReturnDetails>>> {
    let returns = state.services.returns.list_returns(claims.scope()).await?;
    Ok(Json(returns))
}

/// Get a book return by ID
#[utoipa::path(
    get,
    path = "/book-returns/{id}",
    tag = "book_returns",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book return ID")
    ),
    responses(
        (status = 200, description = "Book return", body = BookReturnDetails),
        (status = 404, description = "Book return not found")
    )
)]
pub async fn get_book_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookReturnDetails>> {
    let book_return = state.services.returns.get_return(id, claims.scope()).await?;
    Ok(Json(book_return))
}

/// Return a borrowed book (members only)
#[utoipa::path(
    post,
    path = "/book-returns",
    tag = "book_returns",
    security(("bearer_auth" = [])),
    request_body = CreateBookReturn,
    responses(
        (status = 201, description = "Book returned", body = BookReturnDetails),
        (status = 403, description = "Members only, or not your borrow record"),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn create_book_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBookReturn>,
) -> AppResult<(StatusCode, Json<BookReturnDetails>)> {
    claims.require_member()?;

    let book_return = state
        .services
        .returns
        .return_book(request.borrow_record_id, claims.scope())
        .await?;
    Ok((StatusCode::CREATED, Json(book_return)))
}

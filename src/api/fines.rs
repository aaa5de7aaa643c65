//! Fine endpoints (read only; fines are issued by returns)

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::fine::Fine};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Fines", body = Vec<Fine>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_fines(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Fine>>> {
    let fines = state.services.returns.list_fines(claims.scope()).await?;
    Ok(Json(fines))
}

#[utoipa::path(
    get,
    path = "/fines/{id}",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Fine ID")
    ),
    responses(
        (status = 200, description = "Fine", body = Fine),
        (status = 404, description = "Fine not found")
    )
)]
pub async fn get_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Fine>> {
    let fine = state.services.returns.get_fine(id, claims.scope()).await?;
    Ok(Json(fine))
}

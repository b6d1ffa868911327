//! Bulk user endpoints
//!
//! - `GET /api/users`: every stored user, ordered by id
//! - `POST /api/users`: bulk create `{users: [...]}`
//! - `DELETE /api/users`: bulk delete `{ids: [...]}`
//!
//! Each mutation is one transaction against the store. An empty batch is
//! answered without touching the database.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::info;
use userbatch_common::api::{BulkCreateRequest, BulkDeleteRequest, MutationResponse, UserPayload};
use userbatch_common::db;
use userbatch_common::{NewUser, UserRecord};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Build `/users` routes (nested under `/api` by the router)
pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users",
        get(list_users).post(create_users).delete(delete_users),
    )
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserRecord>>> {
    let users = db::list_users(&state.db).await?;
    Ok(Json(users))
}

/// POST /api/users
///
/// Rejects the whole batch with 400 when any user has an empty name or an
/// age below 1.
pub async fn create_users(
    State(state): State<AppState>,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Json(request) = payload?;

    if request.users.is_empty() {
        return Ok(Json(MutationResponse {
            message: "No users to create".to_string(),
            count: 0,
        }));
    }

    let users = request
        .users
        .into_iter()
        .enumerate()
        .map(|(index, payload)| check_payload(index, payload))
        .collect::<Result<Vec<NewUser>, ApiError>>()?;

    let count = db::insert_users(&state.db, &users).await?;
    info!("Created {} users", count);

    Ok(Json(MutationResponse {
        message: "Users created successfully".to_string(),
        count,
    }))
}

/// DELETE /api/users
///
/// `count` echoes the number of ids requested; ids with no stored user are
/// ignored.
pub async fn delete_users(
    State(state): State<AppState>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Json(request) = payload?;

    if request.ids.is_empty() {
        return Ok(Json(MutationResponse {
            message: "No users to delete".to_string(),
            count: 0,
        }));
    }

    let removed = db::delete_users(&state.db, &request.ids).await?;
    info!("Deleted {} users ({} ids requested)", removed, request.ids.len());

    Ok(Json(MutationResponse {
        message: "Users deleted successfully".to_string(),
        count: request.ids.len() as u64,
    }))
}

/// Schema check for one create payload
fn check_payload(index: usize, payload: UserPayload) -> Result<NewUser, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest(format!(
            "users[{}].name must not be empty",
            index
        )));
    }
    if payload.age < 1 {
        return Err(ApiError::BadRequest(format!(
            "users[{}].age must be at least 1, got {}",
            index, payload.age
        )));
    }
    Ok(payload.into())
}

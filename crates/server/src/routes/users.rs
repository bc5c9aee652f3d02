// crates/server/src/routes/users.rs
//! User registration and lookup.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use taskmarket_core::{Role, User};

use crate::error::{ApiError, ApiResult};
use crate::state::{now_ms, AppState};

/// Body for POST /api/users.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// POST /api/users
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("name and email are required".into()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        email: req.email,
        role: req.role,
        rating: None,
        created_at: now_ms(),
    };
    match state.db.insert_user(&user).await {
        Ok(()) => {}
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::Conflict("email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    }

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state
        .db
        .get_user(&id)
        .await?
        .ok_or(ApiError::UserNotFound(id))?;
    Ok(Json(user))
}

/// Build the users router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create))
        .route("/users/{id}", get(get_by_id))
}

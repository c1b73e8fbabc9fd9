//! User management handlers, super-admin only.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::repos::{CreateUserParams, UpdateUserParams};

use super::require_user_management;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::UserRequest;
use crate::infra::http::state::ApiState;

pub async fn list_users(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    require_user_management(&principal)?;
    let users = state.users.list().await.map_err(admin_to_api)?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_user_management(&principal)?;
    let user = state.users.get(id).await.map_err(admin_to_api)?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_user_management(&principal)?;

    let user = state
        .users
        .create(
            &principal,
            CreateUserParams {
                email: payload.email,
                name: payload.name,
                role: payload.role,
            },
        )
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_user_management(&principal)?;

    let user = state
        .users
        .update(
            &principal,
            UpdateUserParams {
                id,
                email: payload.email,
                name: payload.name,
                role: payload.role,
            },
        )
        .await
        .map_err(admin_to_api)?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_user_management(&principal)?;

    state
        .users
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

//! Category handlers.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::categories::CategoryCommand;
use crate::application::auth::Principal;

use super::require_delete_privilege;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::CategoryRequest;
use crate::infra::http::state::ApiState;

fn to_command(payload: CategoryRequest) -> CategoryCommand {
    CategoryCommand {
        name: payload.name,
        slug: payload.slug,
        description: payload.description,
    }
}

pub async fn list_categories(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.categories.list().await.map_err(admin_to_api)?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.categories.get(id).await.map_err(admin_to_api)?;
    Ok(Json(category))
}

pub async fn create_category(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .categories
        .create(&principal, to_command(payload))
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .categories
        .update(&principal, id, to_command(payload))
        .await
        .map_err(admin_to_api)?;

    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_delete_privilege(&principal)?;

    state
        .categories
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

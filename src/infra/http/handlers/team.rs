//! Team member handlers.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::repos::{CreateTeamMemberParams, UpdateTeamMemberParams};

use super::require_delete_privilege;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::TeamMemberRequest;
use crate::infra::http::state::ApiState;

pub async fn list_team(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let members = state.team.list().await.map_err(admin_to_api)?;
    Ok(Json(members))
}

pub async fn get_team_member(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member = state.team.get(id).await.map_err(admin_to_api)?;
    Ok(Json(member))
}

pub async fn create_team_member(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<TeamMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = CreateTeamMemberParams {
        name: payload.name,
        name_en: payload.name_en,
        title: payload.title,
        title_en: payload.title_en,
        description: payload.description,
        description_en: payload.description_en,
        sort_order: payload.sort_order,
        status: payload.status,
        image_id: payload.image_id,
        image_en_id: payload.image_en_id,
    };

    let member = state
        .team
        .create(&principal, params)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_team_member(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeamMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = UpdateTeamMemberParams {
        id,
        name: payload.name,
        name_en: payload.name_en,
        title: payload.title,
        title_en: payload.title_en,
        description: payload.description,
        description_en: payload.description_en,
        sort_order: payload.sort_order,
        status: payload.status,
        image_id: payload.image_id,
        image_en_id: payload.image_en_id,
    };

    let member = state
        .team
        .update(&principal, params)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(member))
}

pub async fn delete_team_member(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_delete_privilege(&principal)?;

    state
        .team
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

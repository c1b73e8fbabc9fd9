//! Banner handlers.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::repos::{CreateBannerParams, UpdateBannerParams};

use super::require_delete_privilege;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::{BannerCreateRequest, BannerUpdateRequest};
use crate::infra::http::state::ApiState;

pub async fn list_banners(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let banners = state.banners.list().await.map_err(admin_to_api)?;
    Ok(Json(banners))
}

pub async fn get_banner(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let banner = state.banners.get(id).await.map_err(admin_to_api)?;
    Ok(Json(banner))
}

pub async fn create_banner(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<BannerCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = CreateBannerParams {
        slot: payload.slot,
        link: payload.link,
        status: payload.status,
        image_id: payload.image_id,
    };

    let banner = state
        .banners
        .create(&principal, params)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(banner)))
}

pub async fn update_banner(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BannerUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = UpdateBannerParams {
        id,
        link: payload.link,
        status: payload.status,
        image_id: payload.image_id,
    };

    let banner = state
        .banners
        .update(&principal, params)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(banner))
}

pub async fn delete_banner(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_delete_privilege(&principal)?;

    state
        .banners
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

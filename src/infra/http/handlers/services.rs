//! Therapy service handlers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::services::{CreateServiceCommand, UpdateServiceCommand};
use crate::application::auth::Principal;
use crate::application::pagination::PageRequest;
use crate::application::repos::ServiceQueryFilter;

use super::require_delete_privilege;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::{
    ContentListQuery, ServiceCreateRequest, ServiceListResponse, ServiceUpdateRequest,
    StatusRequest,
};
use crate::infra::http::state::ApiState;

pub async fn list_services(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<ContentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let filter = ServiceQueryFilter {
        search: query.search,
    };

    let result = state
        .services
        .list(query.status, &filter, page)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(ServiceListResponse {
        services: result.items,
        meta: result.meta,
    }))
}

pub async fn get_service(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state.services.get(id).await.map_err(admin_to_api)?;
    Ok(Json(service))
}

pub async fn create_service(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ServiceCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreateServiceCommand {
        title: payload.title,
        title_en: payload.title_en,
        slug: payload.slug,
        body: payload.body,
        body_en: payload.body_en,
        short_description: payload.short_description,
        short_description_en: payload.short_description_en,
        status: payload.status,
        show_on_homepage: payload.show_on_homepage,
        feature_image_id: payload.feature_image_id,
        feature_image_en_id: payload.feature_image_en_id,
        seo: payload.seo,
        published_at: payload.published_at,
    };

    let service = state
        .services
        .create(&principal, command)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServiceUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdateServiceCommand {
        id,
        title: payload.title,
        title_en: payload.title_en,
        slug: payload.slug,
        body: payload.body,
        body_en: payload.body_en,
        short_description: payload.short_description,
        short_description_en: payload.short_description_en,
        show_on_homepage: payload.show_on_homepage,
        feature_image_id: payload.feature_image_id,
        feature_image_en_id: payload.feature_image_en_id,
        seo: payload.seo,
    };

    let service = state
        .services
        .update(&principal, command)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(service))
}

pub async fn update_service_status(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .services
        .update_status(&principal, id, payload.status)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(service))
}

pub async fn delete_service(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_delete_privilege(&principal)?;

    state
        .services
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

//! News handlers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::news::{CreateNewsCommand, UpdateNewsCommand};
use crate::application::auth::Principal;
use crate::application::pagination::PageRequest;
use crate::application::repos::NewsQueryFilter;

use super::require_delete_privilege;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::{
    ContentListQuery, NewsCreateRequest, NewsListResponse, NewsUpdateRequest, StatusRequest,
};
use crate::infra::http::state::ApiState;

pub async fn list_news(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<ContentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let filter = NewsQueryFilter {
        category_id: query.category,
        search: query.search,
        pinned: None,
    };

    let result = state
        .news
        .list(query.status, &filter, page)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(NewsListResponse {
        news: result.items,
        meta: result.meta,
    }))
}

pub async fn get_news(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let news = state.news.get(id).await.map_err(admin_to_api)?;
    Ok(Json(news))
}

pub async fn create_news(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewsCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreateNewsCommand {
        title: payload.title,
        title_en: payload.title_en,
        slug: payload.slug,
        body: payload.body,
        body_en: payload.body_en,
        short_description: payload.short_description,
        short_description_en: payload.short_description_en,
        status: payload.status,
        show_on_homepage: payload.show_on_homepage,
        pin: payload.pin,
        category_id: payload.category_id,
        feature_image_id: payload.feature_image_id,
        feature_image_en_id: payload.feature_image_en_id,
        seo: payload.seo,
        published_at: payload.published_at,
    };

    let news = state
        .news
        .create(&principal, command)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(news)))
}

pub async fn update_news(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewsUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdateNewsCommand {
        id,
        title: payload.title,
        title_en: payload.title_en,
        slug: payload.slug,
        body: payload.body,
        body_en: payload.body_en,
        short_description: payload.short_description,
        short_description_en: payload.short_description_en,
        show_on_homepage: payload.show_on_homepage,
        pin: payload.pin,
        category_id: payload.category_id,
        feature_image_id: payload.feature_image_id,
        feature_image_en_id: payload.feature_image_en_id,
        seo: payload.seo,
    };

    let news = state
        .news
        .update(&principal, command)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(news))
}

pub async fn update_news_status(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let news = state
        .news
        .update_status(&principal, id, payload.status)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(news))
}

pub async fn delete_news(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_delete_privilege(&principal)?;

    state
        .news
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

//! Posts handlers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::posts::{CreatePostCommand, UpdatePostCommand};
use crate::application::auth::Principal;
use crate::application::pagination::PageRequest;
use crate::application::repos::PostQueryFilter;

use super::require_delete_privilege;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::{
    ContentListQuery, PostCreateRequest, PostListResponse, PostUpdateRequest, StatusRequest,
};
use crate::infra::http::state::ApiState;

pub async fn list_posts(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<ContentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let filter = PostQueryFilter {
        category_id: query.category,
        search: query.search,
    };

    let result = state
        .posts
        .list(query.status, &filter, page)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(PostListResponse {
        posts: result.items,
        meta: result.meta,
    }))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.get(id).await.map_err(admin_to_api)?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreatePostCommand {
        title: payload.title,
        title_en: payload.title_en,
        slug: payload.slug,
        body: payload.body,
        body_en: payload.body_en,
        short_description: payload.short_description,
        short_description_en: payload.short_description_en,
        status: payload.status,
        show_on_homepage: payload.show_on_homepage,
        category_ids: payload.category_ids,
        feature_image_id: payload.feature_image_id,
        feature_image_en_id: payload.feature_image_en_id,
        seo: payload.seo,
        published_at: payload.published_at,
    };

    let post = state
        .posts
        .create(&principal, command)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdatePostCommand {
        id,
        title: payload.title,
        title_en: payload.title_en,
        slug: payload.slug,
        body: payload.body,
        body_en: payload.body_en,
        short_description: payload.short_description,
        short_description_en: payload.short_description_en,
        show_on_homepage: payload.show_on_homepage,
        category_ids: payload.category_ids,
        feature_image_id: payload.feature_image_id,
        feature_image_en_id: payload.feature_image_en_id,
        seo: payload.seo,
    };

    let post = state
        .posts
        .update(&principal, command)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(post))
}

pub async fn update_post_status(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .update_status(&principal, id, payload.status)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_delete_privilege(&principal)?;

    state
        .posts
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

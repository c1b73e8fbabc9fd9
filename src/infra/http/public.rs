//! Public, unauthenticated read surface for the marketing site.
//!
//! Everything here serves published content only, resolved per field into
//! the requested locale (`?locale=vi|en`, Vietnamese by default).

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;

use crate::application::pagination::PageRequest;
use crate::application::repos::{
    ListScope, NewsQueryFilter, PostQueryFilter, ServiceQueryFilter,
};
use crate::domain::entities::{NewsRecord, PostRecord, ServiceRecord};
use crate::domain::types::{BannerSlot, ContentStatus, RecordStatus};

use super::error::{ApiError, admin_to_api, repo_to_api};
use super::models::{
    LocaleQuery, PublicBanner, PublicContact, PublicContent, PublicListResponse,
    PublicTeamMember,
};
use super::state::ApiState;

fn post_is_visible(record: &PostRecord) -> bool {
    record.status == ContentStatus::Published && record.published_at.is_some()
}

fn news_is_visible(record: &NewsRecord) -> bool {
    record.status == ContentStatus::Published && record.published_at.is_some()
}

fn service_is_visible(record: &ServiceRecord) -> bool {
    record.status == ContentStatus::Published && record.published_at.is_some()
}

pub async fn list_posts(
    State(state): State<ApiState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let filter = PostQueryFilter {
        category_id: query.category,
        search: query.search,
    };

    let result = state
        .posts
        .reader
        .list(ListScope::Public, &filter, page)
        .await
        .map_err(repo_to_api)?;

    let locale = query.locale;
    let page = result.map(|record| PublicContent::from_post(&record, locale));
    Ok(Json(PublicListResponse {
        items: page.items,
        meta: page.meta,
    }))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .reader
        .find_by_slug(&slug)
        .await
        .map_err(repo_to_api)?
        .filter(post_is_visible)
        .ok_or_else(|| ApiError::not_found("post not found"))?;

    Ok(Json(PublicContent::from_post(&post, query.locale)))
}

pub async fn list_news(
    State(state): State<ApiState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let filter = NewsQueryFilter {
        category_id: query.category,
        search: query.search,
        pinned: None,
    };

    let result = state
        .news
        .reader
        .list(ListScope::Public, &filter, page)
        .await
        .map_err(repo_to_api)?;

    let locale = query.locale;
    let page = result.map(|record| PublicContent::from_news(&record, locale));
    Ok(Json(PublicListResponse {
        items: page.items,
        meta: page.meta,
    }))
}

pub async fn get_news(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let news = state
        .news
        .reader
        .find_by_slug(&slug)
        .await
        .map_err(repo_to_api)?
        .filter(news_is_visible)
        .ok_or_else(|| ApiError::not_found("news article not found"))?;

    Ok(Json(PublicContent::from_news(&news, query.locale)))
}

pub async fn list_services(
    State(state): State<ApiState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let filter = ServiceQueryFilter {
        search: query.search,
    };

    let result = state
        .services
        .reader
        .list(ListScope::Public, &filter, page)
        .await
        .map_err(repo_to_api)?;

    let locale = query.locale;
    let page = result.map(|record| PublicContent::from_service(&record, locale));
    Ok(Json(PublicListResponse {
        items: page.items,
        meta: page.meta,
    }))
}

pub async fn get_service(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .services
        .reader
        .find_by_slug(&slug)
        .await
        .map_err(repo_to_api)?
        .filter(service_is_visible)
        .ok_or_else(|| ApiError::not_found("service not found"))?;

    Ok(Json(PublicContent::from_service(&service, query.locale)))
}

pub async fn list_team(
    State(state): State<ApiState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let members = state
        .team
        .repo
        .list(Some(RecordStatus::Active))
        .await
        .map_err(repo_to_api)?;

    let locale = query.locale;
    let views: Vec<PublicTeamMember> = members
        .iter()
        .map(|member| PublicTeamMember::from_record(member, locale))
        .collect();
    Ok(Json(views))
}

pub async fn get_banner(
    State(state): State<ApiState>,
    Path(slot): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let slot: BannerSlot = slot
        .parse()
        .map_err(|()| ApiError::bad_request("unknown banner slot", None))?;

    let banner = state
        .banners
        .repo
        .find_by_slot(slot)
        .await
        .map_err(repo_to_api)?
        .filter(|banner| banner.status == RecordStatus::Active)
        .ok_or_else(|| ApiError::not_found("banner not configured"))?;

    Ok(Json(PublicBanner::from(&banner)))
}

pub async fn get_contact(
    State(state): State<ApiState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state
        .contact
        .current()
        .await
        .map_err(admin_to_api)?
        .ok_or_else(|| ApiError::not_found("contact not configured"))?;

    Ok(Json(PublicContact::from_record(&contact, query.locale)))
}

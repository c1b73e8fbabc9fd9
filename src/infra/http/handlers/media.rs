//! Media library handlers.

use axum::Json;
use axum::extract::{Extension, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::media::RegisterMediaCommand;
use crate::application::auth::Principal;
use crate::application::pagination::PageRequest;
use crate::application::repos::MediaQueryFilter;

use super::require_delete_privilege;
use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::{MediaListQuery, MediaListResponse, MediaResponse};
use crate::infra::http::state::ApiState;

const DEFAULT_PURPOSE: &str = "general";

pub async fn list_media(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<MediaListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let filter = MediaQueryFilter {
        file_type: query.file_type,
        search: query.search,
    };

    let result = state
        .media
        .list(&filter, page)
        .await
        .map_err(admin_to_api)?;

    Ok(Json(MediaListResponse {
        media: result.items,
        meta: result.meta,
    }))
}

pub async fn get_media(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.media.get(id).await.map_err(admin_to_api)?;
    Ok(Json(MediaResponse::from(&record)))
}

pub async fn upload_media(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut original_name = None;
    let mut content_type = None;
    let mut data: Option<bytes::Bytes> = None;
    let mut purpose = DEFAULT_PURPOSE.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request("invalid multipart payload", Some(err.to_string())))?
    {
        match field.name() {
            Some("file") => {
                original_name = field.file_name().map(|value| value.to_string());
                content_type = field.content_type().map(|value| value.to_string());
                data = Some(field.bytes().await.map_err(|err| {
                    ApiError::bad_request("failed to read upload", Some(err.to_string()))
                })?);
            }
            Some("purpose") => {
                purpose = field.text().await.map_err(|err| {
                    ApiError::bad_request("failed to read purpose", Some(err.to_string()))
                })?;
            }
            _ => {}
        }
    }

    let original_name =
        original_name.ok_or_else(|| ApiError::bad_request("missing file", None))?;
    let data = data.ok_or_else(|| ApiError::bad_request("missing file", None))?;
    let file_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(&original_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });

    let stored = state
        .media_storage
        .store(&purpose, principal.actor(), &original_name, data)
        .await
        .map_err(|err| ApiError::bad_request("upload rejected", Some(err.to_string())))?;

    let command = RegisterMediaCommand {
        url: state.media_storage.public_url(&stored.stored_path),
        file_name: stored.file_name,
        original_name,
        file_type,
        file_size: stored.size_bytes,
        checksum: stored.checksum,
    };

    let record = state
        .media
        .register(&principal, command)
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(MediaResponse::from(&record))))
}

pub async fn delete_media(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_delete_privilege(&principal)?;

    let record = state
        .media
        .delete(&principal, id)
        .await
        .map_err(admin_to_api)?;

    // Storage cleanup is best-effort: the row is gone, a stray file is not
    // worth failing the request over.
    if let Some(stored_path) = record.url.split("/media/").nth(1) {
        let _ = state.media_storage.delete(stored_path).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

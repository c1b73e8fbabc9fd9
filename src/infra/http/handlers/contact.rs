//! Contact card handlers.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::repos::UpsertContactParams;

use crate::infra::http::error::{ApiError, admin_to_api};
use crate::infra::http::models::ContactRequest;
use crate::infra::http::state::ApiState;

fn to_params(payload: ContactRequest) -> UpsertContactParams {
    UpsertContactParams {
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        address_en: payload.address_en,
        business_hours: payload.business_hours,
        business_hours_en: payload.business_hours_en,
        facebook_url: payload.facebook_url,
        zalo_url: payload.zalo_url,
        youtube_url: payload.youtube_url,
        appointment_link: payload.appointment_link,
        status: payload.status,
    }
}

pub async fn get_contact(
    State(state): State<ApiState>,
    Extension(_principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state.contact.current().await.map_err(admin_to_api)?;
    match contact {
        Some(contact) => Ok(Json(contact)),
        None => Err(ApiError::not_found("contact not configured")),
    }
}

pub async fn create_contact(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state
        .contact
        .create(&principal, to_params(payload))
        .await
        .map_err(admin_to_api)?;

    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update_contact(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state
        .contact
        .update(&principal, id, to_params(payload))
        .await
        .map_err(admin_to_api)?;

    Ok(Json(contact))
}

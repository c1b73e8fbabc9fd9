//! Audit trail listing.

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::response::IntoResponse;

use crate::application::auth::Principal;
use crate::application::pagination::PageRequest;
use crate::application::repos::AuditQueryFilter;

use crate::infra::http::error::{ApiError, repo_to_api};
use crate::infra::http::models::{AuditListQuery, AuditListResponse};
use crate::infra::http::state::ApiState;

pub async fn list_audit_logs(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<AuditListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !principal.role.can_publish() {
        return Err(ApiError::forbidden(format!(
            "role `{}` may not read the audit trail",
            principal.role
        )));
    }

    let page = PageRequest::new(query.page, query.limit);
    let filter = AuditQueryFilter {
        actor: query.actor,
        action: query.action,
        entity_type: query.entity,
    };

    let result = state
        .audit
        .list(&filter, page)
        .await
        .map_err(repo_to_api)?;

    Ok(Json(AuditListResponse {
        entries: result.items,
        meta: result.meta,
    }))
}

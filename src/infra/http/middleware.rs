use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::application::auth::AuthError;
use crate::application::error::ErrorReport;

use super::error::ApiError;
use super::state::ApiState;

/// Authenticate the request and attach the resulting [`Principal`] as an
/// extension. Missing or bad credentials end the request with 401.
///
/// [`Principal`]: crate::application::auth::Principal
pub async fn require_auth(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = extract_token(request.headers().get(axum::http::header::AUTHORIZATION))
        .or_else(|| {
            request
                .headers()
                .get("x-access-token")
                .and_then(|value| value.to_str().ok().map(|value| value.to_string()))
        });

    let Some(token) = token else {
        return ApiError::unauthorized().into_response();
    };

    let principal = match state.auth.authenticate(&token).await {
        Ok(principal) => principal,
        Err(AuthError::Invalid) => {
            state.audit.record_auth_event("anonymous", "denied").await;
            return ApiError::unauthorized().into_response();
        }
        Err(AuthError::Expired) => {
            state.audit.record_auth_event("anonymous", "expired").await;
            return ApiError::unauthorized().into_response();
        }
        Err(AuthError::Revoked) => {
            state.audit.record_auth_event("anonymous", "revoked").await;
            return ApiError::unauthorized().into_response();
        }
        Err(AuthError::Repo(err)) => {
            return super::error::repo_to_api(err).into_response();
        }
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Emit one structured log line per failed response and count server errors.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        metrics::counter!("clinica_http_server_errors_total").increment(1);
    }

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        warn!(
            target: "clinica::http",
            source = report.source,
            status = %report.status,
            messages = ?report.messages,
            %method,
            %path,
            "request failed"
        );
    }

    response
}

fn extract_token(header: Option<&axum::http::HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}

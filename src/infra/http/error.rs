use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::admin::AdminError;
use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;
use crate::domain::workflow::WorkflowError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const VALIDATION: &str = "validation_error";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const SLUG_TAKEN: &str = "slug_taken";
    pub const DUPLICATE: &str = "duplicate";
    pub const HOMEPAGE_CAP: &str = "homepage_cap_reached";
    pub const IN_USE: &str = "in_use";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const INTERNAL: &str = "internal_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
        }
    }

    pub fn bad_request(message: impl Into<String>, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "authentication required",
            None,
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::FORBIDDEN, message, None)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = format!(
            "{}: {}",
            self.code,
            self.hint.as_deref().unwrap_or(&self.message)
        );
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        // Attach a structured report so shared logging middleware can emit
        // rich diagnostics without the body leaking internals.
        ErrorReport::from_message("infra::http", self.status, detail).attach(&mut response);
        response
    }
}

/// Map a repository error onto the API error taxonomy.
pub fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "duplicate record",
            Some(constraint),
        ),
        RepoError::CapExceeded { cap } => ApiError::new(
            StatusCode::CONFLICT,
            codes::HOMEPAGE_CAP,
            format!("homepage cap of {cap} reached"),
            None,
        ),
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::InvalidInput { message } => {
            ApiError::bad_request("invalid input", Some(message))
        }
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::IN_USE,
            "record is referenced by other content",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "database timeout",
            None,
        ),
        RepoError::Persistence(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "unexpected error",
            Some(message),
        ),
    }
}

/// Map an admin-service error onto the API error taxonomy.
pub fn admin_to_api(err: AdminError) -> ApiError {
    match err {
        AdminError::Validation { field, problem } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::VALIDATION,
            format!("field `{field}` {problem}"),
            None,
        ),
        AdminError::SlugTaken => ApiError::new(
            StatusCode::CONFLICT,
            codes::SLUG_TAKEN,
            "slug already exists",
            None,
        ),
        AdminError::Workflow(WorkflowError::PublishForbidden { role }) => {
            ApiError::forbidden(format!("role `{role}` may not publish content"))
        }
        AdminError::Workflow(workflow_err @ WorkflowError::ScheduledUnsupported { .. }) => {
            ApiError::bad_request(workflow_err.to_string(), None)
        }
        AdminError::NotFound => ApiError::not_found("resource not found"),
        AdminError::Repo(repo_err) => repo_to_api(repo_err),
    }
}

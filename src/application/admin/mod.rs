//! Admin services: validation, invariants and audit around repository writes.

pub mod banners;
pub mod categories;
pub mod contact;
pub mod media;
pub mod news;
pub mod posts;
pub mod services;
pub mod team;
pub mod users;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::application::repos::RepoError;
use crate::domain::entities::{META_DESCRIPTION_MAX, META_TITLE_MAX, SeoMeta};
use crate::domain::slug::{SlugError, derive_slug};
use crate::domain::types::ContentStatus;
use crate::domain::workflow::WorkflowError;

/// Error shared by the admin services; HTTP mapping lives in the API layer.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("field `{field}` {problem}")]
    Validation {
        field: &'static str,
        problem: &'static str,
    },
    #[error("slug already exists")]
    SlugTaken,
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("resource not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl AdminError {
    pub fn validation(field: &'static str, problem: &'static str) -> Self {
        Self::Validation { field, problem }
    }
}

/// Compact row snapshot serialized into audit entries for content writes.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSnapshot<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub status: ContentStatus,
}

pub(crate) fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), AdminError> {
    if value.trim().is_empty() {
        return Err(AdminError::validation(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn ensure_max_chars(
    value: Option<&str>,
    max: usize,
    field: &'static str,
) -> Result<(), AdminError> {
    if let Some(value) = value
        && value.chars().count() > max
    {
        return Err(AdminError::validation(field, "exceeds maximum length"));
    }
    Ok(())
}

pub(crate) fn validate_seo(seo: &SeoMeta) -> Result<(), AdminError> {
    ensure_max_chars(seo.meta_title.as_deref(), META_TITLE_MAX, "meta_title")?;
    ensure_max_chars(
        seo.meta_title_en.as_deref(),
        META_TITLE_MAX,
        "meta_title_en",
    )?;
    ensure_max_chars(
        seo.meta_description.as_deref(),
        META_DESCRIPTION_MAX,
        "meta_description",
    )?;
    ensure_max_chars(
        seo.meta_description_en.as_deref(),
        META_DESCRIPTION_MAX,
        "meta_description_en",
    )?;
    Ok(())
}

pub(crate) fn validate_link(
    value: Option<&str>,
    field: &'static str,
) -> Result<(), AdminError> {
    if let Some(value) = value
        && !value.trim().is_empty()
        && Url::parse(value).is_err()
    {
        return Err(AdminError::validation(field, "is not a valid URL"));
    }
    Ok(())
}

/// Resolve the slug for a write: an explicit slug wins, otherwise it is
/// derived from the Vietnamese title. Either way the result is normalized
/// through the slug generator, so callers never persist free-form input.
pub(crate) fn resolve_slug(
    explicit: Option<&str>,
    title: &str,
) -> Result<String, AdminError> {
    let (source, field) = match explicit {
        Some(value) if !value.trim().is_empty() => (value, "slug"),
        _ => (title, "title"),
    };

    derive_slug(source).map_err(|err| match err {
        SlugError::EmptyInput => AdminError::validation(field, "must not be empty"),
        SlugError::Unrepresentable { .. } => {
            AdminError::validation(field, "does not produce a valid slug")
        }
    })
}

//! Content lifecycle transitions and the publish privilege gate.
//!
//! The data layer does not force a linear progression; any state can be
//! reached from any other. The two rules that hold regardless of origin:
//! `Scheduled` exists for posts only, and `Published` requires a role with
//! the publish privilege.

use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::types::{ContentKind, ContentStatus, UserRole};

/// Homepage-flag cap for a content kind, where one applies.
pub fn homepage_cap(kind: ContentKind) -> Option<i64> {
    match kind {
        ContentKind::News => Some(3),
        ContentKind::Service => Some(4),
        ContentKind::Post => None,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("scheduled status applies to posts only, not {kind}")]
    ScheduledUnsupported { kind: ContentKind },
    #[error("role `{role}` may not publish content")]
    PublishForbidden { role: UserRole },
}

/// Outcome of a validated transition: the target status plus the
/// `published_at` value the row should carry afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ContentStatus,
    pub published_at: Option<OffsetDateTime>,
}

/// Validate a requested transition for `kind` performed by `role`.
///
/// Publishing stamps `published_at` when the row has none; every other
/// transition preserves the existing value, so an archived item keeps the
/// date it originally went live.
pub fn plan_transition(
    kind: ContentKind,
    role: UserRole,
    current_published_at: Option<OffsetDateTime>,
    next: ContentStatus,
) -> Result<StatusChange, WorkflowError> {
    if next == ContentStatus::Scheduled && kind != ContentKind::Post {
        return Err(WorkflowError::ScheduledUnsupported { kind });
    }

    if next == ContentStatus::Published && !role.can_publish() {
        return Err(WorkflowError::PublishForbidden { role });
    }

    let published_at = match next {
        ContentStatus::Published => {
            Some(current_published_at.unwrap_or_else(OffsetDateTime::now_utc))
        }
        _ => current_published_at,
    };

    Ok(StatusChange {
        status: next,
        published_at,
    })
}

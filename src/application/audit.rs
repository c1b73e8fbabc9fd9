//! Best-effort audit logging.
//!
//! Audit writes are at-most-once and non-durable: a failed insert is logged
//! to the error stream and counted, never propagated, so the primary
//! operation cannot be failed by its own paper trail.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{AuditQueryFilter, AuditRepo, RepoError};
use crate::domain::entities::AuditLogRecord;
use crate::domain::types::ContentStatus;

#[derive(Debug, Clone, Copy)]
pub enum CrudAction {
    Create,
    Update,
    Delete,
}

impl CrudAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Clone)]
pub struct AuditService {
    repo: Arc<dyn AuditRepo>,
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditRepo>) -> Self {
        Self { repo }
    }

    /// Append a generic audit entry. Failures are swallowed.
    pub async fn record<S>(
        &self,
        actor: &str,
        action: &str,
        entity_type: &str,
        entity_id: Option<&str>,
        detail: Option<&S>,
    ) where
        S: Serialize,
    {
        let detail = detail.and_then(|value| match serde_json::to_string(value) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(action, error = %err, "audit detail serialization failed");
                None
            }
        });

        let record = AuditLogRecord {
            id: Uuid::new_v4(),
            actor: actor.to_string(),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.map(|value| value.to_string()),
            detail,
            created_at: OffsetDateTime::now_utc(),
        };

        if let Err(err) = self.repo.append(record).await {
            metrics::counter!("clinica_audit_dropped_total").increment(1);
            warn!(action, entity_type, error = %err, "audit entry dropped");
        }
    }

    /// Structured entry for a create/update/delete, with optional before and
    /// after snapshots.
    pub async fn record_crud<B, A>(
        &self,
        actor: &str,
        crud: CrudAction,
        entity_type: &str,
        entity_id: &str,
        before: Option<&B>,
        after: Option<&A>,
    ) where
        B: Serialize,
        A: Serialize,
    {
        let detail = serde_json::json!({
            "before": before.and_then(|v| serde_json::to_value(v).ok()),
            "after": after.and_then(|v| serde_json::to_value(v).ok()),
        });
        let action = format!("{entity_type}.{}", crud.as_str());
        self.record(actor, &action, entity_type, Some(entity_id), Some(&detail))
            .await;
    }

    pub async fn record_status_change(
        &self,
        actor: &str,
        entity_type: &str,
        entity_id: &str,
        from: ContentStatus,
        to: ContentStatus,
    ) {
        let detail = serde_json::json!({ "from": from, "to": to });
        let action = format!("{entity_type}.status");
        self.record(actor, &action, entity_type, Some(entity_id), Some(&detail))
            .await;
    }

    pub async fn record_file_operation(
        &self,
        actor: &str,
        operation: &str,
        media_id: &str,
        file_name: &str,
    ) {
        let detail = serde_json::json!({ "file_name": file_name });
        let action = format!("media.{operation}");
        self.record(actor, &action, "media", Some(media_id), Some(&detail))
            .await;
    }

    pub async fn record_auth_event(&self, actor: &str, event: &str) {
        let action = format!("auth.{event}");
        self.record(
            actor,
            &action,
            "auth",
            None,
            Option::<&serde_json::Value>::None,
        )
        .await;
    }

    /// Read side for the admin audit listing; this one does propagate errors
    /// since it backs a request, not a side channel.
    pub async fn list(
        &self,
        filter: &AuditQueryFilter,
        page: PageRequest,
    ) -> Result<Page<AuditLogRecord>, RepoError> {
        self.repo.list(filter, page).await
    }
}

//! Admin service for the media library.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::audit::AuditService;
use crate::application::auth::Principal;
use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{MediaQueryFilter, MediaRepo};
use crate::domain::entities::MediaRecord;

use super::{AdminError, ensure_non_empty};

#[derive(Debug, Clone)]
pub struct RegisterMediaCommand {
    pub url: String,
    pub file_name: String,
    pub original_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub checksum: String,
}

#[derive(Clone)]
pub struct AdminMediaService {
    pub repo: Arc<dyn MediaRepo>,
    audit: AuditService,
}

impl AdminMediaService {
    pub fn new(repo: Arc<dyn MediaRepo>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn list(
        &self,
        filter: &MediaQueryFilter,
        page: PageRequest,
    ) -> Result<Page<MediaRecord>, AdminError> {
        Ok(self.repo.list(filter, page).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<MediaRecord, AdminError> {
        self.repo.find_by_id(id).await?.ok_or(AdminError::NotFound)
    }

    /// Persist a media row after the payload has been stored.
    pub async fn register(
        &self,
        principal: &Principal,
        command: RegisterMediaCommand,
    ) -> Result<MediaRecord, AdminError> {
        ensure_non_empty(&command.file_name, "file_name")?;

        let record = MediaRecord {
            id: Uuid::new_v4(),
            url: command.url,
            file_name: command.file_name,
            original_name: command.original_name,
            file_type: command.file_type,
            file_size: command.file_size,
            checksum: command.checksum,
            uploaded_by: Some(principal.user_id),
            created_at: OffsetDateTime::now_utc(),
        };

        self.repo.insert(record.clone()).await?;
        self.audit
            .record_file_operation(
                principal.actor(),
                "upload",
                &record.id.to_string(),
                &record.file_name,
            )
            .await;

        Ok(record)
    }

    /// Delete a media row. The repository blocks the delete while content
    /// still references the row; on success the record is returned so the
    /// caller can remove the stored payload.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> Result<MediaRecord, AdminError> {
        let record = self.get(id).await?;
        self.repo.delete(id).await?;
        self.audit
            .record_file_operation(
                principal.actor(),
                "delete",
                &id.to_string(),
                &record.file_name,
            )
            .await;
        Ok(record)
    }
}

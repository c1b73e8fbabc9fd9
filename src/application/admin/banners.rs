//! Admin service for placement banners. One banner per slot.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::application::audit::{AuditService, CrudAction};
use crate::application::auth::Principal;
use crate::application::repos::{BannersRepo, CreateBannerParams, UpdateBannerParams};
use crate::domain::entities::BannerRecord;
use crate::domain::types::{BannerSlot, RecordStatus};

use super::{AdminError, validate_link};

#[derive(Debug, Clone, Serialize)]
struct BannerSnapshot {
    slot: BannerSlot,
    status: RecordStatus,
}

impl From<&BannerRecord> for BannerSnapshot {
    fn from(record: &BannerRecord) -> Self {
        Self {
            slot: record.slot,
            status: record.status,
        }
    }
}

#[derive(Clone)]
pub struct AdminBannerService {
    pub repo: Arc<dyn BannersRepo>,
    audit: AuditService,
}

impl AdminBannerService {
    pub fn new(repo: Arc<dyn BannersRepo>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self) -> Result<Vec<BannerRecord>, AdminError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<BannerRecord, AdminError> {
        self.repo.find_by_id(id).await?.ok_or(AdminError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        params: CreateBannerParams,
    ) -> Result<BannerRecord, AdminError> {
        validate_link(params.link.as_deref(), "link")?;

        let banner = self.repo.create(params).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Create,
                "banner",
                &banner.id.to_string(),
                Option::<&BannerSnapshot>::None,
                Some(&BannerSnapshot::from(&banner)),
            )
            .await;
        Ok(banner)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        params: UpdateBannerParams,
    ) -> Result<BannerRecord, AdminError> {
        validate_link(params.link.as_deref(), "link")?;

        let existing = self.get(params.id).await?;
        let banner = self.repo.update(params).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Update,
                "banner",
                &banner.id.to_string(),
                Some(&BannerSnapshot::from(&existing)),
                Some(&BannerSnapshot::from(&banner)),
            )
            .await;
        Ok(banner)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AdminError> {
        let existing = self.get(id).await?;
        self.repo.delete(id).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Delete,
                "banner",
                &id.to_string(),
                Some(&BannerSnapshot::from(&existing)),
                Option::<&BannerSnapshot>::None,
            )
            .await;
        Ok(())
    }
}

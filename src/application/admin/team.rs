//! Admin service for team member profiles.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::application::audit::{AuditService, CrudAction};
use crate::application::auth::Principal;
use crate::application::repos::{
    CreateTeamMemberParams, TeamRepo, UpdateTeamMemberParams,
};
use crate::domain::entities::{TEAM_DESCRIPTION_MAX, TeamMemberRecord};
use crate::domain::types::RecordStatus;

use super::{AdminError, ensure_max_chars, ensure_non_empty};

#[derive(Debug, Clone, Serialize)]
struct TeamSnapshot<'a> {
    name: &'a str,
    title: &'a str,
    status: RecordStatus,
}

impl<'a> From<&'a TeamMemberRecord> for TeamSnapshot<'a> {
    fn from(record: &'a TeamMemberRecord) -> Self {
        Self {
            name: &record.name,
            title: &record.title,
            status: record.status,
        }
    }
}

#[derive(Clone)]
pub struct AdminTeamService {
    pub repo: Arc<dyn TeamRepo>,
    audit: AuditService,
}

impl AdminTeamService {
    pub fn new(repo: Arc<dyn TeamRepo>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self) -> Result<Vec<TeamMemberRecord>, AdminError> {
        Ok(self.repo.list(None).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<TeamMemberRecord, AdminError> {
        self.repo.find_by_id(id).await?.ok_or(AdminError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        params: CreateTeamMemberParams,
    ) -> Result<TeamMemberRecord, AdminError> {
        Self::validate(&params.name, &params.title, params.description.as_deref(), params.description_en.as_deref())?;

        let member = self.repo.create(params).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Create,
                "team_member",
                &member.id.to_string(),
                Option::<&TeamSnapshot<'_>>::None,
                Some(&TeamSnapshot::from(&member)),
            )
            .await;
        Ok(member)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        params: UpdateTeamMemberParams,
    ) -> Result<TeamMemberRecord, AdminError> {
        Self::validate(&params.name, &params.title, params.description.as_deref(), params.description_en.as_deref())?;

        let existing = self.get(params.id).await?;
        let member = self.repo.update(params).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Update,
                "team_member",
                &member.id.to_string(),
                Some(&TeamSnapshot::from(&existing)),
                Some(&TeamSnapshot::from(&member)),
            )
            .await;
        Ok(member)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AdminError> {
        let existing = self.get(id).await?;
        self.repo.delete(id).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Delete,
                "team_member",
                &id.to_string(),
                Some(&TeamSnapshot::from(&existing)),
                Option::<&TeamSnapshot<'_>>::None,
            )
            .await;
        Ok(())
    }

    fn validate(
        name: &str,
        title: &str,
        description: Option<&str>,
        description_en: Option<&str>,
    ) -> Result<(), AdminError> {
        ensure_non_empty(name, "name")?;
        ensure_non_empty(title, "title")?;
        ensure_max_chars(description, TEAM_DESCRIPTION_MAX, "description")?;
        ensure_max_chars(description_en, TEAM_DESCRIPTION_MAX, "description_en")?;
        Ok(())
    }
}

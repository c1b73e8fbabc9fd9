//! Admin service for user accounts.
//!
//! Access to these operations is restricted to super admins at the HTTP
//! layer; the service itself only validates and audits.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::application::audit::{AuditService, CrudAction};
use crate::application::auth::Principal;
use crate::application::repos::{CreateUserParams, UpdateUserParams, UsersRepo};
use crate::domain::entities::UserRecord;
use crate::domain::types::UserRole;

use super::{AdminError, ensure_non_empty};

#[derive(Debug, Clone, Serialize)]
struct UserSnapshot<'a> {
    email: &'a str,
    role: UserRole,
}

impl<'a> From<&'a UserRecord> for UserSnapshot<'a> {
    fn from(record: &'a UserRecord) -> Self {
        Self {
            email: &record.email,
            role: record.role,
        }
    }
}

#[derive(Clone)]
pub struct AdminUserService {
    pub repo: Arc<dyn UsersRepo>,
    audit: AuditService,
}

impl AdminUserService {
    pub fn new(repo: Arc<dyn UsersRepo>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>, AdminError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<UserRecord, AdminError> {
        self.repo.find_by_id(id).await?.ok_or(AdminError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        params: CreateUserParams,
    ) -> Result<UserRecord, AdminError> {
        Self::validate(&params.email, &params.name)?;

        let user = self.repo.create(params).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Create,
                "user",
                &user.id.to_string(),
                Option::<&UserSnapshot<'_>>::None,
                Some(&UserSnapshot::from(&user)),
            )
            .await;
        Ok(user)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        params: UpdateUserParams,
    ) -> Result<UserRecord, AdminError> {
        Self::validate(&params.email, &params.name)?;

        let existing = self.get(params.id).await?;
        let user = self.repo.update(params).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Update,
                "user",
                &user.id.to_string(),
                Some(&UserSnapshot::from(&existing)),
                Some(&UserSnapshot::from(&user)),
            )
            .await;
        Ok(user)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AdminError> {
        let existing = self.get(id).await?;
        self.repo.delete(id).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Delete,
                "user",
                &id.to_string(),
                Some(&UserSnapshot::from(&existing)),
                Option::<&UserSnapshot<'_>>::None,
            )
            .await;
        Ok(())
    }

    fn validate(email: &str, name: &str) -> Result<(), AdminError> {
        ensure_non_empty(email, "email")?;
        ensure_non_empty(name, "name")?;
        if !email.contains('@') {
            return Err(AdminError::validation("email", "is not a valid address"));
        }
        Ok(())
    }
}

//! Admin service for the clinic contact card.
//!
//! Contact behaves singleton-like: the oldest active row is canonical and
//! the public site reads only that one.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::application::audit::{AuditService, CrudAction};
use crate::application::auth::Principal;
use crate::application::repos::{ContactRepo, UpsertContactParams};
use crate::domain::entities::ContactRecord;

use super::{AdminError, ensure_non_empty, validate_link};

#[derive(Debug, Clone, Serialize)]
struct ContactSnapshot<'a> {
    phone: &'a str,
    email: &'a str,
}

impl<'a> From<&'a ContactRecord> for ContactSnapshot<'a> {
    fn from(record: &'a ContactRecord) -> Self {
        Self {
            phone: &record.phone,
            email: &record.email,
        }
    }
}

#[derive(Clone)]
pub struct AdminContactService {
    pub repo: Arc<dyn ContactRepo>,
    audit: AuditService,
}

impl AdminContactService {
    pub fn new(repo: Arc<dyn ContactRepo>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn current(&self) -> Result<Option<ContactRecord>, AdminError> {
        Ok(self.repo.current().await?)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        params: UpsertContactParams,
    ) -> Result<ContactRecord, AdminError> {
        Self::validate(&params)?;

        let contact = self.repo.create(params).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Create,
                "contact",
                &contact.id.to_string(),
                Option::<&ContactSnapshot<'_>>::None,
                Some(&ContactSnapshot::from(&contact)),
            )
            .await;
        Ok(contact)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        params: UpsertContactParams,
    ) -> Result<ContactRecord, AdminError> {
        Self::validate(&params)?;

        let existing = self.repo.current().await?;
        let contact = self.repo.update(id, params).await?;
        let before = existing.as_ref().map(ContactSnapshot::from);
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Update,
                "contact",
                &contact.id.to_string(),
                before.as_ref(),
                Some(&ContactSnapshot::from(&contact)),
            )
            .await;
        Ok(contact)
    }

    fn validate(params: &UpsertContactParams) -> Result<(), AdminError> {
        ensure_non_empty(&params.phone, "phone")?;
        ensure_non_empty(&params.email, "email")?;
        ensure_non_empty(&params.address, "address")?;
        if !params.email.contains('@') {
            return Err(AdminError::validation("email", "is not a valid address"));
        }
        validate_link(params.facebook_url.as_deref(), "facebook_url")?;
        validate_link(params.zalo_url.as_deref(), "zalo_url")?;
        validate_link(params.youtube_url.as_deref(), "youtube_url")?;
        validate_link(params.appointment_link.as_deref(), "appointment_link")?;
        Ok(())
    }
}

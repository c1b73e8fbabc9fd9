//! Admin service for categories shared by posts and news.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::application::audit::{AuditService, CrudAction};
use crate::application::auth::Principal;
use crate::application::repos::{
    CategoriesRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;

use super::{AdminError, ensure_non_empty, resolve_slug};

#[derive(Debug, Clone)]
pub struct CategoryCommand {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct CategorySnapshot<'a> {
    name: &'a str,
    slug: &'a str,
}

#[derive(Clone)]
pub struct AdminCategoryService {
    pub repo: Arc<dyn CategoriesRepo>,
    audit: AuditService,
}

impl AdminCategoryService {
    pub fn new(repo: Arc<dyn CategoriesRepo>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self) -> Result<Vec<CategoryRecord>, AdminError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryRecord, AdminError> {
        self.repo.find_by_id(id).await?.ok_or(AdminError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        command: CategoryCommand,
    ) -> Result<CategoryRecord, AdminError> {
        ensure_non_empty(&command.name, "name")?;
        let slug = resolve_slug(command.slug.as_deref(), &command.name)?;
        if self.repo.slug_exists(&slug).await? {
            return Err(AdminError::SlugTaken);
        }

        let category = match self
            .repo
            .create(CreateCategoryParams {
                name: command.name,
                slug,
                description: command.description,
            })
            .await
        {
            Ok(category) => category,
            Err(RepoError::Duplicate { .. }) => return Err(AdminError::SlugTaken),
            Err(err) => return Err(err.into()),
        };

        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Create,
                "category",
                &category.id.to_string(),
                Option::<&CategorySnapshot<'_>>::None,
                Some(&CategorySnapshot {
                    name: &category.name,
                    slug: &category.slug,
                }),
            )
            .await;

        Ok(category)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        command: CategoryCommand,
    ) -> Result<CategoryRecord, AdminError> {
        ensure_non_empty(&command.name, "name")?;
        let existing = self.get(id).await?;

        let slug = match command.slug.as_deref() {
            Some(_) => resolve_slug(command.slug.as_deref(), &command.name)?,
            None => existing.slug.clone(),
        };
        if slug != existing.slug && self.repo.slug_exists(&slug).await? {
            return Err(AdminError::SlugTaken);
        }

        let category = match self
            .repo
            .update(UpdateCategoryParams {
                id,
                name: command.name,
                slug,
                description: command.description,
            })
            .await
        {
            Ok(category) => category,
            Err(RepoError::Duplicate { .. }) => return Err(AdminError::SlugTaken),
            Err(err) => return Err(err.into()),
        };

        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Update,
                "category",
                &category.id.to_string(),
                Some(&CategorySnapshot {
                    name: &existing.name,
                    slug: &existing.slug,
                }),
                Some(&CategorySnapshot {
                    name: &category.name,
                    slug: &category.slug,
                }),
            )
            .await;

        Ok(category)
    }

    /// Deletion is blocked by the repository while news or posts still
    /// reference the category; nothing cascades silently.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AdminError> {
        let existing = self.get(id).await?;
        self.repo.delete(id).await?;
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Delete,
                "category",
                &id.to_string(),
                Some(&CategorySnapshot {
                    name: &existing.name,
                    slug: &existing.slug,
                }),
                Option::<&CategorySnapshot<'_>>::None,
            )
            .await;
        Ok(())
    }
}

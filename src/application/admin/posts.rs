//! Admin service for blog posts.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::audit::{AuditService, CrudAction};
use crate::application::auth::Principal;
use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{
    CreatePostParams, ListScope, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError,
    UpdateContentStatusParams, UpdatePostParams,
};
use crate::domain::entities::{PostRecord, SeoMeta};
use crate::domain::types::{ContentKind, ContentStatus};
use crate::domain::workflow::plan_transition;

use super::{AdminError, ContentSnapshot, ensure_non_empty, resolve_slug, validate_seo};

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub status: ContentStatus,
    pub show_on_homepage: bool,
    pub category_ids: Vec<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    pub seo: SeoMeta,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub show_on_homepage: bool,
    pub category_ids: Vec<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    pub seo: SeoMeta,
}

#[derive(Clone)]
pub struct AdminPostService {
    pub reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    audit: AuditService,
}

impl AdminPostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        audit: AuditService,
    ) -> Self {
        Self {
            reader,
            writer,
            audit,
        }
    }

    pub async fn list(
        &self,
        status: Option<ContentStatus>,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, AdminError> {
        Ok(self
            .reader
            .list(ListScope::Admin { status }, filter, page)
            .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<PostRecord, AdminError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.body, "body")?;
        validate_seo(&command.seo)?;

        let slug = resolve_slug(command.slug.as_deref(), &command.title)?;
        if self.reader.slug_exists(&slug).await? {
            return Err(AdminError::SlugTaken);
        }

        // Creating directly in a given state passes through the same guard
        // as a transition, so an editor cannot create published content.
        let change = plan_transition(
            ContentKind::Post,
            principal.role,
            command.published_at,
            command.status,
        )?;

        let params = CreatePostParams {
            slug,
            title: command.title,
            title_en: command.title_en,
            body: command.body,
            body_en: command.body_en,
            short_description: command.short_description,
            short_description_en: command.short_description_en,
            status: change.status,
            show_on_homepage: command.show_on_homepage,
            category_ids: command.category_ids,
            feature_image_id: command.feature_image_id,
            feature_image_en_id: command.feature_image_en_id,
            seo: command.seo,
            author_id: Some(principal.user_id),
            published_at: change.published_at,
        };

        let post = match self.writer.create(params).await {
            Ok(post) => post,
            Err(RepoError::Duplicate { .. }) => return Err(AdminError::SlugTaken),
            Err(err) => return Err(err.into()),
        };

        let snapshot = ContentSnapshot {
            slug: &post.slug,
            title: &post.title,
            status: post.status,
        };
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Create,
                "post",
                &post.id.to_string(),
                Option::<&ContentSnapshot<'_>>::None,
                Some(&snapshot),
            )
            .await;

        Ok(post)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.body, "body")?;
        validate_seo(&command.seo)?;

        let existing = self.get(command.id).await?;

        let slug = match command.slug.as_deref() {
            Some(_) => resolve_slug(command.slug.as_deref(), &command.title)?,
            None => existing.slug.clone(),
        };
        if slug != existing.slug && self.reader.slug_exists(&slug).await? {
            return Err(AdminError::SlugTaken);
        }

        let params = UpdatePostParams {
            id: command.id,
            slug,
            title: command.title,
            title_en: command.title_en,
            body: command.body,
            body_en: command.body_en,
            short_description: command.short_description,
            short_description_en: command.short_description_en,
            show_on_homepage: command.show_on_homepage,
            category_ids: command.category_ids,
            feature_image_id: command.feature_image_id,
            feature_image_en_id: command.feature_image_en_id,
            seo: command.seo,
        };

        let post = match self.writer.update(params).await {
            Ok(post) => post,
            Err(RepoError::Duplicate { .. }) => return Err(AdminError::SlugTaken),
            Err(err) => return Err(err.into()),
        };

        let before = ContentSnapshot {
            slug: &existing.slug,
            title: &existing.title,
            status: existing.status,
        };
        let after = ContentSnapshot {
            slug: &post.slug,
            title: &post.title,
            status: post.status,
        };
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Update,
                "post",
                &post.id.to_string(),
                Some(&before),
                Some(&after),
            )
            .await;

        Ok(post)
    }

    pub async fn update_status(
        &self,
        principal: &Principal,
        id: Uuid,
        status: ContentStatus,
    ) -> Result<PostRecord, AdminError> {
        let existing = self.get(id).await?;

        let change = plan_transition(
            ContentKind::Post,
            principal.role,
            existing.published_at,
            status,
        )?;

        let post = self
            .writer
            .update_status(UpdateContentStatusParams {
                id,
                status: change.status,
                published_at: change.published_at,
            })
            .await?;

        self.audit
            .record_status_change(
                principal.actor(),
                "post",
                &id.to_string(),
                existing.status,
                post.status,
            )
            .await;

        Ok(post)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AdminError> {
        let existing = self.get(id).await?;
        self.writer.delete(id).await?;

        let before = ContentSnapshot {
            slug: &existing.slug,
            title: &existing.title,
            status: existing.status,
        };
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Delete,
                "post",
                &id.to_string(),
                Some(&before),
                Option::<&ContentSnapshot<'_>>::None,
            )
            .await;

        Ok(())
    }
}

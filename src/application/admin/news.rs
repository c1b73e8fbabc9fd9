//! Admin service for news articles.
//!
//! News carries two placement flags: `show_on_homepage` (capped at three
//! flagged rows, enforced transactionally in the repository) and `pin`,
//! which floats an article to the top of public listings.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::audit::{AuditService, CrudAction};
use crate::application::auth::Principal;
use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{
    CreateNewsParams, ListScope, NewsQueryFilter, NewsRepo, NewsWriteRepo, RepoError,
    UpdateContentStatusParams, UpdateNewsParams,
};
use crate::domain::entities::{NewsRecord, SeoMeta};
use crate::domain::types::{ContentKind, ContentStatus};
use crate::domain::workflow::plan_transition;

use super::{AdminError, ContentSnapshot, ensure_non_empty, resolve_slug, validate_seo};

#[derive(Debug, Clone)]
pub struct CreateNewsCommand {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub status: ContentStatus,
    pub show_on_homepage: bool,
    pub pin: bool,
    pub category_id: Option<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    pub seo: SeoMeta,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdateNewsCommand {
    pub id: Uuid,
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub show_on_homepage: bool,
    pub pin: bool,
    pub category_id: Option<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    pub seo: SeoMeta,
}

#[derive(Clone)]
pub struct AdminNewsService {
    pub reader: Arc<dyn NewsRepo>,
    writer: Arc<dyn NewsWriteRepo>,
    audit: AuditService,
}

impl AdminNewsService {
    pub fn new(
        reader: Arc<dyn NewsRepo>,
        writer: Arc<dyn NewsWriteRepo>,
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
        filter: &NewsQueryFilter,
        page: PageRequest,
    ) -> Result<Page<NewsRecord>, AdminError> {
        Ok(self
            .reader
            .list(ListScope::Admin { status }, filter, page)
            .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<NewsRecord, AdminError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        command: CreateNewsCommand,
    ) -> Result<NewsRecord, AdminError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.body, "body")?;
        validate_seo(&command.seo)?;

        let slug = resolve_slug(command.slug.as_deref(), &command.title)?;
        if self.reader.slug_exists(&slug).await? {
            return Err(AdminError::SlugTaken);
        }

        let change = plan_transition(
            ContentKind::News,
            principal.role,
            command.published_at,
            command.status,
        )?;

        let params = CreateNewsParams {
            slug,
            title: command.title,
            title_en: command.title_en,
            body: command.body,
            body_en: command.body_en,
            short_description: command.short_description,
            short_description_en: command.short_description_en,
            status: change.status,
            show_on_homepage: command.show_on_homepage,
            pin: command.pin,
            category_id: command.category_id,
            feature_image_id: command.feature_image_id,
            feature_image_en_id: command.feature_image_en_id,
            seo: command.seo,
            published_at: change.published_at,
        };

        let news = match self.writer.create(params).await {
            Ok(news) => news,
            Err(RepoError::Duplicate { .. }) => return Err(AdminError::SlugTaken),
            Err(err) => return Err(err.into()),
        };

        let snapshot = ContentSnapshot {
            slug: &news.slug,
            title: &news.title,
            status: news.status,
        };
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Create,
                "news",
                &news.id.to_string(),
                Option::<&ContentSnapshot<'_>>::None,
                Some(&snapshot),
            )
            .await;

        Ok(news)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        command: UpdateNewsCommand,
    ) -> Result<NewsRecord, AdminError> {
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

        let params = UpdateNewsParams {
            id: command.id,
            slug,
            title: command.title,
            title_en: command.title_en,
            body: command.body,
            body_en: command.body_en,
            short_description: command.short_description,
            short_description_en: command.short_description_en,
            show_on_homepage: command.show_on_homepage,
            pin: command.pin,
            category_id: command.category_id,
            feature_image_id: command.feature_image_id,
            feature_image_en_id: command.feature_image_en_id,
            seo: command.seo,
        };

        let news = match self.writer.update(params).await {
            Ok(news) => news,
            Err(RepoError::Duplicate { .. }) => return Err(AdminError::SlugTaken),
            Err(err) => return Err(err.into()),
        };

        let before = ContentSnapshot {
            slug: &existing.slug,
            title: &existing.title,
            status: existing.status,
        };
        let after = ContentSnapshot {
            slug: &news.slug,
            title: &news.title,
            status: news.status,
        };
        self.audit
            .record_crud(
                principal.actor(),
                CrudAction::Update,
                "news",
                &news.id.to_string(),
                Some(&before),
                Some(&after),
            )
            .await;

        Ok(news)
    }

    pub async fn update_status(
        &self,
        principal: &Principal,
        id: Uuid,
        status: ContentStatus,
    ) -> Result<NewsRecord, AdminError> {
        let existing = self.get(id).await?;

        let change = plan_transition(
            ContentKind::News,
            principal.role,
            existing.published_at,
            status,
        )?;

        let news = self
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
                "news",
                &id.to_string(),
                existing.status,
                news.status,
            )
            .await;

        Ok(news)
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
                "news",
                &id.to_string(),
                Some(&before),
                Option::<&ContentSnapshot<'_>>::None,
            )
            .await;

        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{
    CreateServiceParams, ListScope, RepoError, ServiceQueryFilter, ServicesRepo,
    ServicesWriteRepo, UpdateContentStatusParams, UpdateServiceParams,
};
use crate::domain::entities::{SeoMeta, ServiceRecord};
use crate::domain::types::{ContentKind, ContentStatus};
use crate::domain::workflow::homepage_cap;

use super::{PostgresRepositories, map_sqlx_error};

const SERVICE_COLUMNS: &str = "id, slug, title, title_en, body, body_en, \
     short_description, short_description_en, status, show_on_homepage, \
     feature_image_id, feature_image_en_id, meta_title, meta_title_en, \
     meta_description, meta_description_en, meta_keywords, meta_keywords_en, \
     created_at, updated_at, published_at";

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    slug: String,
    title: String,
    title_en: Option<String>,
    body: String,
    body_en: Option<String>,
    short_description: Option<String>,
    short_description_en: Option<String>,
    status: ContentStatus,
    show_on_homepage: bool,
    feature_image_id: Option<Uuid>,
    feature_image_en_id: Option<Uuid>,
    meta_title: Option<String>,
    meta_title_en: Option<String>,
    meta_description: Option<String>,
    meta_description_en: Option<String>,
    meta_keywords: Option<String>,
    meta_keywords_en: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    published_at: Option<OffsetDateTime>,
}

impl From<ServiceRow> for ServiceRecord {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            title_en: row.title_en,
            body: row.body,
            body_en: row.body_en,
            short_description: row.short_description,
            short_description_en: row.short_description_en,
            status: row.status,
            show_on_homepage: row.show_on_homepage,
            feature_image_id: row.feature_image_id,
            feature_image_en_id: row.feature_image_en_id,
            seo: SeoMeta {
                meta_title: row.meta_title,
                meta_title_en: row.meta_title_en,
                meta_description: row.meta_description,
                meta_description_en: row.meta_description_en,
                meta_keywords: row.meta_keywords,
                meta_keywords_en: row.meta_keywords_en,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
        }
    }
}

fn apply_conditions<'q>(
    qb: &mut QueryBuilder<'q, Postgres>,
    scope: ListScope,
    filter: &'q ServiceQueryFilter,
) {
    match scope {
        ListScope::Public => {
            qb.push(" AND status = ");
            qb.push_bind(ContentStatus::Published);
            qb.push(" AND published_at IS NOT NULL ");
        }
        ListScope::Admin { status } => {
            if let Some(status) = status {
                qb.push(" AND status = ");
                qb.push_bind(status);
            }
        }
    }

    if let Some(search) = filter.search.as_ref() {
        let pattern = format!("%{search}%");
        qb.push(" AND (title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR slug ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR COALESCE(short_description, '') ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

async fn ensure_homepage_slot(
    tx: &mut Transaction<'_, Postgres>,
    exclude: Option<Uuid>,
) -> Result<(), RepoError> {
    let Some(cap) = homepage_cap(ContentKind::Service) else {
        return Ok(());
    };

    let flagged: i64 = match exclude {
        Some(id) => {
            sqlx::query_scalar(
                "SELECT count(*) FROM (SELECT id FROM services \
                 WHERE show_on_homepage AND id <> $1 FOR UPDATE) AS flagged",
            )
            .bind(id)
            .fetch_one(&mut **tx)
            .await
        }
        None => {
            sqlx::query_scalar(
                "SELECT count(*) FROM (SELECT id FROM services \
                 WHERE show_on_homepage FOR UPDATE) AS flagged",
            )
            .fetch_one(&mut **tx)
            .await
        }
    }
    .map_err(map_sqlx_error)?;

    if flagged >= cap {
        return Err(RepoError::CapExceeded { cap });
    }
    Ok(())
}

#[async_trait]
impl ServicesRepo for PostgresRepositories {
    async fn list(
        &self,
        scope: ListScope,
        filter: &ServiceQueryFilter,
        page: PageRequest,
    ) -> Result<Page<ServiceRecord>, RepoError> {
        let mut count_qb = QueryBuilder::new("SELECT count(*) FROM services WHERE 1=1 ");
        apply_conditions(&mut count_qb, scope, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb =
            QueryBuilder::new(format!("SELECT {SERVICE_COLUMNS} FROM services WHERE 1=1 "));
        apply_conditions(&mut qb, scope, filter);
        qb.push(
            " ORDER BY COALESCE(published_at, updated_at, created_at) DESC, id DESC LIMIT ",
        );
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows = qb
            .build_query_as::<ServiceRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let records = rows.into_iter().map(ServiceRecord::from).collect();
        Ok(Page::new(records, page, Self::convert_count(total)?))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceRecord>, RepoError> {
        let row: Option<ServiceRow> =
            sqlx::query_as(&format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(ServiceRecord::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ServiceRecord>, RepoError> {
        let row: Option<ServiceRow> =
            sqlx::query_as(&format!("SELECT {SERVICE_COLUMNS} FROM services WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(ServiceRecord::from))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM services WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ServicesWriteRepo for PostgresRepositories {
    async fn create(&self, params: CreateServiceParams) -> Result<ServiceRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        if params.show_on_homepage {
            ensure_homepage_slot(&mut tx, None).await?;
        }

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row: ServiceRow = sqlx::query_as(&format!(
            "INSERT INTO services (\
                id, slug, title, title_en, body, body_en, \
                short_description, short_description_en, status, show_on_homepage, \
                feature_image_id, feature_image_en_id, meta_title, meta_title_en, \
                meta_description, meta_description_en, meta_keywords, meta_keywords_en, \
                created_at, updated_at, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $19, $20) \
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(id)
        .bind(&params.slug)
        .bind(&params.title)
        .bind(&params.title_en)
        .bind(&params.body)
        .bind(&params.body_en)
        .bind(&params.short_description)
        .bind(&params.short_description_en)
        .bind(params.status)
        .bind(params.show_on_homepage)
        .bind(params.feature_image_id)
        .bind(params.feature_image_en_id)
        .bind(&params.seo.meta_title)
        .bind(&params.seo.meta_title_en)
        .bind(&params.seo.meta_description)
        .bind(&params.seo.meta_description_en)
        .bind(&params.seo.meta_keywords)
        .bind(&params.seo.meta_keywords_en)
        .bind(now)
        .bind(params.published_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(ServiceRecord::from(row))
    }

    async fn update(&self, params: UpdateServiceParams) -> Result<ServiceRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        if params.show_on_homepage {
            let already_flagged: bool = sqlx::query_scalar(
                "SELECT COALESCE((SELECT show_on_homepage FROM services WHERE id = $1), FALSE)",
            )
            .bind(params.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            if !already_flagged {
                ensure_homepage_slot(&mut tx, Some(params.id)).await?;
            }
        }

        let now = OffsetDateTime::now_utc();
        let row: Option<ServiceRow> = sqlx::query_as(&format!(
            "UPDATE services SET \
                slug = $2, title = $3, title_en = $4, body = $5, body_en = $6, \
                short_description = $7, short_description_en = $8, \
                show_on_homepage = $9, feature_image_id = $10, feature_image_en_id = $11, \
                meta_title = $12, meta_title_en = $13, meta_description = $14, \
                meta_description_en = $15, meta_keywords = $16, meta_keywords_en = $17, \
                updated_at = $18 \
             WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.slug)
        .bind(&params.title)
        .bind(&params.title_en)
        .bind(&params.body)
        .bind(&params.body_en)
        .bind(&params.short_description)
        .bind(&params.short_description_en)
        .bind(params.show_on_homepage)
        .bind(params.feature_image_id)
        .bind(params.feature_image_en_id)
        .bind(&params.seo.meta_title)
        .bind(&params.seo.meta_title_en)
        .bind(&params.seo.meta_description)
        .bind(&params.seo.meta_description_en)
        .bind(&params.seo.meta_keywords)
        .bind(&params.seo.meta_keywords_en)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let row = row.ok_or(RepoError::NotFound)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(ServiceRecord::from(row))
    }

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<ServiceRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row: Option<ServiceRow> = sqlx::query_as(&format!(
            "UPDATE services SET status = $2, published_at = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(params.status)
        .bind(params.published_at)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ServiceRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

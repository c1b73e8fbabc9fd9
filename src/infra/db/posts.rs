use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{
    CreatePostParams, ListScope, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError,
    UpdateContentStatusParams, UpdatePostParams,
};
use crate::domain::entities::{PostRecord, SeoMeta};
use crate::domain::types::ContentStatus;

use super::{PostgresRepositories, map_sqlx_error};

const POST_COLUMNS: &str = "id, slug, title, title_en, body, body_en, \
     short_description, short_description_en, status, show_on_homepage, \
     feature_image_id, feature_image_en_id, meta_title, meta_title_en, \
     meta_description, meta_description_en, meta_keywords, meta_keywords_en, \
     author_id, created_at, updated_at, published_at";

#[derive(sqlx::FromRow)]
struct PostRow {
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
    author_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    published_at: Option<OffsetDateTime>,
}

impl PostRow {
    fn into_record(self, category_ids: Vec<Uuid>) -> PostRecord {
        PostRecord {
            id: self.id,
            slug: self.slug,
            title: self.title,
            title_en: self.title_en,
            body: self.body,
            body_en: self.body_en,
            short_description: self.short_description,
            short_description_en: self.short_description_en,
            status: self.status,
            show_on_homepage: self.show_on_homepage,
            category_ids,
            feature_image_id: self.feature_image_id,
            feature_image_en_id: self.feature_image_en_id,
            seo: SeoMeta {
                meta_title: self.meta_title,
                meta_title_en: self.meta_title_en,
                meta_description: self.meta_description,
                meta_description_en: self.meta_description_en,
                meta_keywords: self.meta_keywords,
                meta_keywords_en: self.meta_keywords_en,
            },
            author_id: self.author_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            published_at: self.published_at,
        }
    }
}

fn apply_conditions<'q>(
    qb: &mut QueryBuilder<'q, Postgres>,
    scope: ListScope,
    filter: &'q PostQueryFilter,
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

    if let Some(category_id) = filter.category_id {
        qb.push(
            " AND EXISTS (SELECT 1 FROM post_categories pc \
             WHERE pc.post_id = posts.id AND pc.category_id = ",
        );
        qb.push_bind(category_id);
        qb.push(")");
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

impl PostgresRepositories {
    async fn post_categories(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Uuid>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT post_id, category_id FROM post_categories WHERE post_id = ANY($1) \
             ORDER BY category_id",
        )
        .bind(post_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (post_id, category_id) in rows {
            map.entry(post_id).or_default().push(category_id);
        }
        Ok(map)
    }

    async fn attach_categories(&self, row: PostRow) -> Result<PostRecord, RepoError> {
        let mut categories = self.post_categories(&[row.id]).await?;
        let ids = categories.remove(&row.id).unwrap_or_default();
        Ok(row.into_record(ids))
    }
}

async fn replace_categories(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), RepoError> {
    sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

    if category_ids.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::new("INSERT INTO post_categories (post_id, category_id) ");
    qb.push_values(category_ids, |mut row, category_id| {
        row.push_bind(post_id);
        row.push_bind(category_id);
    });
    qb.build()
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

    Ok(())
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list(
        &self,
        scope: ListScope,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        let mut count_qb = QueryBuilder::new("SELECT count(*) FROM posts WHERE 1=1 ");
        apply_conditions(&mut count_qb, scope, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE 1=1 "));
        apply_conditions(&mut qb, scope, filter);
        qb.push(
            " ORDER BY COALESCE(published_at, updated_at, created_at) DESC, id DESC LIMIT ",
        );
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut categories = self.post_categories(&ids).await?;
        let records = rows
            .into_iter()
            .map(|row| {
                let ids = categories.remove(&row.id).unwrap_or_default();
                row.into_record(ids)
            })
            .collect();

        Ok(Page::new(records, page, Self::convert_count(total)?))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(self.attach_categories(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(self.attach_categories(row).await?)),
            None => Ok(None),
        }
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row: PostRow = sqlx::query_as(&format!(
            "INSERT INTO posts (\
                id, slug, title, title_en, body, body_en, \
                short_description, short_description_en, status, show_on_homepage, \
                feature_image_id, feature_image_en_id, meta_title, meta_title_en, \
                meta_description, meta_description_en, meta_keywords, meta_keywords_en, \
                author_id, created_at, updated_at, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $20, $20, $21) \
             RETURNING {POST_COLUMNS}"
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
        .bind(params.author_id)
        .bind(now)
        .bind(params.published_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        replace_categories(&mut tx, id, &params.category_ids).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(row.into_record(params.category_ids))
    }

    async fn update(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let now = OffsetDateTime::now_utc();
        let row: Option<PostRow> = sqlx::query_as(&format!(
            "UPDATE posts SET \
                slug = $2, title = $3, title_en = $4, body = $5, body_en = $6, \
                short_description = $7, short_description_en = $8, \
                show_on_homepage = $9, feature_image_id = $10, feature_image_en_id = $11, \
                meta_title = $12, meta_title_en = $13, meta_description = $14, \
                meta_description_en = $15, meta_keywords = $16, meta_keywords_en = $17, \
                updated_at = $18 \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
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
        replace_categories(&mut tx, params.id, &params.category_ids).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(row.into_record(params.category_ids))
    }

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<PostRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row: Option<PostRow> = sqlx::query_as(&format!(
            "UPDATE posts SET status = $2, published_at = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(params.id)
        .bind(params.status)
        .bind(params.published_at)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let row = row.ok_or(RepoError::NotFound)?;
        self.attach_categories(row).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

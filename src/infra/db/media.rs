use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{MediaQueryFilter, MediaRepo, RepoError};
use crate::domain::entities::MediaRecord;

use super::{PostgresRepositories, map_sqlx_error};

const MEDIA_COLUMNS: &str =
    "id, url, file_name, original_name, file_type, file_size, checksum, uploaded_by, created_at";

#[derive(sqlx::FromRow)]
struct MediaRow {
    id: Uuid,
    url: String,
    file_name: String,
    original_name: String,
    file_type: String,
    file_size: i64,
    checksum: String,
    uploaded_by: Option<Uuid>,
    created_at: OffsetDateTime,
}

impl From<MediaRow> for MediaRecord {
    fn from(row: MediaRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            file_name: row.file_name,
            original_name: row.original_name,
            file_type: row.file_type,
            file_size: row.file_size,
            checksum: row.checksum,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        }
    }
}

fn apply_filter<'q>(
    qb: &mut QueryBuilder<'q, sqlx::Postgres>,
    filter: &'q MediaQueryFilter,
) {
    if let Some(file_type) = filter.file_type.as_ref() {
        qb.push(" AND file_type = ");
        qb.push_bind(file_type);
    }

    if let Some(search) = filter.search.as_ref() {
        let pattern = format!("%{search}%");
        qb.push(" AND (file_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR original_name ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

#[async_trait]
impl MediaRepo for PostgresRepositories {
    async fn insert(&self, record: MediaRecord) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO media (id, url, file_name, original_name, file_type, file_size, \
                 checksum, uploaded_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(record.id)
        .bind(&record.url)
        .bind(&record.file_name)
        .bind(&record.original_name)
        .bind(&record.file_type)
        .bind(record.file_size)
        .bind(&record.checksum)
        .bind(record.uploaded_by)
        .bind(record.created_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaRecord>, RepoError> {
        let row: Option<MediaRow> =
            sqlx::query_as(&format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(MediaRecord::from))
    }

    async fn list(
        &self,
        filter: &MediaQueryFilter,
        page: PageRequest,
    ) -> Result<Page<MediaRecord>, RepoError> {
        let mut count_qb = QueryBuilder::new("SELECT count(*) FROM media WHERE 1=1 ");
        apply_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::new(format!("SELECT {MEDIA_COLUMNS} FROM media WHERE 1=1 "));
        apply_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows = qb
            .build_query_as::<MediaRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let records = rows.into_iter().map(MediaRecord::from).collect();
        Ok(Page::new(records, page, Self::convert_count(total)?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        // Reference check and delete share a transaction so a concurrent
        // write cannot slip a reference in between the two.
        let references: i64 = sqlx::query_scalar(
            "SELECT \
               (SELECT count(*) FROM posts \
                  WHERE feature_image_id = $1 OR feature_image_en_id = $1) + \
               (SELECT count(*) FROM news \
                  WHERE feature_image_id = $1 OR feature_image_en_id = $1) + \
               (SELECT count(*) FROM services \
                  WHERE feature_image_id = $1 OR feature_image_en_id = $1) + \
               (SELECT count(*) FROM team_members \
                  WHERE image_id = $1 OR image_en_id = $1) + \
               (SELECT count(*) FROM banners WHERE image_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if references > 0 {
            return Err(RepoError::Integrity {
                message: format!("media is referenced by {references} content records"),
            });
        }

        let result = sqlx::query("DELETE FROM media WHERE id = $1")
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

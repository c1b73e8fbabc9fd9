use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    BannersRepo, CreateBannerParams, RepoError, UpdateBannerParams,
};
use crate::domain::entities::BannerRecord;
use crate::domain::types::{BannerSlot, RecordStatus};

use super::{PostgresRepositories, map_sqlx_error};

const BANNER_COLUMNS: &str = "id, slot, link, status, image_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BannerRow {
    id: Uuid,
    slot: BannerSlot,
    link: Option<String>,
    status: RecordStatus,
    image_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BannerRow> for BannerRecord {
    fn from(row: BannerRow) -> Self {
        Self {
            id: row.id,
            slot: row.slot,
            link: row.link,
            status: row.status,
            image_id: row.image_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BannersRepo for PostgresRepositories {
    async fn list(&self) -> Result<Vec<BannerRecord>, RepoError> {
        let rows: Vec<BannerRow> =
            sqlx::query_as(&format!("SELECT {BANNER_COLUMNS} FROM banners ORDER BY slot"))
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(BannerRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BannerRecord>, RepoError> {
        let row: Option<BannerRow> =
            sqlx::query_as(&format!("SELECT {BANNER_COLUMNS} FROM banners WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(BannerRecord::from))
    }

    async fn find_by_slot(&self, slot: BannerSlot) -> Result<Option<BannerRecord>, RepoError> {
        let row: Option<BannerRow> =
            sqlx::query_as(&format!("SELECT {BANNER_COLUMNS} FROM banners WHERE slot = $1"))
                .bind(slot)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(BannerRecord::from))
    }

    async fn create(&self, params: CreateBannerParams) -> Result<BannerRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row: BannerRow = sqlx::query_as(&format!(
            "INSERT INTO banners (id, slot, link, status, image_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {BANNER_COLUMNS}"
        ))
        .bind(id)
        .bind(params.slot)
        .bind(&params.link)
        .bind(params.status)
        .bind(params.image_id)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BannerRecord::from(row))
    }

    async fn update(&self, params: UpdateBannerParams) -> Result<BannerRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row: Option<BannerRow> = sqlx::query_as(&format!(
            "UPDATE banners SET link = $2, status = $3, image_id = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {BANNER_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.link)
        .bind(params.status)
        .bind(params.image_id)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(BannerRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
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

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ContactRepo, RepoError, UpsertContactParams};
use crate::domain::entities::ContactRecord;
use crate::domain::types::RecordStatus;

use super::{PostgresRepositories, map_sqlx_error};

const CONTACT_COLUMNS: &str = "id, phone, email, address, address_en, business_hours, \
     business_hours_en, facebook_url, zalo_url, youtube_url, appointment_link, status, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    phone: String,
    email: String,
    address: String,
    address_en: Option<String>,
    business_hours: Option<String>,
    business_hours_en: Option<String>,
    facebook_url: Option<String>,
    zalo_url: Option<String>,
    youtube_url: Option<String>,
    appointment_link: Option<String>,
    status: RecordStatus,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ContactRow> for ContactRecord {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            phone: row.phone,
            email: row.email,
            address: row.address,
            address_en: row.address_en,
            business_hours: row.business_hours,
            business_hours_en: row.business_hours_en,
            facebook_url: row.facebook_url,
            zalo_url: row.zalo_url,
            youtube_url: row.youtube_url,
            appointment_link: row.appointment_link,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ContactRepo for PostgresRepositories {
    async fn current(&self) -> Result<Option<ContactRecord>, RepoError> {
        let row: Option<ContactRow> = sqlx::query_as(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE status = $1 \
             ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(RecordStatus::Active)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(ContactRecord::from))
    }

    async fn create(&self, params: UpsertContactParams) -> Result<ContactRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row: ContactRow = sqlx::query_as(&format!(
            "INSERT INTO contacts (\
                id, phone, email, address, address_en, business_hours, business_hours_en, \
                facebook_url, zalo_url, youtube_url, appointment_link, status, \
                created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13) \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(&params.phone)
        .bind(&params.email)
        .bind(&params.address)
        .bind(&params.address_en)
        .bind(&params.business_hours)
        .bind(&params.business_hours_en)
        .bind(&params.facebook_url)
        .bind(&params.zalo_url)
        .bind(&params.youtube_url)
        .bind(&params.appointment_link)
        .bind(params.status)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ContactRecord::from(row))
    }

    async fn update(
        &self,
        id: Uuid,
        params: UpsertContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row: Option<ContactRow> = sqlx::query_as(&format!(
            "UPDATE contacts SET \
                phone = $2, email = $3, address = $4, address_en = $5, \
                business_hours = $6, business_hours_en = $7, facebook_url = $8, \
                zalo_url = $9, youtube_url = $10, appointment_link = $11, status = $12, \
                updated_at = $13 \
             WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(&params.phone)
        .bind(&params.email)
        .bind(&params.address)
        .bind(&params.address_en)
        .bind(&params.business_hours)
        .bind(&params.business_hours_en)
        .bind(&params.facebook_url)
        .bind(&params.zalo_url)
        .bind(&params.youtube_url)
        .bind(&params.appointment_link)
        .bind(params.status)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ContactRecord::from).ok_or(RepoError::NotFound)
    }
}

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateTeamMemberParams, RepoError, TeamRepo, UpdateTeamMemberParams,
};
use crate::domain::entities::TeamMemberRecord;
use crate::domain::types::RecordStatus;

use super::{PostgresRepositories, map_sqlx_error};

const TEAM_COLUMNS: &str = "id, name, name_en, title, title_en, description, description_en, \
     sort_order, status, image_id, image_en_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TeamMemberRow {
    id: Uuid,
    name: String,
    name_en: Option<String>,
    title: String,
    title_en: Option<String>,
    description: Option<String>,
    description_en: Option<String>,
    sort_order: i32,
    status: RecordStatus,
    image_id: Option<Uuid>,
    image_en_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<TeamMemberRow> for TeamMemberRecord {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            name_en: row.name_en,
            title: row.title,
            title_en: row.title_en,
            description: row.description,
            description_en: row.description_en,
            sort_order: row.sort_order,
            status: row.status,
            image_id: row.image_id,
            image_en_id: row.image_en_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TeamRepo for PostgresRepositories {
    async fn list(
        &self,
        status: Option<RecordStatus>,
    ) -> Result<Vec<TeamMemberRecord>, RepoError> {
        let rows: Vec<TeamMemberRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {TEAM_COLUMNS} FROM team_members WHERE status = $1 \
                     ORDER BY sort_order ASC, created_at ASC"
                ))
                .bind(status)
                .fetch_all(self.pool())
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {TEAM_COLUMNS} FROM team_members \
                     ORDER BY sort_order ASC, created_at ASC"
                ))
                .fetch_all(self.pool())
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TeamMemberRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamMemberRecord>, RepoError> {
        let row: Option<TeamMemberRow> =
            sqlx::query_as(&format!("SELECT {TEAM_COLUMNS} FROM team_members WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(TeamMemberRecord::from))
    }

    async fn create(
        &self,
        params: CreateTeamMemberParams,
    ) -> Result<TeamMemberRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row: TeamMemberRow = sqlx::query_as(&format!(
            "INSERT INTO team_members (\
                id, name, name_en, title, title_en, description, description_en, \
                sort_order, status, image_id, image_en_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) \
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(&params.name)
        .bind(&params.name_en)
        .bind(&params.title)
        .bind(&params.title_en)
        .bind(&params.description)
        .bind(&params.description_en)
        .bind(params.sort_order)
        .bind(params.status)
        .bind(params.image_id)
        .bind(params.image_en_id)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(TeamMemberRecord::from(row))
    }

    async fn update(
        &self,
        params: UpdateTeamMemberParams,
    ) -> Result<TeamMemberRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row: Option<TeamMemberRow> = sqlx::query_as(&format!(
            "UPDATE team_members SET \
                name = $2, name_en = $3, title = $4, title_en = $5, \
                description = $6, description_en = $7, sort_order = $8, status = $9, \
                image_id = $10, image_en_id = $11, updated_at = $12 \
             WHERE id = $1 RETURNING {TEAM_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.name)
        .bind(&params.name_en)
        .bind(&params.title)
        .bind(&params.title_en)
        .bind(&params.description)
        .bind(&params.description_en)
        .bind(params.sort_order)
        .bind(params.status)
        .bind(params.image_id)
        .bind(params.image_en_id)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(TeamMemberRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
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

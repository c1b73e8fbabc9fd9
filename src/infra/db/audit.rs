use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{AuditQueryFilter, AuditRepo, RepoError};
use crate::domain::entities::AuditLogRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    actor: String,
    action: String,
    entity_type: String,
    entity_id: Option<String>,
    detail: Option<String>,
    created_at: OffsetDateTime,
}

impl From<AuditRow> for AuditLogRecord {
    fn from(row: AuditRow) -> Self {
        Self {
            id: row.id,
            actor: row.actor,
            action: row.action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

fn apply_filter<'q>(
    qb: &mut QueryBuilder<'q, sqlx::Postgres>,
    filter: &'q AuditQueryFilter,
) {
    if let Some(actor) = filter.actor.as_ref() {
        qb.push(" AND actor ILIKE ");
        qb.push_bind(format!("%{actor}%"));
    }

    if let Some(action) = filter.action.as_ref() {
        qb.push(" AND action ILIKE ");
        qb.push_bind(format!("%{action}%"));
    }

    if let Some(entity_type) = filter.entity_type.as_ref() {
        qb.push(" AND entity_type = ");
        qb.push_bind(entity_type);
    }
}

#[async_trait]
impl AuditRepo for PostgresRepositories {
    async fn append(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO audit_logs (id, actor, action, entity_type, entity_id, detail, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.id)
        .bind(&record.actor)
        .bind(&record.action)
        .bind(&record.entity_type)
        .bind(&record.entity_id)
        .bind(&record.detail)
        .bind(record.created_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list(
        &self,
        filter: &AuditQueryFilter,
        page: PageRequest,
    ) -> Result<Page<AuditLogRecord>, RepoError> {
        let mut count_qb = QueryBuilder::new("SELECT count(*) FROM audit_logs WHERE 1=1 ");
        apply_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::new(
            "SELECT id, actor, action, entity_type, entity_id, detail, created_at \
             FROM audit_logs WHERE 1=1 ",
        );
        apply_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows = qb
            .build_query_as::<AuditRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let records = rows.into_iter().map(AuditLogRecord::from).collect();
        Ok(Page::new(records, page, Self::convert_count(total)?))
    }
}

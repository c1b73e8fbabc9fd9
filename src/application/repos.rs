//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::domain::entities::{
    AuditLogRecord, BannerRecord, CategoryRecord, ContactRecord, MediaRecord, NewsRecord,
    PostRecord, SeoMeta, ServiceRecord, TeamMemberRecord, UserRecord,
};
use crate::domain::types::{BannerSlot, ContentStatus, RecordStatus, UserRole};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("homepage cap of {cap} reached")]
    CapExceeded { cap: i64 },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Listing scope: the public site sees published rows only, the admin
/// dashboard sees everything with an optional status filter.
#[derive(Debug, Clone, Copy)]
pub enum ListScope {
    Public,
    Admin { status: Option<ContentStatus> },
}

#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewsQueryFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub pinned: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceQueryFilter {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaQueryFilter {
    pub file_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AuditQueryFilter {
    pub actor: Option<String>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub title_en: Option<String>,
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
    pub author_id: Option<Uuid>,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub title_en: Option<String>,
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

#[derive(Debug, Clone, Copy)]
pub struct UpdateContentStatusParams {
    pub id: Uuid,
    pub status: ContentStatus,
    pub published_at: Option<OffsetDateTime>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list(
        &self,
        scope: ListScope,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<PostRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateNewsParams {
    pub slug: String,
    pub title: String,
    pub title_en: Option<String>,
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
pub struct UpdateNewsParams {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub title_en: Option<String>,
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

#[async_trait]
pub trait NewsRepo: Send + Sync {
    async fn list(
        &self,
        scope: ListScope,
        filter: &NewsQueryFilter,
        page: PageRequest,
    ) -> Result<Page<NewsRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NewsRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<NewsRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait NewsWriteRepo: Send + Sync {
    /// Creation enforces the homepage cap inside a single transaction.
    async fn create(&self, params: CreateNewsParams) -> Result<NewsRecord, RepoError>;

    async fn update(&self, params: UpdateNewsParams) -> Result<NewsRecord, RepoError>;

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<NewsRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateServiceParams {
    pub slug: String,
    pub title: String,
    pub title_en: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub status: ContentStatus,
    pub show_on_homepage: bool,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    pub seo: SeoMeta,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdateServiceParams {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub title_en: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub show_on_homepage: bool,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    pub seo: SeoMeta,
}

#[async_trait]
pub trait ServicesRepo: Send + Sync {
    async fn list(
        &self,
        scope: ListScope,
        filter: &ServiceQueryFilter,
        page: PageRequest,
    ) -> Result<Page<ServiceRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ServiceRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait ServicesWriteRepo: Send + Sync {
    async fn create(&self, params: CreateServiceParams) -> Result<ServiceRecord, RepoError>;

    async fn update(&self, params: UpdateServiceParams) -> Result<ServiceRecord, RepoError>;

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<ServiceRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateTeamMemberParams {
    pub name: String,
    pub name_en: Option<String>,
    pub title: String,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    pub sort_order: i32,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
    pub image_en_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct UpdateTeamMemberParams {
    pub id: Uuid,
    pub name: String,
    pub name_en: Option<String>,
    pub title: String,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    pub sort_order: i32,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
    pub image_en_id: Option<Uuid>,
}

#[async_trait]
pub trait TeamRepo: Send + Sync {
    /// Ordered by `sort_order`; `status` narrows to active rows for the
    /// public site.
    async fn list(&self, status: Option<RecordStatus>)
    -> Result<Vec<TeamMemberRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamMemberRecord>, RepoError>;

    async fn create(&self, params: CreateTeamMemberParams)
    -> Result<TeamMemberRecord, RepoError>;

    async fn update(&self, params: UpdateTeamMemberParams)
    -> Result<TeamMemberRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateBannerParams {
    pub slot: BannerSlot,
    pub link: Option<String>,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct UpdateBannerParams {
    pub id: Uuid,
    pub link: Option<String>,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
}

#[async_trait]
pub trait BannersRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<BannerRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BannerRecord>, RepoError>;

    async fn find_by_slot(&self, slot: BannerSlot) -> Result<Option<BannerRecord>, RepoError>;

    /// The per-slot uniqueness invariant is enforced by the storage engine;
    /// a second banner for an occupied slot surfaces as [`RepoError::Duplicate`].
    async fn create(&self, params: CreateBannerParams) -> Result<BannerRecord, RepoError>;

    async fn update(&self, params: UpdateBannerParams) -> Result<BannerRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertContactParams {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub address_en: Option<String>,
    pub business_hours: Option<String>,
    pub business_hours_en: Option<String>,
    pub facebook_url: Option<String>,
    pub zalo_url: Option<String>,
    pub youtube_url: Option<String>,
    pub appointment_link: Option<String>,
    pub status: RecordStatus,
}

#[async_trait]
pub trait ContactRepo: Send + Sync {
    /// The oldest active row, treated as the canonical contact card.
    async fn current(&self) -> Result<Option<ContactRecord>, RepoError>;

    async fn create(&self, params: UpsertContactParams) -> Result<ContactRecord, RepoError>;

    async fn update(
        &self,
        id: Uuid,
        params: UpsertContactParams,
    ) -> Result<ContactRecord, RepoError>;
}

#[async_trait]
pub trait MediaRepo: Send + Sync {
    async fn insert(&self, record: MediaRecord) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaRecord>, RepoError>;

    async fn list(
        &self,
        filter: &MediaQueryFilter,
        page: PageRequest,
    ) -> Result<Page<MediaRecord>, RepoError>;

    /// Deletion counts references across posts, news, services, team members
    /// and banners inside the delete transaction; a non-zero count surfaces
    /// as [`RepoError::Integrity`].
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn create(&self, params: CreateCategoryParams) -> Result<CategoryRecord, RepoError>;

    async fn update(&self, params: UpdateCategoryParams) -> Result<CategoryRecord, RepoError>;

    /// Blocked while any news or post row references the category.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone)]
pub struct UpdateUserParams {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<UserRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;

    async fn create(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    async fn update(&self, params: UpdateUserParams) -> Result<UserRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AuditRepo: Send + Sync {
    async fn append(&self, record: AuditLogRecord) -> Result<(), RepoError>;

    async fn list(
        &self,
        filter: &AuditQueryFilter,
        page: PageRequest,
    ) -> Result<Page<AuditLogRecord>, RepoError>;
}

/// Stored access token for bearer authentication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prefix: String,
    pub token_hash: Vec<u8>,
    pub label: Option<String>,
    pub created_at: OffsetDateTime,
    pub expires_at: Option<OffsetDateTime>,
    pub revoked_at: Option<OffsetDateTime>,
}

#[async_trait]
pub trait AuthRepo: Send + Sync {
    async fn find_token_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Option<AccessTokenRecord>, RepoError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;
}

//! Domain entities mirrored from persistent storage.
//!
//! Bilingual fields come in pairs: the Vietnamese value is canonical and the
//! `_en` companion is an optional translation resolved per field at read
//! time (see [`crate::domain::locale`]).

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{BannerSlot, ContentStatus, RecordStatus, UserRole};

/// Maximum length for `meta_title` / `meta_title_en`.
pub const META_TITLE_MAX: usize = 65;
/// Maximum length for `meta_description` / `meta_description_en`.
pub const META_DESCRIPTION_MAX: usize = 155;
/// Maximum length for the team member description pair.
pub const TEAM_DESCRIPTION_MAX: usize = 300;

/// SEO metadata attached to slugged content rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub meta_title: Option<String>,
    pub meta_title_en: Option<String>,
    pub meta_description: Option<String>,
    pub meta_description_en: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_keywords_en: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
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
    #[serde(flatten)]
    pub seo: SeoMeta,
    pub author_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRecord {
    pub id: Uuid,
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
    #[serde(flatten)]
    pub seo: SeoMeta,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRecord {
    pub id: Uuid,
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
    #[serde(flatten)]
    pub seo: SeoMeta,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMemberRecord {
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerRecord {
    pub id: Uuid,
    pub slot: BannerSlot,
    pub link: Option<String>,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Clinic contact card. The first active row is treated as canonical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRecord {
    pub id: Uuid,
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRecord {
    pub id: Uuid,
    pub url: String,
    pub file_name: String,
    pub original_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub checksum: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Append-only audit trail row. Never updated or deleted by the application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub detail: Option<String>,
    pub created_at: OffsetDateTime,
}

//! Request and response models for the admin and public API surfaces.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageMeta;
use crate::domain::entities::{
    AuditLogRecord, BannerRecord, ContactRecord, MediaRecord, NewsRecord, PostRecord, SeoMeta,
    ServiceRecord, TeamMemberRecord,
};
use crate::domain::locale::Locale;
use crate::domain::types::{BannerSlot, ContentStatus, RecordStatus, UserRole};

fn default_status() -> ContentStatus {
    ContentStatus::Draft
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    #[serde(default = "default_status")]
    pub status: ContentStatus,
    #[serde(default)]
    pub show_on_homepage: bool,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    #[serde(flatten)]
    pub seo: SeoMeta,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostUpdateRequest {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    #[serde(default)]
    pub show_on_homepage: bool,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    #[serde(flatten)]
    pub seo: SeoMeta,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewsCreateRequest {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    #[serde(default = "default_status")]
    pub status: ContentStatus,
    #[serde(default)]
    pub show_on_homepage: bool,
    #[serde(default)]
    pub pin: bool,
    pub category_id: Option<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    #[serde(flatten)]
    pub seo: SeoMeta,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewsUpdateRequest {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    #[serde(default)]
    pub show_on_homepage: bool,
    #[serde(default)]
    pub pin: bool,
    pub category_id: Option<Uuid>,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    #[serde(flatten)]
    pub seo: SeoMeta,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServiceCreateRequest {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    #[serde(default = "default_status")]
    pub status: ContentStatus,
    #[serde(default)]
    pub show_on_homepage: bool,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    #[serde(flatten)]
    pub seo: SeoMeta,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServiceUpdateRequest {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub body_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    #[serde(default)]
    pub show_on_homepage: bool,
    pub feature_image_id: Option<Uuid>,
    pub feature_image_en_id: Option<Uuid>,
    #[serde(flatten)]
    pub seo: SeoMeta,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusRequest {
    pub status: ContentStatus,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TeamMemberRequest {
    pub name: String,
    pub name_en: Option<String>,
    pub title: String,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
    pub image_en_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BannerCreateRequest {
    pub slot: BannerSlot,
    pub link: Option<String>,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BannerUpdateRequest {
    pub link: Option<String>,
    pub status: RecordStatus,
    pub image_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ContactRequest {
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

#[derive(Debug, Deserialize, Serialize)]
pub struct CategoryRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserRequest {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<ContentStatus>,
    pub category: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub file_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub actor: Option<String>,
    pub action: Option<String>,
    pub entity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleQuery {
    #[serde(default)]
    pub locale: Locale,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostRecord>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct NewsListResponse {
    pub news: Vec<NewsRecord>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceRecord>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    pub media: Vec<MediaRecord>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub entries: Vec<AuditLogRecord>,
    pub meta: PageMeta,
}

/// Locale-resolved view of a content row for the public site.
///
/// Resolution is per field: a record with a translated title but an
/// untranslated body mixes both languages in one response.
#[derive(Debug, Serialize)]
pub struct PublicContent {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub short_description: Option<String>,
    pub feature_image_id: Option<Uuid>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pin: bool,
    pub published_at: Option<OffsetDateTime>,
}

fn pick_owned(locale: Locale, primary: &str, english: Option<&str>) -> String {
    locale.pick(primary, english).to_string()
}

fn pick_optional_owned(
    locale: Locale,
    primary: Option<&str>,
    english: Option<&str>,
) -> Option<String> {
    locale
        .pick_optional(primary, english)
        .map(|value| value.to_string())
}

fn pick_image(locale: Locale, primary: Option<Uuid>, english: Option<Uuid>) -> Option<Uuid> {
    match locale {
        Locale::En => english.or(primary),
        Locale::Vi => primary,
    }
}

fn localized_seo(locale: Locale, seo: &SeoMeta) -> (Option<String>, Option<String>, Option<String>) {
    (
        pick_optional_owned(locale, seo.meta_title.as_deref(), seo.meta_title_en.as_deref()),
        pick_optional_owned(
            locale,
            seo.meta_description.as_deref(),
            seo.meta_description_en.as_deref(),
        ),
        pick_optional_owned(
            locale,
            seo.meta_keywords.as_deref(),
            seo.meta_keywords_en.as_deref(),
        ),
    )
}

impl PublicContent {
    pub fn from_post(record: &PostRecord, locale: Locale) -> Self {
        let (meta_title, meta_description, meta_keywords) = localized_seo(locale, &record.seo);
        Self {
            id: record.id,
            slug: record.slug.clone(),
            title: pick_owned(locale, &record.title, record.title_en.as_deref()),
            body: pick_owned(locale, &record.body, record.body_en.as_deref()),
            short_description: pick_optional_owned(
                locale,
                record.short_description.as_deref(),
                record.short_description_en.as_deref(),
            ),
            feature_image_id: pick_image(
                locale,
                record.feature_image_id,
                record.feature_image_en_id,
            ),
            meta_title,
            meta_description,
            meta_keywords,
            category_id: None,
            category_ids: record.category_ids.clone(),
            pin: false,
            published_at: record.published_at,
        }
    }

    pub fn from_news(record: &NewsRecord, locale: Locale) -> Self {
        let (meta_title, meta_description, meta_keywords) = localized_seo(locale, &record.seo);
        Self {
            id: record.id,
            slug: record.slug.clone(),
            title: pick_owned(locale, &record.title, record.title_en.as_deref()),
            body: pick_owned(locale, &record.body, record.body_en.as_deref()),
            short_description: pick_optional_owned(
                locale,
                record.short_description.as_deref(),
                record.short_description_en.as_deref(),
            ),
            feature_image_id: pick_image(
                locale,
                record.feature_image_id,
                record.feature_image_en_id,
            ),
            meta_title,
            meta_description,
            meta_keywords,
            category_id: record.category_id,
            category_ids: Vec::new(),
            pin: record.pin,
            published_at: record.published_at,
        }
    }

    pub fn from_service(record: &ServiceRecord, locale: Locale) -> Self {
        let (meta_title, meta_description, meta_keywords) = localized_seo(locale, &record.seo);
        Self {
            id: record.id,
            slug: record.slug.clone(),
            title: pick_owned(locale, &record.title, record.title_en.as_deref()),
            body: pick_owned(locale, &record.body, record.body_en.as_deref()),
            short_description: pick_optional_owned(
                locale,
                record.short_description.as_deref(),
                record.short_description_en.as_deref(),
            ),
            feature_image_id: pick_image(
                locale,
                record.feature_image_id,
                record.feature_image_en_id,
            ),
            meta_title,
            meta_description,
            meta_keywords,
            category_id: None,
            category_ids: Vec::new(),
            pin: false,
            published_at: record.published_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicListResponse {
    pub items: Vec<PublicContent>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PublicTeamMember {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub image_id: Option<Uuid>,
    pub sort_order: i32,
}

impl PublicTeamMember {
    pub fn from_record(record: &TeamMemberRecord, locale: Locale) -> Self {
        Self {
            id: record.id,
            name: pick_owned(locale, &record.name, record.name_en.as_deref()),
            title: pick_owned(locale, &record.title, record.title_en.as_deref()),
            description: pick_optional_owned(
                locale,
                record.description.as_deref(),
                record.description_en.as_deref(),
            ),
            image_id: pick_image(locale, record.image_id, record.image_en_id),
            sort_order: record.sort_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicBanner {
    pub slot: BannerSlot,
    pub link: Option<String>,
    pub image_id: Option<Uuid>,
}

impl From<&BannerRecord> for PublicBanner {
    fn from(record: &BannerRecord) -> Self {
        Self {
            slot: record.slot,
            link: record.link.clone(),
            image_id: record.image_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicContact {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub business_hours: Option<String>,
    pub facebook_url: Option<String>,
    pub zalo_url: Option<String>,
    pub youtube_url: Option<String>,
    pub appointment_link: Option<String>,
}

impl PublicContact {
    pub fn from_record(record: &ContactRecord, locale: Locale) -> Self {
        Self {
            phone: record.phone.clone(),
            email: record.email.clone(),
            address: pick_owned(locale, &record.address, record.address_en.as_deref()),
            business_hours: pick_optional_owned(
                locale,
                record.business_hours.as_deref(),
                record.business_hours_en.as_deref(),
            ),
            facebook_url: record.facebook_url.clone(),
            zalo_url: record.zalo_url.clone(),
            youtube_url: record.youtube_url.clone(),
            appointment_link: record.appointment_link.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub id: Uuid,
    pub url: String,
    pub file_name: String,
    pub original_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub checksum: String,
    pub created_at: OffsetDateTime,
}

impl From<&MediaRecord> for MediaResponse {
    fn from(record: &MediaRecord) -> Self {
        Self {
            id: record.id,
            url: record.url.clone(),
            file_name: record.file_name.clone(),
            original_name: record.original_name.clone(),
            file_type: record.file_type.clone(),
            file_size: record.file_size,
            checksum: record.checksum.clone(),
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SeoMeta;
    use crate::domain::types::ContentStatus;

    fn sample_news() -> NewsRecord {
        let now = OffsetDateTime::now_utc();
        NewsRecord {
            id: Uuid::new_v4(),
            slug: "tri-lieu-moi".into(),
            title: "Trị liệu mới".into(),
            title_en: Some("New therapy".into()),
            body: "Nội dung".into(),
            body_en: None,
            short_description: Some("Tóm tắt".into()),
            short_description_en: Some("  ".into()),
            status: ContentStatus::Published,
            show_on_homepage: false,
            pin: true,
            category_id: None,
            feature_image_id: Some(Uuid::new_v4()),
            feature_image_en_id: None,
            seo: SeoMeta::default(),
            created_at: now,
            updated_at: now,
            published_at: Some(now),
        }
    }

    #[test]
    fn public_view_mixes_translated_and_fallback_fields() {
        let record = sample_news();
        let view = PublicContent::from_news(&record, Locale::En);

        assert_eq!(view.title, "New therapy");
        assert_eq!(view.body, "Nội dung");
        assert_eq!(view.short_description.as_deref(), Some("Tóm tắt"));
        assert_eq!(view.feature_image_id, record.feature_image_id);
        assert!(view.pin);
    }

    #[test]
    fn default_locale_ignores_translations() {
        let record = sample_news();
        let view = PublicContent::from_news(&record, Locale::Vi);
        assert_eq!(view.title, "Trị liệu mới");
    }
}

//! Router-level tests against in-memory repositories.
//!
//! The real axum router and services run unchanged; only the persistence
//! traits are swapped for in-memory fakes, so auth, role gates, invariants
//! and localization are exercised end to end without a database.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use clinica::application::admin::banners::AdminBannerService;
use clinica::application::admin::categories::AdminCategoryService;
use clinica::application::admin::contact::AdminContactService;
use clinica::application::admin::media::AdminMediaService;
use clinica::application::admin::news::AdminNewsService;
use clinica::application::admin::posts::AdminPostService;
use clinica::application::admin::services::AdminServiceService;
use clinica::application::admin::team::AdminTeamService;
use clinica::application::admin::users::AdminUserService;
use clinica::application::audit::AuditService;
use clinica::application::auth::AuthService;
use clinica::application::pagination::{Page, PageRequest};
use clinica::application::repos::*;
use clinica::domain::entities::*;
use clinica::domain::types::*;
use clinica::domain::workflow::homepage_cap;
use clinica::infra::http::{ApiState, build_router};
use clinica::infra::media::MediaStorage;

const EDITOR_TOKEN: &str = "clt_editor00aaaaaaaaaaaaaaaa";
const ADMIN_TOKEN: &str = "clt_admin000bbbbbbbbbbbbbbbb";
const SUPER_TOKEN: &str = "clt_super000cccccccccccccccc";

#[derive(Default)]
struct MemoryRepos {
    posts: Mutex<Vec<PostRecord>>,
    news: Mutex<Vec<NewsRecord>>,
    services: Mutex<Vec<ServiceRecord>>,
    team: Mutex<Vec<TeamMemberRecord>>,
    banners: Mutex<Vec<BannerRecord>>,
    contacts: Mutex<Vec<ContactRecord>>,
    media: Mutex<Vec<MediaRecord>>,
    categories: Mutex<Vec<CategoryRecord>>,
    users: Mutex<Vec<UserRecord>>,
    audit: Mutex<Vec<AuditLogRecord>>,
    tokens: Mutex<Vec<AccessTokenRecord>>,
}

fn paginate<T: Clone>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let window = items
        .into_iter()
        .skip(start)
        .take(page.limit() as usize)
        .collect();
    Page::new(window, page, total)
}

fn duplicate(constraint: &str) -> RepoError {
    RepoError::Duplicate {
        constraint: constraint.to_string(),
    }
}

fn content_visible(status: ContentStatus, published_at: Option<OffsetDateTime>) -> bool {
    status == ContentStatus::Published && published_at.is_some()
}

#[async_trait]
impl PostsRepo for MemoryRepos {
    async fn list(
        &self,
        scope: ListScope,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        let posts = self.posts.lock().await;
        let items: Vec<PostRecord> = posts
            .iter()
            .filter(|post| match scope {
                ListScope::Public => content_visible(post.status, post.published_at),
                ListScope::Admin { status } => status.is_none_or(|status| post.status == status),
            })
            .filter(|post| {
                filter
                    .category_id
                    .is_none_or(|category| post.category_ids.contains(&category))
            })
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.posts.lock().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.posts.lock().await.iter().any(|p| p.slug == slug))
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryRepos {
    async fn create(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        if posts.iter().any(|p| p.slug == params.slug) {
            return Err(duplicate("posts_slug_key"));
        }
        let now = OffsetDateTime::now_utc();
        let record = PostRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            title_en: params.title_en,
            body: params.body,
            body_en: params.body_en,
            short_description: params.short_description,
            short_description_en: params.short_description_en,
            status: params.status,
            show_on_homepage: params.show_on_homepage,
            category_ids: params.category_ids,
            feature_image_id: params.feature_image_id,
            feature_image_en_id: params.feature_image_en_id,
            seo: params.seo,
            author_id: params.author_id,
            created_at: now,
            updated_at: now,
            published_at: params.published_at,
        };
        posts.push(record.clone());
        Ok(record)
    }

    async fn update(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.slug = params.slug;
        post.title = params.title;
        post.title_en = params.title_en;
        post.body = params.body;
        post.body_en = params.body_en;
        post.short_description = params.short_description;
        post.short_description_en = params.short_description_en;
        post.show_on_homepage = params.show_on_homepage;
        post.category_ids = params.category_ids;
        post.feature_image_id = params.feature_image_id;
        post.feature_image_en_id = params.feature_image_en_id;
        post.seo = params.seo;
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.status = params.status;
        post.published_at = params.published_at;
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl NewsRepo for MemoryRepos {
    async fn list(
        &self,
        scope: ListScope,
        filter: &NewsQueryFilter,
        page: PageRequest,
    ) -> Result<Page<NewsRecord>, RepoError> {
        let news = self.news.lock().await;
        let items: Vec<NewsRecord> = news
            .iter()
            .filter(|article| match scope {
                ListScope::Public => content_visible(article.status, article.published_at),
                ListScope::Admin { status } => {
                    status.is_none_or(|status| article.status == status)
                }
            })
            .filter(|article| {
                filter
                    .category_id
                    .is_none_or(|category| article.category_id == Some(category))
            })
            .filter(|article| filter.pinned.is_none_or(|pinned| article.pin == pinned))
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NewsRecord>, RepoError> {
        Ok(self.news.lock().await.iter().find(|n| n.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<NewsRecord>, RepoError> {
        Ok(self
            .news
            .lock()
            .await
            .iter()
            .find(|n| n.slug == slug)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.news.lock().await.iter().any(|n| n.slug == slug))
    }
}

#[async_trait]
impl NewsWriteRepo for MemoryRepos {
    async fn create(&self, params: CreateNewsParams) -> Result<NewsRecord, RepoError> {
        let mut news = self.news.lock().await;
        if news.iter().any(|n| n.slug == params.slug) {
            return Err(duplicate("news_slug_key"));
        }
        if params.show_on_homepage {
            let cap = homepage_cap(ContentKind::News).unwrap_or(i64::MAX);
            let flagged = news.iter().filter(|n| n.show_on_homepage).count() as i64;
            if flagged >= cap {
                return Err(RepoError::CapExceeded { cap });
            }
        }
        let now = OffsetDateTime::now_utc();
        let record = NewsRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            title_en: params.title_en,
            body: params.body,
            body_en: params.body_en,
            short_description: params.short_description,
            short_description_en: params.short_description_en,
            status: params.status,
            show_on_homepage: params.show_on_homepage,
            pin: params.pin,
            category_id: params.category_id,
            feature_image_id: params.feature_image_id,
            feature_image_en_id: params.feature_image_en_id,
            seo: params.seo,
            created_at: now,
            updated_at: now,
            published_at: params.published_at,
        };
        news.push(record.clone());
        Ok(record)
    }

    async fn update(&self, params: UpdateNewsParams) -> Result<NewsRecord, RepoError> {
        let mut news = self.news.lock().await;
        if params.show_on_homepage {
            let cap = homepage_cap(ContentKind::News).unwrap_or(i64::MAX);
            let flagged = news
                .iter()
                .filter(|n| n.show_on_homepage && n.id != params.id)
                .count() as i64;
            let already = news
                .iter()
                .any(|n| n.id == params.id && n.show_on_homepage);
            if !already && flagged >= cap {
                return Err(RepoError::CapExceeded { cap });
            }
        }
        let article = news
            .iter_mut()
            .find(|n| n.id == params.id)
            .ok_or(RepoError::NotFound)?;
        article.slug = params.slug;
        article.title = params.title;
        article.title_en = params.title_en;
        article.body = params.body;
        article.body_en = params.body_en;
        article.short_description = params.short_description;
        article.short_description_en = params.short_description_en;
        article.show_on_homepage = params.show_on_homepage;
        article.pin = params.pin;
        article.category_id = params.category_id;
        article.feature_image_id = params.feature_image_id;
        article.feature_image_en_id = params.feature_image_en_id;
        article.seo = params.seo;
        article.updated_at = OffsetDateTime::now_utc();
        Ok(article.clone())
    }

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<NewsRecord, RepoError> {
        let mut news = self.news.lock().await;
        let article = news
            .iter_mut()
            .find(|n| n.id == params.id)
            .ok_or(RepoError::NotFound)?;
        article.status = params.status;
        article.published_at = params.published_at;
        article.updated_at = OffsetDateTime::now_utc();
        Ok(article.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut news = self.news.lock().await;
        let before = news.len();
        news.retain(|n| n.id != id);
        if news.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ServicesRepo for MemoryRepos {
    async fn list(
        &self,
        scope: ListScope,
        _filter: &ServiceQueryFilter,
        page: PageRequest,
    ) -> Result<Page<ServiceRecord>, RepoError> {
        let services = self.services.lock().await;
        let items: Vec<ServiceRecord> = services
            .iter()
            .filter(|service| match scope {
                ListScope::Public => content_visible(service.status, service.published_at),
                ListScope::Admin { status } => {
                    status.is_none_or(|status| service.status == status)
                }
            })
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceRecord>, RepoError> {
        Ok(self
            .services
            .lock()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ServiceRecord>, RepoError> {
        Ok(self
            .services
            .lock()
            .await
            .iter()
            .find(|s| s.slug == slug)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.services.lock().await.iter().any(|s| s.slug == slug))
    }
}

#[async_trait]
impl ServicesWriteRepo for MemoryRepos {
    async fn create(&self, params: CreateServiceParams) -> Result<ServiceRecord, RepoError> {
        let mut services = self.services.lock().await;
        if services.iter().any(|s| s.slug == params.slug) {
            return Err(duplicate("services_slug_key"));
        }
        if params.show_on_homepage {
            let cap = homepage_cap(ContentKind::Service).unwrap_or(i64::MAX);
            let flagged = services.iter().filter(|s| s.show_on_homepage).count() as i64;
            if flagged >= cap {
                return Err(RepoError::CapExceeded { cap });
            }
        }
        let now = OffsetDateTime::now_utc();
        let record = ServiceRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            title_en: params.title_en,
            body: params.body,
            body_en: params.body_en,
            short_description: params.short_description,
            short_description_en: params.short_description_en,
            status: params.status,
            show_on_homepage: params.show_on_homepage,
            feature_image_id: params.feature_image_id,
            feature_image_en_id: params.feature_image_en_id,
            seo: params.seo,
            created_at: now,
            updated_at: now,
            published_at: params.published_at,
        };
        services.push(record.clone());
        Ok(record)
    }

    async fn update(&self, params: UpdateServiceParams) -> Result<ServiceRecord, RepoError> {
        let mut services = self.services.lock().await;
        let service = services
            .iter_mut()
            .find(|s| s.id == params.id)
            .ok_or(RepoError::NotFound)?;
        service.slug = params.slug;
        service.title = params.title;
        service.title_en = params.title_en;
        service.body = params.body;
        service.body_en = params.body_en;
        service.short_description = params.short_description;
        service.short_description_en = params.short_description_en;
        service.show_on_homepage = params.show_on_homepage;
        service.feature_image_id = params.feature_image_id;
        service.feature_image_en_id = params.feature_image_en_id;
        service.seo = params.seo;
        service.updated_at = OffsetDateTime::now_utc();
        Ok(service.clone())
    }

    async fn update_status(
        &self,
        params: UpdateContentStatusParams,
    ) -> Result<ServiceRecord, RepoError> {
        let mut services = self.services.lock().await;
        let service = services
            .iter_mut()
            .find(|s| s.id == params.id)
            .ok_or(RepoError::NotFound)?;
        service.status = params.status;
        service.published_at = params.published_at;
        service.updated_at = OffsetDateTime::now_utc();
        Ok(service.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut services = self.services.lock().await;
        let before = services.len();
        services.retain(|s| s.id != id);
        if services.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TeamRepo for MemoryRepos {
    async fn list(
        &self,
        status: Option<RecordStatus>,
    ) -> Result<Vec<TeamMemberRecord>, RepoError> {
        let mut members: Vec<TeamMemberRecord> = self
            .team
            .lock()
            .await
            .iter()
            .filter(|m| status.is_none_or(|status| m.status == status))
            .cloned()
            .collect();
        members.sort_by_key(|m| m.sort_order);
        Ok(members)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamMemberRecord>, RepoError> {
        Ok(self.team.lock().await.iter().find(|m| m.id == id).cloned())
    }

    async fn create(
        &self,
        params: CreateTeamMemberParams,
    ) -> Result<TeamMemberRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let record = TeamMemberRecord {
            id: Uuid::new_v4(),
            name: params.name,
            name_en: params.name_en,
            title: params.title,
            title_en: params.title_en,
            description: params.description,
            description_en: params.description_en,
            sort_order: params.sort_order,
            status: params.status,
            image_id: params.image_id,
            image_en_id: params.image_en_id,
            created_at: now,
            updated_at: now,
        };
        self.team.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        params: UpdateTeamMemberParams,
    ) -> Result<TeamMemberRecord, RepoError> {
        let mut team = self.team.lock().await;
        let member = team
            .iter_mut()
            .find(|m| m.id == params.id)
            .ok_or(RepoError::NotFound)?;
        member.name = params.name;
        member.name_en = params.name_en;
        member.title = params.title;
        member.title_en = params.title_en;
        member.description = params.description;
        member.description_en = params.description_en;
        member.sort_order = params.sort_order;
        member.status = params.status;
        member.image_id = params.image_id;
        member.image_en_id = params.image_en_id;
        member.updated_at = OffsetDateTime::now_utc();
        Ok(member.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut team = self.team.lock().await;
        let before = team.len();
        team.retain(|m| m.id != id);
        if team.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BannersRepo for MemoryRepos {
    async fn list(&self) -> Result<Vec<BannerRecord>, RepoError> {
        Ok(self.banners.lock().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BannerRecord>, RepoError> {
        Ok(self
            .banners
            .lock()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn find_by_slot(&self, slot: BannerSlot) -> Result<Option<BannerRecord>, RepoError> {
        Ok(self
            .banners
            .lock()
            .await
            .iter()
            .find(|b| b.slot == slot)
            .cloned())
    }

    async fn create(&self, params: CreateBannerParams) -> Result<BannerRecord, RepoError> {
        let mut banners = self.banners.lock().await;
        if banners.iter().any(|b| b.slot == params.slot) {
            return Err(duplicate("banners_slot_key"));
        }
        let now = OffsetDateTime::now_utc();
        let record = BannerRecord {
            id: Uuid::new_v4(),
            slot: params.slot,
            link: params.link,
            status: params.status,
            image_id: params.image_id,
            created_at: now,
            updated_at: now,
        };
        banners.push(record.clone());
        Ok(record)
    }

    async fn update(&self, params: UpdateBannerParams) -> Result<BannerRecord, RepoError> {
        let mut banners = self.banners.lock().await;
        let banner = banners
            .iter_mut()
            .find(|b| b.id == params.id)
            .ok_or(RepoError::NotFound)?;
        banner.link = params.link;
        banner.status = params.status;
        banner.image_id = params.image_id;
        banner.updated_at = OffsetDateTime::now_utc();
        Ok(banner.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut banners = self.banners.lock().await;
        let before = banners.len();
        banners.retain(|b| b.id != id);
        if banners.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ContactRepo for MemoryRepos {
    async fn current(&self) -> Result<Option<ContactRecord>, RepoError> {
        Ok(self
            .contacts
            .lock()
            .await
            .iter()
            .filter(|c| c.status == RecordStatus::Active)
            .min_by_key(|c| c.created_at)
            .cloned())
    }

    async fn create(&self, params: UpsertContactParams) -> Result<ContactRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let record = ContactRecord {
            id: Uuid::new_v4(),
            phone: params.phone,
            email: params.email,
            address: params.address,
            address_en: params.address_en,
            business_hours: params.business_hours,
            business_hours_en: params.business_hours_en,
            facebook_url: params.facebook_url,
            zalo_url: params.zalo_url,
            youtube_url: params.youtube_url,
            appointment_link: params.appointment_link,
            status: params.status,
            created_at: now,
            updated_at: now,
        };
        self.contacts.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        params: UpsertContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let mut contacts = self.contacts.lock().await;
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        contact.phone = params.phone;
        contact.email = params.email;
        contact.address = params.address;
        contact.address_en = params.address_en;
        contact.business_hours = params.business_hours;
        contact.business_hours_en = params.business_hours_en;
        contact.facebook_url = params.facebook_url;
        contact.zalo_url = params.zalo_url;
        contact.youtube_url = params.youtube_url;
        contact.appointment_link = params.appointment_link;
        contact.status = params.status;
        contact.updated_at = OffsetDateTime::now_utc();
        Ok(contact.clone())
    }
}

#[async_trait]
impl MediaRepo for MemoryRepos {
    async fn insert(&self, record: MediaRecord) -> Result<(), RepoError> {
        self.media.lock().await.push(record);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaRecord>, RepoError> {
        Ok(self.media.lock().await.iter().find(|m| m.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &MediaQueryFilter,
        page: PageRequest,
    ) -> Result<Page<MediaRecord>, RepoError> {
        let media = self.media.lock().await;
        let items: Vec<MediaRecord> = media
            .iter()
            .filter(|m| {
                filter
                    .file_type
                    .as_deref()
                    .is_none_or(|file_type| m.file_type == file_type)
            })
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let references = {
            let news = self.news.lock().await;
            let posts = self.posts.lock().await;
            let services = self.services.lock().await;
            let team = self.team.lock().await;
            let banners = self.banners.lock().await;
            posts
                .iter()
                .filter(|p| {
                    p.feature_image_id == Some(id) || p.feature_image_en_id == Some(id)
                })
                .count()
                + news
                    .iter()
                    .filter(|n| {
                        n.feature_image_id == Some(id) || n.feature_image_en_id == Some(id)
                    })
                    .count()
                + services
                    .iter()
                    .filter(|s| {
                        s.feature_image_id == Some(id) || s.feature_image_en_id == Some(id)
                    })
                    .count()
                + team
                    .iter()
                    .filter(|m| m.image_id == Some(id) || m.image_en_id == Some(id))
                    .count()
                + banners.iter().filter(|b| b.image_id == Some(id)).count()
        };

        if references > 0 {
            return Err(RepoError::Integrity {
                message: format!("media is referenced by {references} content records"),
            });
        }

        let mut media = self.media.lock().await;
        let before = media.len();
        media.retain(|m| m.id != id);
        if media.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoriesRepo for MemoryRepos {
    async fn list(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(self.categories.lock().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(self
            .categories
            .lock()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.categories.lock().await.iter().any(|c| c.slug == slug))
    }

    async fn create(&self, params: CreateCategoryParams) -> Result<CategoryRecord, RepoError> {
        let mut categories = self.categories.lock().await;
        if categories.iter().any(|c| c.slug == params.slug) {
            return Err(duplicate("categories_slug_key"));
        }
        let now = OffsetDateTime::now_utc();
        let record = CategoryRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            description: params.description,
            created_at: now,
            updated_at: now,
        };
        categories.push(record.clone());
        Ok(record)
    }

    async fn update(&self, params: UpdateCategoryParams) -> Result<CategoryRecord, RepoError> {
        let mut categories = self.categories.lock().await;
        let category = categories
            .iter_mut()
            .find(|c| c.id == params.id)
            .ok_or(RepoError::NotFound)?;
        category.name = params.name;
        category.slug = params.slug;
        category.description = params.description;
        category.updated_at = OffsetDateTime::now_utc();
        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let referenced = {
            let news = self.news.lock().await;
            let posts = self.posts.lock().await;
            news.iter().any(|n| n.category_id == Some(id))
                || posts.iter().any(|p| p.category_ids.contains(&id))
        };
        if referenced {
            return Err(RepoError::Integrity {
                message: "category is referenced by content records".to_string(),
            });
        }

        let mut categories = self.categories.lock().await;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UsersRepo for MemoryRepos {
    async fn list(&self) -> Result<Vec<UserRecord>, RepoError> {
        Ok(self.users.lock().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.users.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == params.email) {
            return Err(duplicate("users_email_key"));
        }
        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            name: params.name,
            role: params.role,
            created_at: now,
            updated_at: now,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn update(&self, params: UpdateUserParams) -> Result<UserRecord, RepoError> {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == params.id)
            .ok_or(RepoError::NotFound)?;
        user.email = params.email;
        user.name = params.name;
        user.role = params.role;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AuditRepo for MemoryRepos {
    async fn append(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        self.audit.lock().await.push(record);
        Ok(())
    }

    async fn list(
        &self,
        filter: &AuditQueryFilter,
        page: PageRequest,
    ) -> Result<Page<AuditLogRecord>, RepoError> {
        let audit = self.audit.lock().await;
        let items: Vec<AuditLogRecord> = audit
            .iter()
            .filter(|entry| {
                filter
                    .action
                    .as_deref()
                    .is_none_or(|action| entry.action.contains(action))
            })
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }
}

#[async_trait]
impl AuthRepo for MemoryRepos {
    async fn find_token_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Option<AccessTokenRecord>, RepoError> {
        Ok(self
            .tokens
            .lock()
            .await
            .iter()
            .find(|t| t.prefix == prefix)
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        UsersRepo::find_by_id(self, id).await
    }
}

struct TestHarness {
    router: Router,
    repos: Arc<MemoryRepos>,
    _media_dir: tempfile::TempDir,
}

async fn seed_account(repos: &MemoryRepos, email: &str, role: UserRole, token: &str) {
    let now = OffsetDateTime::now_utc();
    let user = UserRecord {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: email.to_string(),
        role,
        created_at: now,
        updated_at: now,
    };
    repos.tokens.lock().await.push(AccessTokenRecord {
        id: Uuid::new_v4(),
        user_id: user.id,
        prefix: token[..12].to_string(),
        token_hash: AuthService::hash_token(token),
        label: None,
        created_at: now,
        expires_at: None,
        revoked_at: None,
    });
    repos.users.lock().await.push(user);
}

async fn harness() -> TestHarness {
    let repos = Arc::new(MemoryRepos::default());

    seed_account(&repos, "editor@clinic.vn", UserRole::Editor, EDITOR_TOKEN).await;
    seed_account(&repos, "admin@clinic.vn", UserRole::Admin, ADMIN_TOKEN).await;
    seed_account(&repos, "boss@clinic.vn", UserRole::SuperAdmin, SUPER_TOKEN).await;

    let media_dir = tempfile::tempdir().expect("tempdir");
    let media_storage = Arc::new(
        MediaStorage::new(media_dir.path().to_path_buf(), "/media").expect("storage"),
    );

    let audit = AuditService::new(repos.clone() as Arc<dyn AuditRepo>);
    let auth = AuthService::new(repos.clone() as Arc<dyn AuthRepo>);

    let state = ApiState {
        auth,
        audit: audit.clone(),
        posts: Arc::new(AdminPostService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        news: Arc::new(AdminNewsService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        services: Arc::new(AdminServiceService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        team: Arc::new(AdminTeamService::new(repos.clone(), audit.clone())),
        banners: Arc::new(AdminBannerService::new(repos.clone(), audit.clone())),
        contact: Arc::new(AdminContactService::new(repos.clone(), audit.clone())),
        media: Arc::new(AdminMediaService::new(repos.clone(), audit.clone())),
        categories: Arc::new(AdminCategoryService::new(repos.clone(), audit.clone())),
        users: Arc::new(AdminUserService::new(repos.clone(), audit)),
        media_storage,
        db: None,
    };

    TestHarness {
        router: build_router(state),
        repos,
        _media_dir: media_dir,
    }
}

fn request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

fn news_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "body": "Nội dung bài viết",
    })
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let harness = harness().await;
    let (status, body) = send(&harness.router, request("GET", "/api/v1/news", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn unknown_tokens_are_rejected() {
    let harness = harness().await;
    let (status, _) = send(
        &harness.router,
        request(
            "GET",
            "/api/v1/news",
            Some("clt_nobody00zzzzzzzzzzzz"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn slug_is_derived_and_collisions_are_rejected() {
    let harness = harness().await;

    let (status, body) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Chiro Therapy")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "chiro-therapy");
    assert_eq!(body["status"], "draft");

    let (status, body) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Chiro Therapy")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "slug_taken");
    assert_eq!(body["error"]["message"], "slug already exists");
}

#[tokio::test]
async fn punctuation_only_titles_fail_validation() {
    let harness = harness().await;
    let (status, body) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("???")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn editors_cannot_publish_and_state_is_unchanged() {
    let harness = harness().await;

    let (_, created) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Tin mới")),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &harness.router,
        request(
            "PATCH",
            &format!("/api/v1/news/{id}/status"),
            Some(EDITOR_TOKEN),
            Some(serde_json::json!({"status": "published"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");

    let stored = harness.repos.news.lock().await;
    assert_eq!(stored[0].status, ContentStatus::Draft);
    assert!(stored[0].published_at.is_none());
}

#[tokio::test]
async fn super_admin_publish_appends_an_audit_entry() {
    let harness = harness().await;

    let (_, created) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Tin sắp đăng")),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &harness.router,
        request(
            "PATCH",
            &format!("/api/v1/news/{id}/status"),
            Some(SUPER_TOKEN),
            Some(serde_json::json!({"status": "published"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "published");
    assert!(!body["published_at"].is_null());

    let audit = harness.repos.audit.lock().await;
    let entry = audit
        .iter()
        .find(|entry| entry.action == "news.status")
        .expect("status audit entry");
    assert_eq!(entry.actor, "boss@clinic.vn");
    assert_eq!(entry.entity_id.as_deref(), Some(id.as_str()));
    let detail: serde_json::Value =
        serde_json::from_str(entry.detail.as_deref().expect("detail")).expect("json");
    assert_eq!(detail["from"], "draft");
    assert_eq!(detail["to"], "published");
}

#[tokio::test]
async fn scheduled_status_is_rejected_for_news() {
    let harness = harness().await;

    let (_, created) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Tin không hẹn giờ")),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &harness.router,
        request(
            "PATCH",
            &format!("/api/v1/news/{id}/status"),
            Some(ADMIN_TOKEN),
            Some(serde_json::json!({"status": "scheduled"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn homepage_cap_rejects_the_fourth_news_item() {
    let harness = harness().await;

    for n in 0..3 {
        let mut payload = news_payload(&format!("Tin nổi bật {n}"));
        payload["show_on_homepage"] = serde_json::json!(true);
        let (status, _) = send(
            &harness.router,
            request("POST", "/api/v1/news", Some(EDITOR_TOKEN), Some(payload)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut payload = news_payload("Tin nổi bật 3");
    payload["show_on_homepage"] = serde_json::json!(true);
    let (status, body) = send(
        &harness.router,
        request("POST", "/api/v1/news", Some(EDITOR_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "homepage_cap_reached");
    assert_eq!(harness.repos.news.lock().await.len(), 3);
}

fn service_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "body": "Mô tả dịch vụ",
    })
}

#[tokio::test]
async fn service_publish_via_status_patch_is_audited() {
    let harness = harness().await;

    let (_, created) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/services",
            Some(EDITOR_TOKEN),
            Some(service_payload("Trị liệu thần kinh cột sống")),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &harness.router,
        request(
            "PATCH",
            &format!("/api/v1/services/{id}/status"),
            Some(SUPER_TOKEN),
            Some(serde_json::json!({"status": "published"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "published");

    let audit = harness.repos.audit.lock().await;
    assert!(
        audit
            .iter()
            .any(|entry| entry.action == "service.status"
                && entry.entity_id.as_deref() == Some(id.as_str()))
    );
}

#[tokio::test]
async fn homepage_cap_rejects_the_fifth_service() {
    let harness = harness().await;

    for n in 0..4 {
        let mut payload = service_payload(&format!("Dịch vụ nổi bật {n}"));
        payload["show_on_homepage"] = serde_json::json!(true);
        let (status, _) = send(
            &harness.router,
            request("POST", "/api/v1/services", Some(EDITOR_TOKEN), Some(payload)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut payload = service_payload("Dịch vụ nổi bật 4");
    payload["show_on_homepage"] = serde_json::json!(true);
    let (status, body) = send(
        &harness.router,
        request("POST", "/api/v1/services", Some(EDITOR_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "homepage_cap_reached");
    assert_eq!(harness.repos.services.lock().await.len(), 4);
}

#[tokio::test]
async fn editors_cannot_create_posts_directly_in_published_state() {
    let harness = harness().await;

    let payload = serde_json::json!({
        "title": "Bài viết mới",
        "body": "Nội dung",
        "status": "published",
    });
    let (status, _) = send(
        &harness.router,
        request("POST", "/api/v1/posts", Some(EDITOR_TOKEN), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(harness.repos.posts.lock().await.is_empty());

    // The same body from an admin lands published with a stamped date.
    let (status, body) = send(
        &harness.router,
        request("POST", "/api/v1/posts", Some(ADMIN_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "bai-viet-moi");
    assert!(!body["published_at"].is_null());

    let (status, public) = send(
        &harness.router,
        request("GET", "/public/posts/bai-viet-moi", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public["title"], "Bài viết mới");
}

#[tokio::test]
async fn referenced_media_cannot_be_deleted() {
    let harness = harness().await;

    let media_id = Uuid::new_v4();
    harness.repos.media.lock().await.push(MediaRecord {
        id: media_id,
        url: "/media/banner/admin/2026/08/x.png".into(),
        file_name: "x.png".into(),
        original_name: "x.png".into(),
        file_type: "image/png".into(),
        file_size: 3,
        checksum: "0".repeat(64),
        uploaded_by: None,
        created_at: OffsetDateTime::now_utc(),
    });

    let mut payload = news_payload("Tin có ảnh");
    payload["feature_image_id"] = serde_json::json!(media_id);
    let (status, created) = send(
        &harness.router,
        request("POST", "/api/v1/news", Some(EDITOR_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &harness.router,
        request(
            "DELETE",
            &format!("/api/v1/media/{media_id}"),
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "in_use");
    assert_eq!(harness.repos.media.lock().await.len(), 1);

    // Removing the reference unblocks the delete.
    let news_id = created["id"].as_str().expect("id").to_string();
    let (status, _) = send(
        &harness.router,
        request(
            "DELETE",
            &format!("/api/v1/news/{news_id}"),
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &harness.router,
        request(
            "DELETE",
            &format!("/api/v1/media/{media_id}"),
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(harness.repos.media.lock().await.is_empty());
}

#[tokio::test]
async fn multipart_upload_stores_payload_and_registers_media() {
    let harness = harness().await;

    let boundary = "clinica-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"purpose\"\r\n\r\n\
         banner\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"hero.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         not-really-a-png\r\n\
         --{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/media")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");

    let (status, created) = send(&harness.router, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["original_name"], "hero.png");
    assert_eq!(created["file_type"], "image/png");
    let url = created["url"].as_str().expect("url");
    assert!(url.starts_with("/media/banner/"));
    assert!(url.ends_with("-hero.png"));

    let media = harness.repos.media.lock().await;
    assert_eq!(media.len(), 1);
    drop(media);

    let audit = harness.repos.audit.lock().await;
    assert!(audit.iter().any(|entry| entry.action == "media.upload"));
}

#[tokio::test]
async fn editors_cannot_delete_content() {
    let harness = harness().await;

    let (_, created) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Tin cần xoá")),
        ),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &harness.router,
        request(
            "DELETE",
            &format!("/api/v1/news/{id}"),
            Some(EDITOR_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(harness.repos.news.lock().await.len(), 1);
}

#[tokio::test]
async fn user_management_is_super_admin_only() {
    let harness = harness().await;

    let (status, _) = send(
        &harness.router,
        request("GET", "/api/v1/users", Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &harness.router,
        request("GET", "/api/v1/users", Some(SUPER_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn public_reads_are_published_only_and_localized() {
    let harness = harness().await;

    let mut payload = news_payload("Trị liệu cột sống");
    payload["title_en"] = serde_json::json!("Spinal therapy");
    payload["status"] = serde_json::json!("published");
    let (status, created) = send(
        &harness.router,
        request("POST", "/api/v1/news", Some(ADMIN_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let slug = created["slug"].as_str().expect("slug").to_string();

    // Draft articles never surface publicly.
    send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Bản nháp")),
        ),
    )
    .await;

    let (status, body) = send(
        &harness.router,
        request("GET", "/public/news?locale=en", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["title"], "Spinal therapy");
    // Untranslated body falls back to Vietnamese in the same response.
    assert_eq!(body["items"][0]["body"], "Nội dung bài viết");
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = send(
        &harness.router,
        request("GET", &format!("/public/news/{slug}?locale=vi"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Trị liệu cột sống");

    let (status, _) = send(
        &harness.router,
        request("GET", "/public/news/ban-nhap", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_meta_reports_pagination_window() {
    let harness = harness().await;

    for n in 0..5 {
        send(
            &harness.router,
            request(
                "POST",
                "/api/v1/news",
                Some(EDITOR_TOKEN),
                Some(news_payload(&format!("Tin số {n}"))),
            ),
        )
        .await;
    }

    let (status, body) = send(
        &harness.router,
        request("GET", "/api/v1/news?page=2&limit=2", Some(EDITOR_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["news"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["meta"]["total"], 5);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["limit"], 2);
    assert_eq!(body["meta"]["total_pages"], 3);
    assert_eq!(body["meta"]["pages"], serde_json::json!([1, 2, 3]));
}

#[tokio::test]
async fn contact_upsert_round_trips() {
    let harness = harness().await;

    let payload = serde_json::json!({
        "phone": "0901 234 567",
        "email": "hello@clinic.vn",
        "address": "12 Lý Thường Kiệt, Hà Nội",
        "address_en": "12 Ly Thuong Kiet, Hanoi",
        "status": "active",
    });
    let (status, created) = send(
        &harness.router,
        request("POST", "/api/v1/contact", Some(ADMIN_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &harness.router,
        request("GET", "/public/contact?locale=en", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "12 Ly Thuong Kiet, Hanoi");

    let update = serde_json::json!({
        "phone": "0901 234 567",
        "email": "hello@clinic.vn",
        "address": "34 Hai Bà Trưng, Hà Nội",
        "status": "active",
    });
    let (status, _) = send(
        &harness.router,
        request(
            "PUT",
            &format!("/api/v1/contact/{id}"),
            Some(ADMIN_TOKEN),
            Some(update),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &harness.router,
        request("GET", "/public/contact", None, None),
    )
    .await;
    assert_eq!(body["address"], "34 Hai Bà Trưng, Hà Nội");
}

#[tokio::test]
async fn banner_slots_are_unique() {
    let harness = harness().await;

    let payload = serde_json::json!({
        "slot": "homepage",
        "link": "https://clinic.example/booking",
        "status": "active",
    });
    let (status, _) = send(
        &harness.router,
        request("POST", "/api/v1/banners", Some(ADMIN_TOKEN), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &harness.router,
        request("POST", "/api/v1/banners", Some(ADMIN_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "duplicate");

    let (status, body) = send(
        &harness.router,
        request("GET", "/public/banners/homepage", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slot"], "homepage");
}

#[tokio::test]
async fn audit_trail_is_readable_by_admins_only() {
    let harness = harness().await;

    send(
        &harness.router,
        request(
            "POST",
            "/api/v1/news",
            Some(EDITOR_TOKEN),
            Some(news_payload("Tin kiểm toán")),
        ),
    )
    .await;

    let (status, _) = send(
        &harness.router,
        request("GET", "/api/v1/audit", Some(EDITOR_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &harness.router,
        request("GET", "/api/v1/audit?action=news.create", Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["entries"][0]["actor"], "editor@clinic.vn");
}

#[tokio::test]
async fn category_delete_is_blocked_while_referenced() {
    let harness = harness().await;

    let (status, category) = send(
        &harness.router,
        request(
            "POST",
            "/api/v1/categories",
            Some(ADMIN_TOKEN),
            Some(serde_json::json!({"name": "Phục hồi chức năng"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["slug"], "phuc-hoi-chuc-nang");
    let category_id = category["id"].as_str().expect("id").to_string();

    let mut payload = news_payload("Tin theo chuyên mục");
    payload["category_id"] = serde_json::json!(category_id);
    send(
        &harness.router,
        request("POST", "/api/v1/news", Some(EDITOR_TOKEN), Some(payload)),
    )
    .await;

    let (status, body) = send(
        &harness.router,
        request(
            "DELETE",
            &format!("/api/v1/categories/{category_id}"),
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "in_use");
}

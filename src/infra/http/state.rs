use std::sync::Arc;

use crate::application::admin::banners::AdminBannerService;
use crate::application::admin::categories::AdminCategoryService;
use crate::application::admin::contact::AdminContactService;
use crate::application::admin::media::AdminMediaService;
use crate::application::admin::news::AdminNewsService;
use crate::application::admin::posts::AdminPostService;
use crate::application::admin::services::AdminServiceService;
use crate::application::admin::team::AdminTeamService;
use crate::application::admin::users::AdminUserService;
use crate::application::audit::AuditService;
use crate::application::auth::AuthService;
use crate::infra::db::PostgresRepositories;
use crate::infra::media::MediaStorage;

#[derive(Clone)]
pub struct ApiState {
    pub auth: AuthService,
    pub audit: AuditService,
    pub posts: Arc<AdminPostService>,
    pub news: Arc<AdminNewsService>,
    pub services: Arc<AdminServiceService>,
    pub team: Arc<AdminTeamService>,
    pub banners: Arc<AdminBannerService>,
    pub contact: Arc<AdminContactService>,
    pub media: Arc<AdminMediaService>,
    pub categories: Arc<AdminCategoryService>,
    pub users: Arc<AdminUserService>,
    pub media_storage: Arc<MediaStorage>,
    /// Absent in router-level tests that run against in-memory fakes.
    pub db: Option<Arc<PostgresRepositories>>,
}

//! Admin API handlers.

mod audit;
mod banners;
mod categories;
mod contact;
mod media;
mod news;
mod posts;
mod services;
mod team;
mod users;

pub use audit::*;
pub use banners::*;
pub use categories::*;
pub use contact::*;
pub use media::*;
pub use news::*;
pub use posts::*;
pub use services::*;
pub use team::*;
pub use users::*;

use crate::application::auth::Principal;

use super::error::ApiError;

/// Hard deletes are reserved for roles with the publish privilege.
pub(crate) fn require_delete_privilege(principal: &Principal) -> Result<(), ApiError> {
    if !principal.role.can_publish() {
        return Err(ApiError::forbidden(format!(
            "role `{}` may not delete content",
            principal.role
        )));
    }
    Ok(())
}

/// User management is reserved for super admins.
pub(crate) fn require_user_management(principal: &Principal) -> Result<(), ApiError> {
    if !principal.role.can_manage_users() {
        return Err(ApiError::forbidden(format!(
            "role `{}` may not manage users",
            principal.role
        )));
    }
    Ok(())
}

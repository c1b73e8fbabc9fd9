//! Shared domain enumerations aligned with persisted database enums.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state shared by posts, news and services.
///
/// `Scheduled` is accepted for posts only; the workflow layer rejects it for
/// the other kinds before anything reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "content_status", rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    PendingReview,
    Scheduled,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl Display for ContentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility state for team members, banners and contact records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "record_status", rename_all = "snake_case")]
pub enum RecordStatus {
    Active,
    Inactive,
}

/// Fixed placement slots for banners; at most one banner exists per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "banner_slot", rename_all = "snake_case")]
pub enum BannerSlot {
    Homepage,
    Service,
    News,
    About,
}

impl BannerSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Service => "service",
            Self::News => "news",
            Self::About => "about",
        }
    }
}

impl Display for BannerSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerSlot {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homepage" => Ok(Self::Homepage),
            "service" => Ok(Self::Service),
            "news" => Ok(Self::News),
            "about" => Ok(Self::About),
            _ => Err(()),
        }
    }
}

/// Administrative role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Editor,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// Whether this role may move content into the published state.
    pub fn can_publish(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Whether this role may create, edit or delete user accounts.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminates the three slugged content families where behavior differs
/// (scheduling, homepage caps, audit entity labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    News,
    Service,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::News => "news",
            Self::Service => "service",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_privilege_follows_role() {
        assert!(!UserRole::Editor.can_publish());
        assert!(UserRole::Admin.can_publish());
        assert!(UserRole::SuperAdmin.can_publish());
    }

    #[test]
    fn only_super_admin_manages_users() {
        assert!(!UserRole::Editor.can_manage_users());
        assert!(!UserRole::Admin.can_manage_users());
        assert!(UserRole::SuperAdmin.can_manage_users());
    }

    #[test]
    fn banner_slot_round_trips_through_str() {
        for slot in [
            BannerSlot::Homepage,
            BannerSlot::Service,
            BannerSlot::News,
            BannerSlot::About,
        ] {
            assert_eq!(slot.as_str().parse::<BannerSlot>(), Ok(slot));
        }
    }
}

//! Session-stored identity for the logged-in staff member.

use serde::{Deserialize, Serialize};
use tillpoint_core::{Email, UserId, UserRole};

use super::user::User;

/// Session keys for values stored in the session.
pub mod session_keys {
    /// The authenticated staff member (`CurrentUser`).
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated staff member, as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// True if this user may perform admin-only operations.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

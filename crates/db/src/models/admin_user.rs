//! Admin user entity model and DTOs.

use bugtracker_core::roles;
use bugtracker_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `admin_users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`AdminUserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    /// Stored roles. See [`AdminUser::effective_roles`].
    pub roles: Vec<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdminUser {
    /// Stored roles plus the implicit base role.
    pub fn effective_roles(&self) -> Vec<String> {
        roles::effective_roles(&self.roles)
    }

    /// `"first last"` from the non-empty name parts, or the email when both
    /// are empty.
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// Safe admin representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserResponse {
    pub id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub roles: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&AdminUser> for AdminUserResponse {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            roles: user.effective_roles(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for provisioning a new admin user.
#[derive(Debug, Clone)]
pub struct CreateAdminUser {
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// DTO for the profile edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// DTO for the change-password form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangePassword {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> AdminUser {
        AdminUser {
            id: 1,
            email: "admin@bugtracker.com".into(),
            password_hash: "hash".into(),
            roles: vec!["admin".into()],
            first_name: first.map(Into::into),
            last_name: last.map(Into::into),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_name_joins_present_parts() {
        assert_eq!(user(Some("Ada"), Some("Lovelace")).full_name(), "Ada Lovelace");
        assert_eq!(user(None, Some("Lovelace")).full_name(), "Lovelace");
        assert_eq!(user(Some(""), None).full_name(), "admin@bugtracker.com");
    }

    #[test]
    fn response_carries_effective_roles_without_hash() {
        let response = AdminUserResponse::from(&user(None, None));
        assert_eq!(response.roles, vec!["admin", "user"]);
        assert_eq!(response.full_name, "admin@bugtracker.com");
    }
}

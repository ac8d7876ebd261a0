//! Well-known role name constants.
//!
//! Stored roles must match the values written by the seed data and the
//! `admin_users.roles` column default in `db/migrations`.

pub const ROLE_ADMIN: &str = "admin";

/// Base role every authenticated user holds, whether or not it is stored.
pub const ROLE_USER: &str = "user";

/// Expand a stored role set into the effective one.
///
/// The base [`ROLE_USER`] role is always present; duplicates are dropped
/// while the stored order is preserved.
pub fn effective_roles<S: AsRef<str>>(stored: &[S]) -> Vec<String> {
    let mut roles: Vec<String> = Vec::with_capacity(stored.len() + 1);
    for role in stored.iter().map(AsRef::as_ref).chain([ROLE_USER]) {
        if !role.is_empty() && !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
    }
    roles
}

//! Admin account use cases: login, profile edit and password change.

use std::sync::Arc;

use bugtracker_core::error::CoreError;
use bugtracker_core::types::DbId;
use bugtracker_core::validation::{
    check_email, check_password_change, check_profile, MSG_CURRENT_PASSWORD_INCORRECT,
};
use bugtracker_db::models::admin_user::{
    AdminUser, AdminUserResponse, ChangePassword, CreateAdminUser, UpdateProfile,
};
use bugtracker_db::Store;
use serde::Serialize;

use crate::auth::jwt::{generate_access_token, JwtConfig};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: AdminUserResponse,
}

pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown email and wrong password produce the same 401.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        jwt: &JwtConfig,
    ) -> AppResult<LoginResponse> {
        let user = self
            .store
            .find_admin_user_by_email(email)
            .await?
            .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        if !check_password(password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
        }

        let roles = user.effective_roles();
        let access_token = generate_access_token(user.id, &roles, jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

        tracing::info!(user_id = user.id, "Admin logged in");
        Ok(LoginResponse {
            access_token,
            expires_in: jwt.expires_in_secs(),
            user: AdminUserResponse::from(&user),
        })
    }

    pub async fn profile(&self, user_id: DbId) -> AppResult<AdminUser> {
        self.store
            .find_admin_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("AdminUser", user_id))
    }

    /// Replace first and last name. Blank values clear the field.
    pub async fn update_profile(
        &self,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> AppResult<AdminUser> {
        self.profile(user_id).await?;
        let checked = check_profile(input.first_name.as_deref(), input.last_name.as_deref())?;
        let user = self
            .store
            .update_admin_profile(user_id, &checked)
            .await?
            .ok_or_else(|| AppError::not_found("AdminUser", user_id))?;

        tracing::info!(user_id, "Profile updated");
        Ok(user)
    }

    /// Change the password after verifying the current one.
    ///
    /// Shape errors and a wrong current password are reported together.
    pub async fn change_password(&self, user_id: DbId, input: &ChangePassword) -> AppResult<()> {
        let user = self.profile(user_id).await?;

        let mut violations = check_password_change(
            &input.current_password,
            &input.new_password,
            &input.confirm_password,
        )
        .err()
        .unwrap_or_default();
        if !input.current_password.is_empty()
            && !check_password(&input.current_password, &user.password_hash)?
        {
            violations.push("current_password", MSG_CURRENT_PASSWORD_INCORRECT);
        }
        violations.into_result()?;

        let password_hash = hash_password(&input.new_password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        if !self
            .store
            .update_admin_password(user_id, &password_hash)
            .await?
        {
            return Err(AppError::not_found("AdminUser", user_id));
        }

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    /// Create an admin account from a plaintext password.
    pub async fn provision_admin(
        &self,
        email: &str,
        password: &str,
        roles: Vec<String>,
    ) -> AppResult<AdminUser> {
        check_email(email)?;
        if self.store.find_admin_user_by_email(email).await?.is_some() {
            return Err(CoreError::Conflict(format!("Admin user {email} already exists")).into());
        }
        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        let user = self
            .store
            .create_admin_user(&CreateAdminUser {
                email: email.to_string(),
                password_hash,
                roles,
                first_name: None,
                last_name: None,
            })
            .await?;

        tracing::info!(user_id = user.id, "Admin user provisioned");
        Ok(user)
    }
}

fn check_password(password: &str, hash: &str) -> AppResult<bool> {
    verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bugtracker_db::MemoryStore;

    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".into(),
            access_token_expiry_mins: 60,
        }
    }

    async fn setup() -> (AccountService, AdminUser) {
        let service = AccountService::new(Arc::new(MemoryStore::new()));
        let admin = service
            .provision_admin("admin@bugtracker.com", "admin123", vec!["admin".into()])
            .await
            .unwrap();
        (service, admin)
    }

    fn change(current: &str, new: &str, confirm: &str) -> ChangePassword {
        ChangePassword {
            current_password: current.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn login_issues_token_with_effective_roles() {
        let (service, admin) = setup().await;
        let response = service
            .login("admin@bugtracker.com", "admin123", &jwt())
            .await
            .unwrap();
        assert_eq!(response.user.id, admin.id);
        assert_eq!(response.user.roles, vec!["admin", "user"]);
        assert_eq!(response.expires_in, 3600);
        let claims = crate::auth::jwt::validate_token(&response.access_token, &jwt()).unwrap();
        assert_eq!(claims.sub, admin.id);
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let (service, _) = setup().await;
        assert_matches!(
            service.login("admin@bugtracker.com", "nope", &jwt()).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        assert_matches!(
            service.login("ghost@bugtracker.com", "admin123", &jwt()).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }

    #[tokio::test]
    async fn profile_edit_enforces_length_and_clears_blanks() {
        let (service, admin) = setup().await;
        let too_long = UpdateProfile {
            first_name: Some("x".repeat(101)),
            last_name: None,
        };
        assert_matches!(
            service.update_profile(admin.id, &too_long).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );

        let input = UpdateProfile {
            first_name: Some("Ada".into()),
            last_name: Some("".into()),
        };
        let updated = service.update_profile(admin.id, &input).await.unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert_eq!(updated.last_name, None);
        assert_eq!(updated.full_name(), "Ada");
    }

    #[tokio::test]
    async fn wrong_current_password_is_reported_with_shape_errors() {
        let (service, admin) = setup().await;
        let result = service
            .change_password(admin.id, &change("wrong", "abc", "abd"))
            .await;
        let Err(AppError::Core(CoreError::Validation(violations))) = result else {
            panic!("expected validation error");
        };
        assert_eq!(
            violations.messages_for("current_password").collect::<Vec<_>>(),
            [MSG_CURRENT_PASSWORD_INCORRECT]
        );
        assert_eq!(violations.messages_for("new_password").count(), 2);
    }

    #[tokio::test]
    async fn password_change_takes_effect() {
        let (service, admin) = setup().await;
        service
            .change_password(admin.id, &change("admin123", "s3cret!", "s3cret!"))
            .await
            .unwrap();
        assert!(service
            .login("admin@bugtracker.com", "s3cret!", &jwt())
            .await
            .is_ok());
        assert!(service
            .login("admin@bugtracker.com", "admin123", &jwt())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn provisioning_validates_email_and_uniqueness() {
        let (service, _) = setup().await;
        assert_matches!(
            service.provision_admin("not-an-email", "admin123", vec![]).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            service
                .provision_admin("admin@bugtracker.com", "admin123", vec![])
                .await,
            Err(AppError::Core(CoreError::Conflict(_)))
        );
    }
}

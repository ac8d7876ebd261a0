//! Bearer tokens for signed-in admins.
//!
//! Tokens are HS256 JWTs issued by `POST /auth/login`. They carry the admin
//! id and the effective roles at login time, so role changes take effect on
//! the next login. There is no refresh flow.

use bugtracker_core::policy::Actor;
use bugtracker_core::types::DbId;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim written into, and required on, every token.
pub const TOKEN_ISSUER: &str = "bugtracker";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id.
    pub sub: DbId,
    pub roles: Vec<String>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    fn issue(user_id: DbId, roles: &[String], ttl_mins: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: user_id,
            roles: roles.to_vec(),
            iss: TOKEN_ISSUER.to_string(),
            iat,
            exp: iat + ttl_mins * 60,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, &self.roles)
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default `60`).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or a non-positive expiry.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .expect("JWT_ACCESS_EXPIRY_MINS must be an integer"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };
        assert!(
            access_token_expiry_mins > 0,
            "JWT_ACCESS_EXPIRY_MINS must be positive"
        );

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to clients in `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        // `sub` is numeric; jsonwebtoken only checks string subjects.
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

pub fn generate_access_token(
    user_id: DbId,
    roles: &[String],
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::issue(user_id, roles, config.access_token_expiry_mins);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, issuer and expiry, then return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret-for-hs256-signing".to_string(),
            access_token_expiry_mins: 30,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn token_carries_admin_actor() {
        let roles = vec!["admin".to_string(), "user".to_string()];
        let token = generate_access_token(7, &roles, &config()).unwrap();

        let claims = validate_token(&token, &config()).unwrap();
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, config().expires_in_secs());
        let actor = claims.actor();
        assert_eq!(actor.user_id, 7);
        assert!(actor.is_admin());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = Claims::issue(1, &[], 30);
        // Outside the library's default leeway.
        claims.iat -= 3600;
        claims.exp = claims.iat + 60;
        let token = sign(&claims, &config().secret);

        assert!(validate_token(&token, &config()).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let mut claims = Claims::issue(1, &[], 30);
        claims.iss = "someone-else".to_string();
        let token = sign(&claims, &config().secret);

        assert!(validate_token(&token, &config()).is_err());
    }

    #[test]
    fn login_token_passes_its_own_validation() {
        let token = generate_access_token(42, &["user".to_string()], &config()).unwrap();
        assert_eq!(validate_token(&token, &config()).unwrap().sub, 42);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = sign(&Claims::issue(1, &[], 30), "not-the-configured-secret");
        assert!(validate_token(&token, &config()).is_err());
    }
}

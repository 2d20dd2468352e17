//! Authentication and authorization.
//!
//! Password digests use Argon2 in PHC string format; bearer tokens are
//! HS256 JWTs carrying the username as subject claim. Authorization is a
//! single static rule: the reserved username `Admin` is the only
//! administrator.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{config::AuthConfig, db, models::User, state::AppState, Error, Result};

/// The reserved administrator username.
pub const ADMIN_USERNAME: &str = "Admin";

/// The authorization rule: true iff the identity is the admin account.
pub fn is_admin(user: &User) -> bool {
    user.username == ADMIN_USERNAME
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthManager {
    secret: Vec<u8>,
    token_ttl_seconds: u64,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.token_secret.as_bytes().to_vec(),
            token_ttl_seconds: (config.token_expire_minutes.max(1) as u64) * 60,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

        let salt = SaltString::generate(&mut OsRng);
        argon2::Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| Error::Internal(format!("failed to hash password: {e}")))
    }

    pub fn verify_password(&self, password: &str, digest: &str) -> bool {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        argon2::Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Issue a signed, time-limited bearer token for `username`.
    pub fn issue_token(&self, username: &str) -> Result<String> {
        let now = now_epoch_seconds();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now.saturating_add(self.token_ttl_seconds as usize),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| Error::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify a bearer token, returning its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| Error::Unauthorized(format!("Invalid token: {e}")))
    }
}

fn now_epoch_seconds() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or(0)
}

fn bearer_token(parts: &Parts) -> Result<&str> {
    let authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("Not authenticated".to_string()))?;

    authorization
        .strip_prefix("Bearer ")
        .or_else(|| authorization.strip_prefix("bearer "))
        .ok_or_else(|| Error::Unauthorized("Not authenticated".to_string()))
}

/// The authenticated user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)?;
        let claims = state.auth.verify_token(token)?;

        let user = db::users::find_by_username(&state.pool, &claims.sub)
            .await?
            .ok_or_else(|| Error::Unauthorized("Could not validate credentials".to_string()))?;
        if !user.is_active {
            return Err(Error::Unauthorized("Inactive user".to_string()));
        }

        Ok(Self(user))
    }
}

/// Like [`CurrentUser`], but rejects non-admin identities with `Forbidden`
/// before the handler touches any resource.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !is_admin(&user) {
            return Err(Error::Forbidden(
                "Only admin can perform this operation".to_string(),
            ));
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn manager() -> AuthManager {
        AuthManager::new(&AuthConfig {
            token_secret: "test-secret".to_string(),
            token_expire_minutes: 30,
        })
    }

    fn user(username: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn only_the_reserved_username_is_admin() {
        assert!(is_admin(&user("Admin")));
        assert!(!is_admin(&user("admin")));
        assert!(!is_admin(&user("Administrator")));
        assert!(!is_admin(&user("reader")));
    }

    #[test]
    fn password_digest_verifies_and_rejects() {
        let auth = manager();
        let digest = auth.hash_password("hunter2").unwrap();
        assert_ne!(digest, "hunter2");
        assert!(auth.verify_password("hunter2", &digest));
        assert!(!auth.verify_password("hunter3", &digest));
    }

    #[test]
    fn garbage_digest_never_verifies() {
        let auth = manager();
        assert!(!auth.verify_password("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trips_subject_claim() {
        let auth = manager();
        let token = auth.issue_token("reader").unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "reader");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let auth = manager();
        let other = AuthManager::new(&AuthConfig {
            token_secret: "other-secret".to_string(),
            token_expire_minutes: 30,
        });
        let token = other.issue_token("reader").unwrap();
        assert!(matches!(
            auth.verify_token(&token),
            Err(Error::Unauthorized(_))
        ));
    }
}

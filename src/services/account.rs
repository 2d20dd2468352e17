//! Registration, credential verification and user administration.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    auth::AuthManager,
    db,
    models::{LoginForm, RegisterPayload, TokenResponse, UserResponse},
    Error, Result,
};

pub struct AccountService {
    pool: SqlitePool,
    auth: Arc<AuthManager>,
}

impl AccountService {
    pub fn new(pool: SqlitePool, auth: Arc<AuthManager>) -> Self {
        Self { pool, auth }
    }

    /// Create a new account. The password is stored only as its digest.
    pub async fn register(&self, payload: RegisterPayload) -> Result<UserResponse> {
        if db::users::find_by_username(&self.pool, &payload.username)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("Username already registered".to_string()));
        }

        let digest = self.auth.hash_password(&payload.password)?;

        let user = match db::users::insert(&self.pool, &payload.username, &payload.email, &digest)
            .await
        {
            Ok(user) => user,
            // The email column carries its own uniqueness constraint.
            Err(Error::Database(e))
                if e.as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation()) =>
            {
                return Err(Error::Conflict("Email already registered".to_string()));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(username = %user.username, "registered new user");
        Ok(user.into())
    }

    /// Verify credentials and issue a bearer token with the username as
    /// subject claim.
    pub async fn login(&self, form: LoginForm) -> Result<TokenResponse> {
        let user = db::users::find_by_username(&self.pool, &form.username).await?;

        let valid = user
            .as_ref()
            .is_some_and(|u| self.auth.verify_password(&form.password, &u.password_hash));
        if !valid {
            return Err(Error::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }

        let token = self.auth.issue_token(&form.username)?;
        Ok(TokenResponse::bearer(token))
    }

    /// All users except the admin account itself.
    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        let users = db::users::list_except_admin(&self.pool).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Delete a non-admin user. An unknown id and the admin's own id are
    /// indistinguishable to the caller.
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let removed = db::users::delete_except_admin(&self.pool, id).await?;
        if removed == 0 {
            return Err(Error::NotFound(
                "User not found or cannot delete admin".to_string(),
            ));
        }

        tracing::info!(user_id = id, "deleted user");
        Ok(())
    }
}

//! Shared test harness: a full router over a fresh in-memory SQLite pool.

use anyhow::{Context as _, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt as _;
use libris::{
    api::create_router,
    config::{AuthConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig},
    state::AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt as _;

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            // One connection keeps the in-memory database alive and shared
            // for the lifetime of the pool.
            url: "sqlite::memory:".to_string(),
            pool_max_size: 1,
            pool_timeout_seconds: 5,
        },
        auth: AuthConfig {
            token_secret: "test-secret".to_string(),
            token_expire_minutes: 30,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            json: false,
        },
    }
}

pub async fn spawn_app() -> Result<TestApp> {
    let state = AppState::new(test_config()).await?;
    let router = create_router(state.clone());
    Ok(TestApp { state, router })
}

impl TestApp {
    /// Issue a request against the router, returning status and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&value)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok((status, body))
    }

    /// `POST /auth/token` with a form body.
    pub async fn login(&self, username: &str, password: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={username}&password={password}"
            )))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(StatusCode, Value)> {
        self.request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": username, "email": email, "password": password })),
        )
        .await
    }

    /// Register (ignoring an already-taken username) and log in.
    pub async fn token_for(&self, username: &str, email: &str, password: &str) -> Result<String> {
        let (status, _) = self.register(username, email, password).await?;
        anyhow::ensure!(
            status == StatusCode::OK || status == StatusCode::BAD_REQUEST,
            "unexpected register status {status}"
        );

        let (status, body) = self.login(username, password).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed with {status}");
        body.get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .context("login response carries access_token")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.token_for("Admin", "admin@example.com", "admin-password")
            .await
    }

    pub async fn create_author(&self, token: &str, name: &str) -> Result<i64> {
        let (status, body) = self
            .request(
                Method::POST,
                "/authors",
                Some(token),
                Some(json!({ "name": name, "biography": null })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "create_author failed: {status}");
        body.get("id").and_then(Value::as_i64).context("author id")
    }

    pub async fn create_book(
        &self,
        token: &str,
        title: &str,
        isbn: &str,
        year: i64,
        author_ids: &[i64],
    ) -> Result<i64> {
        let (status, body) = self
            .request(
                Method::POST,
                "/books",
                Some(token),
                Some(json!({
                    "title": title,
                    "isbn": isbn,
                    "publication_year": year,
                    "description": null,
                    "author_ids": author_ids,
                })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "create_book failed: {status}");
        body.get("id").and_then(Value::as_i64).context("book id")
    }
}

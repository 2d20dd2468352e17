//! Shared application state.

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{str::FromStr, sync::Arc, time::Duration};

use crate::{
    auth::AuthManager,
    config::Config,
    services::{AccountService, CatalogService},
    Error, Result,
};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub auth: Arc<AuthManager>,
    pub accounts: Arc<AccountService>,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Connect the pool, run migrations and wire up the services.
    pub async fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let options = SqliteConnectOptions::from_str(&config.database.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.database.pool_timeout_seconds))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Internal(format!("failed to run migrations: {e}")))?;

        let auth = Arc::new(AuthManager::new(&config.auth));
        let accounts = Arc::new(AccountService::new(pool.clone(), auth.clone()));
        let catalog = Arc::new(CatalogService::new(pool.clone()));

        Ok(Self {
            config,
            pool,
            auth,
            accounts,
            catalog,
        })
    }
}

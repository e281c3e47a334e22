// Application state shared by every handler

use std::sync::Arc;
use crate::config::environment::EnvironmentVariables;
use crate::database::DatabaseService;
use crate::services::{TokenService, UploadStore};

#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub database: DatabaseService,
    pub tokens: TokenService,
    pub uploads: UploadStore,
}

impl AppState {
    /// Creates the services. The database client connects lazily, so this
    /// succeeds without a reachable server.
    pub async fn new(environment: EnvironmentVariables) -> anyhow::Result<Self> {
        let environment_arc: Arc<EnvironmentVariables> = Arc::new(environment);

        let database: DatabaseService = DatabaseService::new(environment_arc.clone()).await?;
        let tokens: TokenService = TokenService::new(
            &environment_arc.access_token_secret,
            environment_arc.token_ttl_seconds,
        );
        let uploads: UploadStore = UploadStore::new(environment_arc.uploads_dir.clone());

        Ok(Self {
            environment: environment_arc,
            database,
            tokens,
            uploads,
        })
    }

    /// Builds the state from the process environment
    pub async fn from_env() -> anyhow::Result<Self> {
        let environment: EnvironmentVariables = EnvironmentVariables::instance()?.clone();
        Self::new(environment).await
    }

    /// Verifies the database and prepares the uploads directory
    pub async fn initialize(&self) -> anyhow::Result<()> {
        self.uploads.ensure_dir().await?;
        self.database.initialize().await;

        tracing::info!("Services (MongoDB + uploads) initialized");
        Ok(())
    }

    /// Gracefully shutdown the database client
    pub async fn shutdown(&self) {
        self.database.shutdown().await;
    }
}

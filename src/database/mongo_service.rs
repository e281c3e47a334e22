use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection, Database,
};
use tracing::{info, warn};

use crate::config::environment::EnvironmentVariables;

pub const USERS: &str = "users";
pub const TEAM: &str = "team";
pub const RESEARCH_PAPERS: &str = "researchPapers";
pub const RESEARCH_PAPER_REQUESTS: &str = "researchPapersRequest";
pub const NEWS: &str = "news";
pub const CONTACTS: &str = "contacts";
pub const LAB_INFO: &str = "labInfo";
pub const OPEN_POSITIONS: &str = "openPositions";
pub const RESEARCH_AREAS: &str = "researchAreas";
pub const APPLICATIONS: &str = "applications";

/// Process-wide MongoDB handle.
/// The driver pools connections internally, so clones share one pool.
#[derive(Clone, Debug)]
pub struct DatabaseService {
    client: Client,
    database: Database,
    /// Environment configuration
    config: Arc<EnvironmentVariables>,
}

impl DatabaseService {
    /// Creates the client without touching the network; the first
    /// operation (or `initialize`) establishes connections.
    pub async fn new(config: Arc<EnvironmentVariables>) -> Result<Self> {
        let mut options: ClientOptions = ClientOptions::parse(config.database_uri())
            .await
            .context("Failed to parse MongoDB connection string")?;
        options.app_name = Some(config.db_app_name.to_string());
        // An unreachable deployment must fail before the request timeout fires
        options.server_selection_timeout =
            Some(Duration::from_secs(config.db_selection_timeout_seconds));

        let client: Client = Client::with_options(options)
            .context("Failed to create MongoDB client")?;
        let database: Database = client.database(&config.db_name);

        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Pings the server once at startup. A failure is logged and the
    /// service keeps running; requests will surface database errors.
    pub async fn initialize(&self) {
        info!("Initializing DatabaseService for '{}'...", self.config.db_name);

        match self.ping().await {
            Ok(()) => info!("Connected to MongoDB"),
            Err(e) => warn!("MongoDB is not reachable yet: {:#}", e),
        }
    }

    /// Round-trips a `ping` command to the deployment
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .context("Failed to ping MongoDB")?;
        Ok(())
    }

    /// Gracefully shuts down the client, waiting for in-flight operations
    pub async fn shutdown(&self) {
        info!("Initiating DatabaseService shutdown...");
        self.client.clone().shutdown().await;
        info!("DatabaseService shutdown completed");
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn name(&self) -> &str {
        self.database.name()
    }

    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    pub fn users(&self) -> Collection<Document> {
        self.collection(USERS)
    }

    pub fn team(&self) -> Collection<Document> {
        self.collection(TEAM)
    }

    pub fn research_papers(&self) -> Collection<Document> {
        self.collection(RESEARCH_PAPERS)
    }

    pub fn research_paper_requests(&self) -> Collection<Document> {
        self.collection(RESEARCH_PAPER_REQUESTS)
    }

    pub fn news(&self) -> Collection<Document> {
        self.collection(NEWS)
    }

    pub fn contacts(&self) -> Collection<Document> {
        self.collection(CONTACTS)
    }

    pub fn lab_info(&self) -> Collection<Document> {
        self.collection(LAB_INFO)
    }

    pub fn open_positions(&self) -> Collection<Document> {
        self.collection(OPEN_POSITIONS)
    }

    pub fn research_areas(&self) -> Collection<Document> {
        self.collection(RESEARCH_AREAS)
    }

    pub fn applications(&self) -> Collection<Document> {
        self.collection(APPLICATIONS)
    }

    /// Looks up a user by email; used by the admin/role gates and the
    /// author checks.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<Document>, mongodb::error::Error> {
        self.users().find_one(doc! { "email": email }).await
    }
}

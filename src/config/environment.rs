// Start of file: /src/config/environment.rs

// * Environment configuration loaded once, with defaults for everything
// * except the token secret outside development.

use std::{borrow::Cow, collections::HashMap, fmt, path::PathBuf};
// * anyhow for convenient error handling
use anyhow::{anyhow, bail, Context, Result};
// * once_cell for lazy static initialization
use once_cell::sync::Lazy;
use tracing::warn;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_BODY_SIZE: usize = 10_485_760; // 10MB, resumes travel in the body
const DEFAULT_TIMEOUT: u64 = 10; // 10 seconds
const DEFAULT_DB_SCHEME: &str = "mongodb";
const DEFAULT_DB_HOST: &str = "localhost:27017";
const DEFAULT_DB_NAME: &str = "peerResearchLab";
const DEFAULT_DB_APP_NAME: &str = "Cluster0";
const DEFAULT_DB_SELECTION_TIMEOUT: u64 = 5; // 5 seconds, under DEFAULT_TIMEOUT
const DEFAULT_TOKEN_TTL: u64 = 86_400; // 1 day
const DEFAULT_UPLOADS_DIR: &str = "uploads";
const DEVELOPMENT_TOKEN_SECRET: &str = "development-only-secret";

// * A struct containing all environment variables used by the app
#[derive(Clone)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    pub db_uri: Option<String>,
    pub db_scheme: Cow<'static, str>,
    pub db_host: Cow<'static, str>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Cow<'static, str>,
    pub db_app_name: Cow<'static, str>,
    pub db_selection_timeout_seconds: u64,
    pub access_token_secret: String,
    pub token_ttl_seconds: u64,
    pub uploads_dir: PathBuf,
}

impl EnvironmentVariables {
    // * Loads environment variables from the process and, outside
    // * production, from a .env file.
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    // * Builds the configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        // * Empty values count as missing
        let get_var = |key: &str| {
            vars.get(key)
                .map(|s: &String| s.trim())
                .filter(|s: &&str| !s.is_empty())
        };

        let environment: Cow<'static, str> = get_var("ENVIRONMENT")
            .map(|s| Cow::Owned(s.into()))
            .unwrap_or_else(|| {
                warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                Cow::Borrowed(DEFAULT_ENVIRONMENT)
            });

        let access_token_secret: String = match get_var("ACCESS_TOKEN_SECRET") {
            Some(secret) => secret.to_string(),
            None if environment == DEFAULT_ENVIRONMENT => {
                warn!("Missing ACCESS_TOKEN_SECRET, using the development secret");
                DEVELOPMENT_TOKEN_SECRET.to_string()
            }
            None => bail!("ACCESS_TOKEN_SECRET must be set when ENVIRONMENT is '{environment}'"),
        };

        Ok(Self {
            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            db_uri: get_var("DB_URI").map(String::from),

            db_scheme: get_var("DB_SCHEME")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_DB_SCHEME)),

            db_host: get_var("DB_HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_HOST, defaulting to '{DEFAULT_DB_HOST}'");
                    Cow::Borrowed(DEFAULT_DB_HOST)
                }),

            db_user: get_var("DB_USER").map(String::from),

            db_password: get_var("DB_PASSWORD").map(String::from),

            db_name: get_var("DB_NAME")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_DB_NAME)),

            db_app_name: get_var("DB_APP_NAME")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_DB_APP_NAME)),

            db_selection_timeout_seconds: get_var("DB_SELECTION_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DB_SELECTION_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_DB_SELECTION_TIMEOUT),

            token_ttl_seconds: get_var("TOKEN_TTL_SECONDS")
                .map(|s| s.parse().context("Invalid TOKEN_TTL_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TOKEN_TTL),

            uploads_dir: get_var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR)),

            environment,
            access_token_secret,
        })
    }

    // * Connection string for the MongoDB driver. DB_URI wins when set.
    pub fn database_uri(&self) -> String {
        if let Some(uri) = &self.db_uri {
            return uri.clone();
        }

        let credentials: String = match (&self.db_user, &self.db_password) {
            (Some(user), Some(password)) => format!(
                "{}:{}@",
                urlencoding::encode(user),
                urlencoding::encode(password)
            ),
            (Some(user), None) => format!("{}@", urlencoding::encode(user)),
            _ => String::new(),
        };

        format!(
            "{}://{}{}/?retryWrites=true&w=majority&appName={}",
            self.db_scheme, credentials, self.db_host, self.db_app_name
        )
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    // * Returns a reference to the lazily-initialized environment configuration
    pub fn instance() -> Result<&'static Self> {
        static INSTANCE: Lazy<Result<EnvironmentVariables, anyhow::Error>> = Lazy::new(|| {
            let config: EnvironmentVariables = EnvironmentVariables::load()?;

            if cfg!(debug_assertions) {
                tracing::debug!("Loaded environment configuration: {:#?}", config);
            }

            Ok(config)
        });

        INSTANCE
            .as_ref()
            .map_err(|e: &anyhow::Error| anyhow!("Failed to load environment configuration: {e:#}"))
    }
}

// * Secrets never reach the logs
impl fmt::Debug for EnvironmentVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentVariables")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_request_body_size", &self.max_request_body_size)
            .field("default_timeout_seconds", &self.default_timeout_seconds)
            .field("db_uri", &self.db_uri.as_ref().map(|_| "<redacted>"))
            .field("db_scheme", &self.db_scheme)
            .field("db_host", &self.db_host)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "<redacted>"))
            .field("db_name", &self.db_name)
            .field("db_app_name", &self.db_app_name)
            .field("db_selection_timeout_seconds", &self.db_selection_timeout_seconds)
            .field("access_token_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("uploads_dir", &self.uploads_dir)
            .finish()
    }
}


// End of file: /src/config/environment.rs

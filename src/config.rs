use anyhow::Result;
use config::{Config, Environment, File};
use sea_orm::Database;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://rentwise.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_JWT_SECRET: &str = "rentwise-development-secret";

/// Runtime settings of the server and the CLI.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// HMAC secret used to sign access tokens
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub bcrypt_cost: u32,
    /// Expose Prometheus metrics on `/metrics`
    pub metrics_enabled: bool,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiry_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            metrics_enabled: false,
            request_timeout_secs: 30,
        }
    }
}

// Keeps the signing secret out of logs and `#[instrument]` spans.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Loads settings from the defaults, an optional `rentwise.toml` and
    /// `RENTWISE_*` environment variables, in increasing priority.
    /// `DATABASE_URL` and `BIND_ADDRESS` override everything else.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiry_hours", defaults.jwt_expiry_hours)?
            .set_default("bcrypt_cost", defaults.bcrypt_cost as i64)?
            .set_default("metrics_enabled", defaults.metrics_enabled)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .add_source(File::with_name("rentwise").required(false))
            .add_source(Environment::with_prefix("RENTWISE").try_parsing(true));

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database_url", database_url)?;
        }
        if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
            builder = builder.set_override("bind_address", bind_address)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        if settings.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("Using the built-in JWT secret; set RENTWISE_JWT_SECRET in production");
        }
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Returns a copy with the given command line overrides applied.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }
}

/// Connects to the configured database and builds the shared handler state.
pub async fn initialize_app_state(settings: Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;

    Ok(AppState {
        db,
        settings: Arc::new(settings),
    })
}

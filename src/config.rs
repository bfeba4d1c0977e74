//! Client configuration.

use std::env;

use log::debug;

use crate::error::{DispairError, DispairResult};
use crate::http::DEFAULT_API_BASE;

/// Settings shared by the webhook and gateway clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bot token from the Discord Developer Portal
    pub bot_token: String,

    pub application_id: String,

    /// Hex-encoded Ed25519 public key; only the webhook client needs it
    pub public_key: String,

    /// Path Discord posts interactions to
    pub interaction_endpoint: String,

    pub port: u16,

    pub api_base: String,

    /// Guilds that receive commands not marked global
    pub guild_ids: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            application_id: String::new(),
            public_key: String::new(),
            interaction_endpoint: "/interactions".to_string(),
            port: 80,
            api_base: DEFAULT_API_BASE.to_string(),
            guild_ids: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(
        bot_token: impl Into<String>,
        application_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            bot_token: bot_token.into(),
            application_id: application_id.into(),
            public_key: public_key.into(),
            ..Self::default()
        }
    }

    /// Read the configuration from the environment.
    ///
    /// A `.env` file is loaded first unless `ENVIRONMENT` is set.
    pub fn from_env() -> DispairResult<Self> {
        if env::var("ENVIRONMENT").is_err() {
            match dotenvy::dotenv() {
                Ok(path) => debug!("loaded environment from {}", path.display()),
                Err(e) => debug!("no .env file loaded: {e}"),
            }
        }

        let required = |name: &str| {
            env::var(name)
                .map_err(|_| DispairError::Config(format!("'{name}' environment variable not set")))
        };

        let mut config = Self::new(
            required("BOT_TOKEN")?,
            required("APP_ID")?,
            env::var("APP_PUBLIC_KEY").unwrap_or_default(),
        );

        if let Ok(endpoint) = env::var("INTERACTION_ENDPOINT") {
            config.interaction_endpoint = endpoint;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| DispairError::Config(format!("PORT '{port}': {e}")))?;
        }
        if let Ok(guilds) = env::var("GUILD_IDS") {
            config.guild_ids = parse_guild_ids(&guilds);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn interaction_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.interaction_endpoint = endpoint.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_ids.push(guild_id.into());
        self
    }

    pub fn validate(&self) -> DispairResult<()> {
        if !self.interaction_endpoint.starts_with('/') {
            return Err(DispairError::Config(format!(
                "interaction endpoint '{}' must begin with /",
                self.interaction_endpoint
            )));
        }
        Ok(())
    }
}

/// Split a comma or whitespace separated list of guild ids.
pub fn parse_guild_ids(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Process configuration.
///
/// Keys are flat so the environment variable names read naturally
/// (`GITHUB_CLIENT_ID`, `SESSION_SECRET`, `PORT`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_address: String,
    pub port: u16,
    pub public_dir: String,

    pub github_client_id: String,
    pub github_client_secret: String,
    pub oauth_callback_url: String,

    pub session_secret: String,

    #[serde(default)]
    pub database_url: Option<String>,
    pub database_user: String,
    pub database_password: String,
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_max_connections: u32,
    /// Seconds to wait for the first connection before giving up.
    pub database_connect_timeout_secs: u64,
}

impl Settings {
    /// Defaults, then `config.toml` if present, then the environment.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::builder()?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("public_dir", "public")?
            .set_default(
                "oauth_callback_url",
                "http://localhost:3000/auth/github/callback",
            )?
            .set_default("database_user", "watchlist")?
            .set_default("database_password", "password")?
            .set_default("database_host", "localhost")?
            .set_default("database_port", 5432)?
            .set_default("database_name", "watchlist")?
            .set_default("database_max_connections", 5)?
            .set_default("database_connect_timeout_secs", 30)
    }

    /// Connection string for the records database.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.database_user,
                self.database_password,
                self.database_host,
                self.database_port,
                self.database_name
            ),
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
impl Settings {
    /// Complete settings pointing at a local database, for unit tests.
    pub(crate) fn for_tests() -> Self {
        Self {
            bind_address: "127.0.0.1".into(),
            port: 3000,
            public_dir: "public".into(),
            github_client_id: "client-123".into(),
            github_client_secret: "shh".into(),
            oauth_callback_url: "http://localhost:3000/auth/github/callback".into(),
            session_secret: "secret".into(),
            database_url: None,
            database_user: "u".into(),
            database_password: "p".into(),
            database_host: "localhost".into(),
            database_port: 5432,
            database_name: "db".into(),
            database_max_connections: 1,
            database_connect_timeout_secs: 1,
        }
    }
}

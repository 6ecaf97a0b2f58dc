use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub connection_string: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Server-side cap on a single statement, so a slow query cannot pin a
    /// pool slot indefinitely
    pub statement_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "contacts".to_string(),
            max_connections: 20,
            acquire_timeout_secs: 5,
            statement_timeout_ms: 5000,
        }
    }
}

/// Plain deployment variables accepted alongside the `CONTACTS__` ones
const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    ("APP_PORT", "server.port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
];

impl AppConfig {
    /// Load configuration from defaults, an optional config file and
    /// environment variables, later sources winning
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Add environment variables like CONTACTS__SERVER__PORT
        config = config.add_source(
            config::Environment::with_prefix("CONTACTS")
                .prefix_separator("__")
                .separator("__"),
        );

        for (var, key) in LEGACY_OVERRIDES {
            let value = std::env::var(var).ok().filter(|value| !value.is_empty());
            config = config.set_override_option(*key, value)?;
        }

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the database URL from config or environment
    pub fn database_url(&self) -> String {
        if let Some(connection_string) = &self.database.connection_string {
            return connection_string.clone();
        }

        // Fall back to environment variable
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return url;
        }

        self.database.url_from_parts()
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    pub fn url_from_parts(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

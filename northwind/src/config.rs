use config::{Config, Environment, File};
use serde::Deserialize;
use std::{collections::HashMap, env, path::Path};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LoggingFormat,
    pub filter: String,
    pub file: Option<LoggingFileConfig>,
    pub buffer_limit: usize,
    pub lossy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LoggingFormat::Compact,
            filter: "info".into(),
            file: None,
            buffer_limit: 256_000,
            lossy: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingFileConfig {
    pub format: LoggingFormat,
    pub directory: String,
    pub filename: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFormat {
    Json,
    Pretty,
    Full,
    Compact,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default)]
    pub init_schema: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Postgres,
    Sqlite,
}

impl DatabaseConfig {
    /// Picks the driver from the url scheme.
    pub fn kind(&self) -> crate::Result<DatabaseKind> {
        let url = self.url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DatabaseKind::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(DatabaseKind::Sqlite)
        } else {
            Err(crate::Error::Config(anyhow::anyhow!(
                "unsupported database url scheme: {url}"
            )))
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let run_mode = env::var("APP_ENV").unwrap_or_else(|_| "".into());
        Self::load_with_options(path, Some(run_mode), None)
    }

    pub fn load_with_options<P: AsRef<Path>>(
        path: P,
        run_mode: Option<String>,
        overrides: Option<HashMap<String, String>>,
    ) -> crate::Result<Self> {
        let dir = path.as_ref().to_string_lossy();
        let mut builder = Config::builder()
            .add_source(File::with_name(&format!("{dir}/default")));

        if let Some(run_mode) = run_mode.filter(|m| !m.is_empty()) {
            builder = builder.add_source(
                File::with_name(&format!("{dir}/{run_mode}")).required(false),
            );
        }

        // local.toml is never committed
        builder = builder
            .add_source(File::with_name(&format!("{dir}/local")).required(false))
            .add_source(
                Environment::with_prefix("NORTHWIND")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(overrides) = overrides {
            for (key, value) in overrides {
                builder = builder
                    .set_override(key, value)
                    .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))?;
            }
        }

        builder
            .build()
            .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))?
            .try_deserialize()
            .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))
    }
}

use std::env;
use std::path::Path;

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::errors::{AppError, Result};

/// Flat environment variables recognised on top of the nested `SECTION__KEY`
/// form, mapped onto their config keys.
const FLAT_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("API_HOST", "api.host"),
    ("API_PORT", "api.port"),
    ("POSTGRES_HOST", "database.host"),
    ("POSTGRES_PORT", "database.port"),
    ("POSTGRES_USER", "database.user"),
    ("POSTGRES_PASSWORD", "database.password"),
    ("POSTGRES_DB", "database.name"),
    ("SSL_MODE", "database.ssl_mode"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::build(path, |name| env::var(name).ok())
    }

    /// Layers config files, nested environment variables and the flat
    /// variables resolved through `lookup`, in increasing precedence.
    pub fn build<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut builder: ConfigBuilder<DefaultState> = Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"));

        for (var, key) in FLAT_ENV_OVERRIDES {
            let value = lookup(var).filter(|value| !value.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.shutdown_grace_secs == 0 {
            return Err(AppError::Invalid(
                "api.shutdown_grace_secs must be greater than zero".into(),
            ));
        }
        if self.database.url.is_none() && self.database.name.trim().is_empty() {
            return Err(AppError::Invalid("database.name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual fields.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "DatabaseConfig::default_host")]
    pub host: String,
    #[serde(default = "DatabaseConfig::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseConfig::default_user")]
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "DatabaseConfig::default_name")]
    pub name: String,
    #[serde(default = "DatabaseConfig::default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    fn default_host() -> String {
        "localhost".to_string()
    }

    const fn default_port() -> u16 {
        5432
    }

    fn default_user() -> String {
        "postgres".to_string()
    }

    fn default_name() -> String {
        "postgres".to_string()
    }

    fn default_ssl_mode() -> String {
        "prefer".to_string()
    }

    const fn default_max_connections() -> u32 {
        10
    }

    const fn default_connect_timeout_secs() -> u64 {
        10
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: Self::default_host(),
            port: Self::default_port(),
            user: Self::default_user(),
            password: None,
            name: Self::default_name(),
            ssl_mode: Self::default_ssl_mode(),
            max_connections: Self::default_max_connections(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_host")]
    pub host: String,
    #[serde(default = "ApiConfig::default_port")]
    pub port: u16,
    #[serde(default = "ApiConfig::default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl ApiConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    const fn default_port() -> u16 {
        8080
    }

    const fn default_shutdown_grace_secs() -> u64 {
        10
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_secs: Self::default_shutdown_grace_secs(),
        }
    }
}

/// Where the read endpoints get their data from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Fixed placeholder responses.
    #[default]
    Static,
    /// Queries against the `countries` and `tariffs` tables.
    Database,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn build_with(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::build("/nonexistent-config-dir", move |name| {
            vars.get(name).cloned()
        })
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let config = build_with(&[]).unwrap();
        assert_eq!(config.api.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.api.shutdown_grace_secs, 10);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.ssl_mode, "prefer");
        assert_eq!(config.catalog.source, CatalogSource::Static);
    }

    #[test]
    fn flat_variables_override_defaults() {
        let config = build_with(&[
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("POSTGRES_HOST", "db.internal"),
            ("POSTGRES_PORT", "6543"),
            ("POSTGRES_USER", "tariffs"),
            ("POSTGRES_PASSWORD", "secret"),
            ("POSTGRES_DB", "tariff_tracker"),
            ("SSL_MODE", "disable"),
        ])
        .unwrap();

        assert_eq!(config.api.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "tariffs");
        assert_eq!(config.database.password.as_deref(), Some("secret"));
        assert_eq!(config.database.name, "tariff_tracker");
        assert_eq!(config.database.ssl_mode, "disable");
    }

    #[test]
    fn empty_flat_variables_are_ignored() {
        let config = build_with(&[("API_PORT", ""), ("API_HOST", "  ")]).unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = build_with(&[("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn empty_database_name_fails_validation() {
        let mut config = build_with(&[]).unwrap();
        config.database.name = String::new();
        assert!(matches!(config.validate(), Err(AppError::Invalid(_))));

        config.database.url = Some("postgres://localhost/tariffs".into());
        assert!(config.validate().is_ok());
    }
}

//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Financial reporting rules.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Deployment-specific rules used when deriving financial statements.
///
/// Account codes are matched by prefix. An account belongs to a group when
/// its code starts with any of the group's prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportingConfig {
    /// Balances whose absolute value is below this are treated as zero.
    #[serde(default = "default_materiality_tolerance")]
    pub materiality_tolerance: Decimal,
    /// Code prefixes of asset accounts reported as current assets.
    #[serde(default = "default_current_asset_prefixes")]
    pub current_asset_prefixes: Vec<String>,
    /// Code prefixes of liability accounts reported as current liabilities.
    #[serde(default = "default_current_liability_prefixes")]
    pub current_liability_prefixes: Vec<String>,
    /// Code prefixes of fixed-asset accounts (cash flow investing section).
    #[serde(default = "default_fixed_asset_prefixes")]
    pub fixed_asset_prefixes: Vec<String>,
    /// Code prefixes of long-term liability accounts (cash flow financing section).
    #[serde(default = "default_long_term_liability_prefixes")]
    pub long_term_liability_prefixes: Vec<String>,
    /// Code prefixes of share capital accounts (cash flow financing section).
    #[serde(default = "default_share_capital_prefixes")]
    pub share_capital_prefixes: Vec<String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            materiality_tolerance: default_materiality_tolerance(),
            current_asset_prefixes: default_current_asset_prefixes(),
            current_liability_prefixes: default_current_liability_prefixes(),
            fixed_asset_prefixes: default_fixed_asset_prefixes(),
            long_term_liability_prefixes: default_long_term_liability_prefixes(),
            share_capital_prefixes: default_share_capital_prefixes(),
        }
    }
}

fn default_materiality_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_current_asset_prefixes() -> Vec<String> {
    vec!["11".to_string()]
}

fn default_current_liability_prefixes() -> Vec<String> {
    vec!["21".to_string()]
}

fn default_fixed_asset_prefixes() -> Vec<String> {
    vec!["12".to_string()]
}

fn default_long_term_liability_prefixes() -> Vec<String> {
    vec!["22".to_string()]
}

fn default_share_capital_prefixes() -> Vec<String> {
    vec!["31".to_string()]
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("NERACA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("reporting.current_asset_prefixes")
                    .with_list_parse_key("reporting.current_liability_prefixes")
                    .with_list_parse_key("reporting.fixed_asset_prefixes")
                    .with_list_parse_key("reporting.long_term_liability_prefixes")
                    .with_list_parse_key("reporting.share_capital_prefixes")
                    .try_parsing(false),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `.env` file in the working directory is read first when present.
//!
//! | Variable | Default |
//! |---|---|
//! | `VAPOR_HTTP_ADDR` | `0.0.0.0:3000` |
//! | `VAPOR_DATABASE_PATH` | `./vapor.db` |
//! | `VAPOR_DB_MAX_CONNECTIONS` | `5` |
//! | `VAPOR_TAX_RATE_BPS` | `500` |
//! | `VAPOR_ENFORCE_TOTALS` | `false` |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use vapor_core::types::TaxRate;
use vapor_db::DbConfig;

/// Highest accepted tax rate: 100%.
const MAX_TAX_RATE_BPS: u32 = 10_000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address for the HTTP server
    pub http_addr: SocketAddr,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Tax rate used when recomputing bill totals
    pub tax_rate: TaxRate,

    /// Reject bills whose `totalAmount` disagrees with the recomputed total
    pub enforce_totals: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // a missing .env is normal outside development
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ServerConfig {
            http_addr: var("VAPOR_HTTP_ADDR", "0.0.0.0:3000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("VAPOR_HTTP_ADDR".to_string()))?,

            database_path: PathBuf::from(var("VAPOR_DATABASE_PATH", "./vapor.db")),

            db_max_connections: var("VAPOR_DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("VAPOR_DB_MAX_CONNECTIONS".to_string()))?,

            tax_rate: TaxRate::from_bps(
                var("VAPOR_TAX_RATE_BPS", "500")
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("VAPOR_TAX_RATE_BPS".to_string()))?,
            ),

            enforce_totals: parse_bool("VAPOR_ENFORCE_TOTALS", &var("VAPOR_ENFORCE_TOTALS", "false"))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::OutOfRange {
                key: "VAPOR_DB_MAX_CONNECTIONS".to_string(),
                min: 1,
                max: u32::MAX as u64,
            });
        }

        if config.tax_rate.bps() > MAX_TAX_RATE_BPS {
            return Err(ConfigError::OutOfRange {
                key: "VAPOR_TAX_RATE_BPS".to_string(),
                min: 0,
                max: MAX_TAX_RATE_BPS as u64,
            });
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} must be between {min} and {max}")]
    OutOfRange { key: String, min: u64, max: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.http_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_path, PathBuf::from("./vapor.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.tax_rate, TaxRate::default());
        assert!(!config.enforce_totals);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("VAPOR_HTTP_ADDR", "127.0.0.1:8080"),
            ("VAPOR_DATABASE_PATH", "/var/lib/vapor/pos.db"),
            ("VAPOR_DB_MAX_CONNECTIONS", "12"),
            ("VAPOR_TAX_RATE_BPS", "1800"),
            ("VAPOR_ENFORCE_TOTALS", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/vapor/pos.db"));
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.tax_rate.bps(), 1800);
        assert!(config.enforce_totals);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("VAPOR_HTTP_ADDR", "not-an-addr")]),
            Err(ConfigError::InvalidValue(key)) if key == "VAPOR_HTTP_ADDR"
        ));
        assert!(matches!(
            load(&[("VAPOR_ENFORCE_TOTALS", "maybe")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("VAPOR_TAX_RATE_BPS", "-5")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            load(&[("VAPOR_TAX_RATE_BPS", "10001")]),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            load(&[("VAPOR_DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::OutOfRange { .. })
        ));
    }
}

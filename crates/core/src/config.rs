//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL of the API, used to build absolute asset URLs
    /// (e.g. `http://localhost:3000/api`).
    #[serde(default = "default_host_api")]
    pub host_api: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
    /// Maximum accepted size of an uploaded image in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_host_api() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024 // 5 MiB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            host_api: default_host_api(),
            metrics_enabled: default_metrics_enabled(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind (`host:port`).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Absolute URL under which an uploaded product image is served.
    pub fn product_image_url(&self, storage_name: &str) -> String {
        format!(
            "{}/files/product/{}",
            self.host_api.trim_end_matches('/'),
            storage_name
        )
    }
}

/// Asset storage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for uploaded assets.
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./static/uploads"),
        }
    }
}

/// PostgreSQL SSL mode configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PgSslMode {
    /// Disable SSL/TLS entirely.
    Disable,
    /// Prefer SSL/TLS but allow unencrypted connections (default).
    #[default]
    Prefer,
    /// Require SSL/TLS for all connections.
    Require,
}

/// Catalog database configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogConfig {
    /// SQLite database (development and tests).
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL. Takes precedence over individual fields.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// WARNING: Prefer STOREFRONT_CATALOG__PASSWORD env var over storing in config.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// SSL mode for connections.
        ssl_mode: Option<PgSslMode>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
        /// Statement timeout in milliseconds.
        statement_timeout_ms: Option<u64>,
    },
}

fn default_max_connections() -> u32 {
    10
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/catalog.db"),
        }
    }
}

impl CatalogConfig {
    /// Validate catalog configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            CatalogConfig::Sqlite { .. } => Ok(()),
            CatalogConfig::Postgres {
                url,
                host,
                database,
                ..
            } => match (url.as_ref(), host.as_ref(), database.as_ref()) {
                (Some(_), _, _) => Ok(()),
                (None, Some(_), Some(_)) => Ok(()),
                (None, None, _) => Err(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ),
                (None, Some(_), None) => Err(
                    "postgres config requires 'database' when using individual fields"
                        .to_string(),
                ),
            },
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses filesystem storage and SQLite.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                host_api: "http://localhost:3000/api".to_string(),
                ..ServerConfig::default()
            },
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(config.metrics_enabled);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_product_image_url_trims_trailing_slash() {
        let config = ServerConfig {
            host_api: "https://shop.example.com/api/".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.product_image_url("file-1-2.png"),
            "https://shop.example.com/api/files/product/file-1-2.png"
        );
    }

    #[test]
    fn test_catalog_config_deserialize_sqlite() {
        let json = r#"{"type":"sqlite","path":"/tmp/catalog.db"}"#;
        let config: CatalogConfig = serde_json::from_str(json).unwrap();
        match config {
            CatalogConfig::Sqlite { path } => assert_eq!(path, PathBuf::from("/tmp/catalog.db")),
            _ => panic!("expected sqlite config"),
        }
    }

    #[test]
    fn test_catalog_config_postgres_defaults() {
        let json = r#"{"type":"postgres","host":"db","database":"shop"}"#;
        let config: CatalogConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        match config {
            CatalogConfig::Postgres {
                port,
                max_connections,
                ssl_mode,
                ..
            } => {
                assert_eq!(port, Some(5432));
                assert_eq!(max_connections, 10);
                assert!(ssl_mode.is_none());
            }
            _ => panic!("expected postgres config"),
        }
    }

    #[test]
    fn test_catalog_config_postgres_requires_database() {
        let config = CatalogConfig::Postgres {
            url: None,
            host: Some("db".to_string()),
            port: None,
            username: None,
            password: None,
            database: None,
            ssl_mode: None,
            max_connections: 5,
            statement_timeout_ms: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_empty_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(matches!(config.storage, StorageConfig::Filesystem { .. }));
        assert!(matches!(config.catalog, CatalogConfig::Sqlite { .. }));
    }
}

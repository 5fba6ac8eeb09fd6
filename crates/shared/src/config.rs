//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::FileTypeRule;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Deployment environment label (development, production, ...).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageSettings::default(),
            environment: default_environment(),
        }
    }
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
    /// Directory served for requests that match no API route.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_environment() -> String {
    "development".to_string()
}

/// Shared filesystem storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Mount point of the shared filesystem.
    #[serde(default = "default_mount_path")]
    pub mount_path: PathBuf,
    /// Blob area, relative to the mount point.
    #[serde(default = "default_blob_dir")]
    pub blob_dir: String,
    /// Metadata area, relative to the mount point.
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed file families.
    #[serde(default = "FileTypeRule::defaults")]
    pub allowed_types: Vec<FileTypeRule>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            mount_path: default_mount_path(),
            blob_dir: default_blob_dir(),
            metadata_dir: default_metadata_dir(),
            max_file_size: default_max_file_size(),
            allowed_types: FileTypeRule::defaults(),
        }
    }
}

fn default_mount_path() -> PathBuf {
    PathBuf::from("/mnt/efs")
}

fn default_blob_dir() -> String {
    "uploads".to_string()
}

fn default_metadata_dir() -> String {
    "documents".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// `DOCSTORE__*` variables, then the deployment variables `PORT`,
    /// `EFS_MOUNT_PATH`, `APP_ENV` and `NODE_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let environment = std::env::var("APP_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCSTORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("storage.mount_path", std::env::var("EFS_MOUNT_PATH").ok())?
            .set_override_option("environment", environment)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: [(&str, Option<&str>); 5] = [
        ("RUN_MODE", None),
        ("PORT", None),
        ("EFS_MOUNT_PATH", None),
        ("APP_ENV", None),
        ("NODE_ENV", None),
    ];

    #[test]
    fn test_defaults() {
        temp_env::with_vars(CLEAR, || {
            let config = AppConfig::load().expect("defaults should load");
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.environment, "development");
            assert_eq!(config.storage.mount_path, PathBuf::from("/mnt/efs"));
            assert_eq!(config.storage.max_file_size, 10 * 1024 * 1024);
            assert_eq!(config.storage.allowed_types, FileTypeRule::defaults());
        });
    }

    #[test]
    fn test_prefixed_env_overrides() {
        let mut vars = CLEAR.to_vec();
        vars.push(("DOCSTORE__SERVER__PORT", Some("9090")));
        vars.push(("DOCSTORE__STORAGE__MAX_FILE_SIZE", Some("2048")));
        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.storage.max_file_size, 2048);
        });
    }

    #[test]
    fn test_deployment_env_overrides() {
        let vars = [
            ("RUN_MODE", None),
            ("APP_ENV", None),
            ("PORT", Some("8081")),
            ("EFS_MOUNT_PATH", Some("/srv/shared")),
            ("NODE_ENV", Some("production")),
        ];
        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.server.port, 8081);
            assert_eq!(config.storage.mount_path, PathBuf::from("/srv/shared"));
            assert_eq!(config.environment, "production");
        });
    }
}

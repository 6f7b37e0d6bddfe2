use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::local_records::LocalDnsRecord;
use super::logging::LoggingConfig;
use super::server::ServerConfig;

const LOCAL_CONFIG_PATH: &str = "dns-bridge.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dns-bridge/config.toml";

/// Main configuration structure for dns-bridge
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// gRPC listener configuration (address, TLS, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Domain appended to local records that do not name their own
    #[serde(default)]
    pub local_domain: Option<String>,

    /// Records served by the built-in engine
    #[serde(default)]
    pub local_records: Vec<LocalDnsRecord>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-bridge.toml in current directory
    /// 3. /etc/dns-bridge/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen_address {
            self.server.listen_address = Some(listen);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.shutdown_grace_secs == 0 {
            return Err(ConfigError::Validation(
                "shutdown_grace_secs must be greater than 0".to_string(),
            ));
        }

        if self.server.handshake_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "handshake_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(tls) = &self.server.tls {
            for (name, path) in [
                ("cert_file", &tls.cert_file),
                ("key_file", &tls.key_file),
                ("ca_file", &tls.ca_file),
            ] {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "TLS {} cannot be empty",
                        name
                    )));
                }
            }
        }

        for record in &self.local_records {
            record.address()?;
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen_address: Option<String>,
    pub log_level: Option<String>,
}

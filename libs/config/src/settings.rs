//! Service configuration: readers, tag passwords and global switches.
//!
//! Files are YAML with the historical camelCase keys:
//!
//! ```yaml
//! readers:
//!   - name: branch-entrance
//!     address: 192.168.40.10
//!     port: 5084
//!     mode: inventory
//!     antennas: [1, 2]
//! tagPasswords:
//!   DE290.access: "A1B2C3D4"
//!   DE290.kill: "D4C3B2A1"
//! defaultTagFormat: DE290
//! logLevel: INFO
//! corsAnyHost: false
//! ```
//!
//! Everything except `readers` is optional. Password entries are kept as
//! plain strings here; [`Configuration::install_passwords`] hands them to
//! the tag crate, which parses the keys and reports unusable ones.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use bookwaves_tag::{PasswordStore, SnapshotWarning, TagFormat};

use crate::reader::ReaderConfig;
use crate::ConfigError;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_FILE_PATH";

/// Top-level service configuration, deserialized from YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    readers: Vec<ReaderConfig>,
    #[serde(default)]
    tag_passwords: HashMap<String, String>,
    #[serde(default)]
    default_tag_format: Option<String>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    cors_any_host: Option<bool>,
}

impl Configuration {
    /// Load and validate the configuration file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Configuration = serde_yaml::from_reader(file)?;
        config.validate()?;
        info!(
            path = %path.display(),
            readers = config.readers.len(),
            passwords = config.tag_passwords.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_PATH_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|path| !path.is_empty())
            .ok_or(ConfigError::MissingEnv)?;
        Self::from_path(path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.readers.is_empty() {
            return Err(ConfigError::NoReaders);
        }
        Ok(())
    }

    /// The configured readers.
    pub fn readers(&self) -> &[ReaderConfig] {
        &self.readers
    }

    /// Raw password entries as spelled in the file.
    pub fn tag_passwords(&self) -> &HashMap<String, String> {
        &self.tag_passwords
    }

    /// The format newly written tags use. An unknown name falls back to
    /// DE290 with a warning rather than failing the load.
    pub fn default_format(&self) -> TagFormat {
        match self.default_tag_format.as_deref() {
            None => TagFormat::De290,
            Some(name) => TagFormat::from_name(name).unwrap_or_else(|| {
                warn!(name, "Unknown defaultTagFormat, falling back to DE290");
                TagFormat::De290
            }),
        }
    }

    /// Log filter for the service, `INFO` when unset.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("INFO")
    }

    /// Whether the HTTP surface may answer any origin.
    pub fn cors_any_host(&self) -> bool {
        self.cors_any_host.unwrap_or(false)
    }

    /// Build the password snapshot from this configuration and install it
    /// into `store`. Returns the findings the store also logged.
    pub fn install_passwords(&self, store: &PasswordStore) -> Vec<SnapshotWarning> {
        store.install_from_map(&self.tag_passwords, self.default_format())
    }
}

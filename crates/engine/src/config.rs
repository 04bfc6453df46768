//! Engine configuration via `docmend.toml`
//!
//! Field-name conventions of the store and the statistics cache lifetime.
//! A missing key takes its default, so an empty file is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use docmend_core::{Error, Result, ID_FIELD};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "docmend.toml";

/// Engine configuration loaded from `docmend.toml`.
///
/// # Example
///
/// ```toml
/// id_field = "_id"
/// status_code_field = "code"
/// status_date_field = "date"
/// default_locale = "en"
/// stats_ttl_secs = 3600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Identifier field of documents and embedded elements.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Field of a status record holding the code.
    #[serde(default = "default_status_code_field")]
    pub status_code_field: String,
    /// Field of a status record holding the transition time.
    #[serde(default = "default_status_date_field")]
    pub status_date_field: String,
    /// Locale used to wrap injected `enum_opts` values.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Lifetime of cached statistics, in seconds.
    #[serde(default = "default_stats_ttl_secs")]
    pub stats_ttl_secs: u64,
}

fn default_id_field() -> String {
    ID_FIELD.to_string()
}

fn default_status_code_field() -> String {
    "code".to_string()
}

fn default_status_date_field() -> String {
    "date".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_stats_ttl_secs() -> u64 {
    3600
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            status_code_field: default_status_code_field(),
            status_date_field: default_status_date_field(),
            default_locale: default_locale(),
            stats_ttl_secs: default_stats_ttl_secs(),
        }
    }
}

impl EngineConfig {
    /// Statistics cache lifetime.
    pub fn stats_ttl(&self) -> Duration {
        Duration::from_secs(self.stats_ttl_secs)
    }

    /// Reject empty names and a status record whose two fields collide.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("id_field", &self.id_field),
            ("status_code_field", &self.status_code_field),
            ("status_date_field", &self.status_date_field),
            ("default_locale", &self.default_locale),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(Error::Config {
                    reason: format!("'{}' must not be empty", key),
                });
            }
        }
        if self.status_code_field == self.status_date_field {
            return Err(Error::Config {
                reason: format!(
                    "status_code_field and status_date_field are both '{}'",
                    self.status_code_field
                ),
            });
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docmend engine configuration
#
# Identifier field of documents and of embedded array elements.
# Path segments applied to arrays select elements by this field.
id_field = "_id"

# Field names of records written by setStatus.
status_code_field = "code"
status_date_field = "date"

# Locale used when injecting into enum_opts without an explicit locale.
default_locale = "en"

# Seconds before cached statistics are recomputed.
stats_ttl_secs = 3600
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| Error::Config {
            reason: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::Config {
                reason: format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("Failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Config {
            reason: format!("Failed to write config file '{}': {}", path.display(), e),
        })
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::version::{LibraryVersion, VersionPolicy};

/// Default base for generated device names.
pub const DEFAULT_BASE_NAME: &str = r"\Device\ClassExtension";

/// How singleton device names are generated and retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Names are `{base_name}{index}` for index 0, 1, 2, ...
    pub base_name: String,
    /// Longest generated name, in characters.
    pub max_name_len: usize,
    /// Collisions tolerated before giving up.
    pub max_name_attempts: u32,
}

impl NamingConfig {
    /// Reject settings that could never produce a usable name.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_name.is_empty() {
            return Err(ConfigError::Invalid("base_name must not be empty".into()));
        }
        if self.max_name_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_name_attempts must be at least 1".into(),
            ));
        }
        if self.max_name_len <= self.base_name.chars().count() {
            return Err(ConfigError::Invalid(format!(
                "max_name_len {} leaves no room for a suffix after `{}`",
                self.max_name_len, self.base_name
            )));
        }
        Ok(())
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            max_name_len: 100,
            max_name_attempts: 64,
        }
    }
}

/// Settings for a class extension, typically read from TOML.
///
/// ```toml
/// base_name = '\Device\MSGpioClassExt'
/// max_client_minor = 0
///
/// [version]
/// major = 1
/// minor = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassExtensionConfig {
    #[serde(flatten)]
    pub naming: NamingConfig,
    pub version: LibraryVersion,
    pub max_client_minor: u16,
}

impl Default for ClassExtensionConfig {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            version: LibraryVersion::default(),
            max_client_minor: 0,
        }
    }
}

impl ClassExtensionConfig {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.naming.validate()
    }

    pub fn policy(&self) -> VersionPolicy {
        VersionPolicy::new(self.version, self.max_client_minor)
    }
}

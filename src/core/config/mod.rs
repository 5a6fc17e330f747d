//! User configuration: an optional TOML file plus environment and flag
//! overrides, resolved once at startup.

pub mod io;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigurationError;
use crate::core::gemini::{ClientConfig, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::instructions::DEFAULT_SYSTEM_INSTRUCTION;
use crate::core::locale::Locale;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub locale: Option<Locale>,
    /// Replaces the built-in coding-assistant instruction.
    pub system_instruction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Model,
    BaseUrl,
    Locale,
    SystemInstruction,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Model,
        ConfigKey::BaseUrl,
        ConfigKey::Locale,
        ConfigKey::SystemInstruction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Model => "model",
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::Locale => "locale",
            ConfigKey::SystemInstruction => "system-instruction",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownKey(s.to_string()))
    }
}

impl Config {
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigurationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        match key {
            ConfigKey::Model => self.model = Some(trimmed.to_string()),
            ConfigKey::BaseUrl => {
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(ConfigurationError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
                self.base_url = Some(trimmed.to_string());
            }
            ConfigKey::Locale => {
                let locale =
                    Locale::from_code(trimmed).ok_or_else(|| ConfigurationError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
                self.locale = Some(locale);
            }
            ConfigKey::SystemInstruction => self.system_instruction = Some(value.to_string()),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Model => self.model = None,
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::Locale => self.locale = None,
            ConfigKey::SystemInstruction => self.system_instruction = None,
        }
    }

    /// One `key: value` line per setting, `(unset)` where nothing is stored.
    pub fn describe(&self) -> Vec<String> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| {
                let value = match key {
                    ConfigKey::Model => self.model.clone(),
                    ConfigKey::BaseUrl => self.base_url.clone(),
                    ConfigKey::Locale => self.locale.map(|l| l.code().to_string()),
                    ConfigKey::SystemInstruction => self
                        .system_instruction
                        .as_ref()
                        .map(|text| format!("{} chars", text.chars().count())),
                };
                format!("{key}: {}", value.as_deref().unwrap_or("(unset)"))
            })
            .collect()
    }

    /// Applies overrides in order: command-line flag, environment, file, default.
    pub fn resolve(&self, overrides: &Overrides, env_base_url: Option<String>) -> Settings {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let model = non_blank(overrides.model.clone())
            .or_else(|| non_blank(self.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = non_blank(overrides.base_url.clone())
            .or_else(|| non_blank(env_base_url))
            .or_else(|| non_blank(self.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let system_instruction = self
            .system_instruction
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string());

        Settings {
            model,
            base_url,
            locale: self.locale.unwrap_or_default(),
            system_instruction,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub base_url: String,
    pub locale: Locale,
    pub system_instruction: String,
}

impl Settings {
    pub fn client_config(&self, api_key: String) -> ClientConfig {
        ClientConfig {
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
        }
    }
}

/// Validates the credential read from the environment.
pub fn read_credential(value: Option<String>) -> Result<String, ConfigurationError> {
    value
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigurationError::MissingCredential { var: API_KEY_ENV })
}

pub fn credential_from_env() -> Result<String, ConfigurationError> {
    read_credential(std::env::var(API_KEY_ENV).ok())
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

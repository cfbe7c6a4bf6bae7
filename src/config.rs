//! Configuration - CLI and Studio Records
//!
//! Settings are layered with figment (highest wins):
//! 1. Environment variables (`OASIS_SCHEMAS_*`, `__` between sections)
//! 2. An explicit TOML file, or `oasis-schemas.toml` in the working directory
//! 3. Built-in defaults
//!
//! `OASIS_SCHEMAS_API__PROJECT_ID` maps to `api.project_id`.
//!
//! The loaded [`Settings`] are snake_case; [`CliConfig`] and
//! [`StudioConfig`] are the camelCase records the host platform reads.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::registry::SchemaRegistry;
use crate::schema::DocumentType;
use crate::validation::FailureMode;

pub const CONFIG_FILE: &str = "oasis-schemas.toml";
pub const ENV_PREFIX: &str = "OASIS_SCHEMAS_";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Configuration file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Environment values that look numeric reach serde as numbers; identifiers
/// such as an all-digit project id still read as text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(deserialize_with = "string_or_number")]
    pub project_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub dataset: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            project_id: "dvvkusmi".to_string(),
            dataset: "production".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioSettings {
    pub name: String,
    pub title: String,
    pub plugins: Vec<String>,
    /// TLS for the local dev server
    #[serde(default)]
    pub https: bool,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            title: "oasis-sanity-integration".to_string(),
            plugins: vec!["structureTool".to_string(), "visionTool".to_string()],
            https: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default)]
    pub failure_mode: FailureMode,
}

const fn default_true() -> bool {
    true
}

fn default_studio_host() -> String {
    "oasis-avatar".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default = "default_studio_host", deserialize_with = "string_or_number")]
    pub studio_host: String,
    #[serde(default = "default_true")]
    pub auto_updates: bool,
    #[serde(default)]
    pub studio: StudioSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            studio_host: default_studio_host(),
            auto_updates: default_true(),
            studio: StudioSettings::default(),
            validation: ValidationSettings::default(),
        }
    }
}

impl Settings {
    /// Load from all sources and check the result.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Self = Self::figment(explicit)?.extract()?;
        settings.check()?;
        debug!(
            project_id = %settings.api.project_id,
            dataset = %settings.api.dataset,
            "loaded settings"
        );
        Ok(settings)
    }

    /// Provider chain. An explicit file must exist; the default file is
    /// optional.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::MissingFile(path.to_path_buf())),
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if local.exists() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Reject values the host platform would refuse.
    pub fn check(&self) -> Result<(), ConfigError> {
        let project_id = &self.api.project_id;
        if project_id.is_empty()
            || !project_id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(invalid("api.project_id", "must be non-empty lowercase letters and digits"));
        }

        let dataset = &self.api.dataset;
        let starts_alnum = dataset
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        let allowed = dataset
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !starts_alnum || !allowed || dataset.len() > 64 {
            return Err(invalid(
                "api.dataset",
                "must be 1-64 lowercase letters, digits, '_' or '-', starting with a letter or digit",
            ));
        }

        if self.studio_host.is_empty()
            || !self
                .studio_host
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(invalid("studio_host", "must be lowercase letters, digits or '-'"));
        }

        Ok(())
    }

    pub fn cli_config(&self) -> CliConfig {
        CliConfig {
            api: ApiConfig {
                project_id: self.api.project_id.clone(),
                dataset: self.api.dataset.clone(),
            },
            studio_host: self.studio_host.clone(),
            auto_updates: self.auto_updates,
        }
    }

    pub fn studio_config(&self, registry: &SchemaRegistry) -> StudioConfig {
        StudioConfig {
            name: self.studio.name.clone(),
            title: self.studio.title.clone(),
            project_id: self.api.project_id.clone(),
            dataset: self.api.dataset.clone(),
            plugins: self.studio.plugins.clone(),
            schema: SchemaTypes {
                types: registry.list().to_vec(),
            },
            dev_server: DevServer {
                https: self.studio.https,
            },
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub project_id: String,
    pub dataset: String,
}

/// Record read by the host's command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    pub api: ApiConfig,
    pub studio_host: String,
    pub auto_updates: bool,
}

/// The registry's document-type records, in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaTypes {
    pub types: Vec<DocumentType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServer {
    pub https: bool,
}

/// Record the studio runtime boots from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioConfig {
    pub name: String,
    pub title: String,
    pub project_id: String,
    pub dataset: String,
    pub plugins: Vec<String>,
    pub schema: SchemaTypes,
    pub dev_server: DevServer,
}

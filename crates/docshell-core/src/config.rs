//! Configuration for docshell.
//!
//! Connection settings come from a `.properties` file with two required keys,
//! `dbconnection` and `dbname`. The export collection names have defaults and
//! can be overridden in the same file.

use crate::error::{Result, ShellError};
use crate::properties::Properties;
use std::path::Path;
use tracing::{debug, info};

/// Config file location and key names.
pub struct ConfigKeys;

impl ConfigKeys {
    pub const DEFAULT_CONFIG_FILE: &'static str = "config.properties";
    pub const CONNECTION_URI: &'static str = "dbconnection";
    pub const DATABASE_NAME: &'static str = "dbname";
    pub const EXPORT_REQUEST: &'static str = "export.request";
    pub const EXPORT_INDEX: &'static str = "export.index";
    pub const EXPORT_HISTORY: &'static str = "export.history";
}

/// Collections read by the batch exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCollections {
    pub request: String,
    pub index: String,
    pub history: String,
}

impl ExportCollections {
    pub const DEFAULT_REQUEST: &'static str = "imageRequest";
    pub const DEFAULT_INDEX: &'static str = "imageIndex";
    pub const DEFAULT_HISTORY: &'static str = "imageHistory";

    fn from_properties(props: &Properties) -> Self {
        let pick = |key: &str, default: &str| {
            props
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            request: pick(ConfigKeys::EXPORT_REQUEST, Self::DEFAULT_REQUEST),
            index: pick(ConfigKeys::EXPORT_INDEX, Self::DEFAULT_INDEX),
            history: pick(ConfigKeys::EXPORT_HISTORY, Self::DEFAULT_HISTORY),
        }
    }
}

impl Default for ExportCollections {
    fn default() -> Self {
        Self {
            request: Self::DEFAULT_REQUEST.to_string(),
            index: Self::DEFAULT_INDEX.to_string(),
            history: Self::DEFAULT_HISTORY.to_string(),
        }
    }
}

/// Resolved shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Connection string handed to the driver untouched.
    pub connection_uri: String,
    /// Target database name.
    pub database: String,
    pub export: ExportCollections,
}

impl ShellConfig {
    /// Load configuration from a properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let props = Properties::load(path)?;
        let config = Self::from_properties(&props, path)?;

        info!("Loaded configuration with dbname: {}", config.database);
        debug!("Connection string: {}", config.connection_uri);

        Ok(config)
    }

    /// Build configuration from already parsed properties. `path` is only used
    /// for error reporting.
    pub fn from_properties(props: &Properties, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let required = |key: &str| -> Result<String> {
            props
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ShellError::config(format!("missing required key '{}'", key), path))
        };

        Ok(Self {
            connection_uri: required(ConfigKeys::CONNECTION_URI)?,
            database: required(ConfigKeys::DATABASE_NAME)?,
            export: ExportCollections::from_properties(props),
        })
    }
}

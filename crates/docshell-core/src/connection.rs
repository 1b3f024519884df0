//! Connection lifecycle.
//!
//! A [`ConnectionManager`] owns the one database handle of the process. It is
//! opened from a config file at startup and released exactly once, either by
//! an explicit [`ConnectionManager::close`] or on drop.

use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::store::DocumentStore;
use std::path::Path;
use tracing::{debug, info};

/// Owner of the process-wide database connection.
pub struct ConnectionManager {
    store: Option<Box<dyn DocumentStore>>,
    database: String,
    config: Option<ShellConfig>,
}

impl ConnectionManager {
    /// Load `config_path` and connect to MongoDB.
    #[cfg(feature = "mongodb")]
    pub fn connect(config_path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with(config_path, |config| {
            crate::store::MongoStore::connect(&config.connection_uri, &config.database)
        })
    }

    /// Load `config_path` and open a store with `open`.
    ///
    /// Config problems fail with [`ShellError::Config`]; errors from `open`
    /// are reported as [`ShellError::Connect`].
    pub fn connect_with<S, F>(config_path: impl AsRef<Path>, open: F) -> Result<Self>
    where
        S: DocumentStore + 'static,
        F: FnOnce(&ShellConfig) -> Result<S>,
    {
        let config = ShellConfig::load(config_path)?;
        let store = open(&config).map_err(|e| match e {
            ShellError::Connect { .. } => e,
            other => ShellError::Connect {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        })?;

        let mut manager = Self::from_store(store);
        manager.config = Some(config);
        Ok(manager)
    }

    /// Wrap an already open store.
    pub fn from_store(store: impl DocumentStore + 'static) -> Self {
        let database = store.database_name().to_string();
        info!("Opened connection to database {}", database);
        Self {
            store: Some(Box::new(store)),
            database,
            config: None,
        }
    }

    /// Name of the connected database. Still available after close.
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Configuration the connection was opened from, if any.
    pub fn config(&self) -> Option<&ShellConfig> {
        self.config.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    /// The live store, or an operation error once the connection is closed.
    pub fn store(&self) -> Result<&dyn DocumentStore> {
        self.store
            .as_deref()
            .ok_or_else(|| ShellError::operation("connection is closed"))
    }

    /// Release the handle. Returns `false` if it was already released.
    pub fn close(&mut self) -> bool {
        match self.store.take() {
            Some(store) => {
                store.close();
                drop(store);
                info!("Closed connection to database {}", self.database);
                true
            }
            None => {
                debug!("Connection to {} already closed", self.database);
                false
            }
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close();
    }
}

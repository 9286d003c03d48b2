//! KOOK temp file hosting: uploads buffers, streams, local files and remote
//! URLs to KOOK's asset endpoint and returns the public asset URL.
//!
//! The plugin registers a [`KookTempService`] as the `server.temp`
//! capability.

pub mod config;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metric_names;
pub mod service;

mod envelope;
mod source;

use std::sync::Arc;

use {
    reqwest::Client,
    server_temp_service_traits::{Plugin, Services},
    tracing::info,
};

pub use {
    config::{DEFAULT_ENDPOINT, KookTempConfig},
    error::{Error, Result},
    service::KookTempService,
};

/// Plugin identifier and config table key.
pub const PLUGIN_NAME: &str = "server-temp-kook";

/// Host-facing plugin wrapper around a shared [`KookTempService`].
#[derive(Debug, Clone)]
pub struct KookTempPlugin {
    service: Arc<KookTempService>,
}

impl KookTempPlugin {
    #[must_use]
    pub fn new(config: KookTempConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: KookTempConfig) -> Self {
        Self {
            service: Arc::new(KookTempService::with_client(client, config)),
        }
    }

    /// Build from the plugin's raw config table.
    pub fn from_value(client: Client, value: serde_json::Value) -> Result<Self> {
        let config = KookTempConfig::from_value(value)?;
        Ok(Self::with_client(client, config))
    }

    #[must_use]
    pub fn service(&self) -> Arc<KookTempService> {
        Arc::clone(&self.service)
    }
}

impl Plugin for KookTempPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn apply(&self, services: Services) -> Services {
        info!(
            plugin = PLUGIN_NAME,
            endpoint = self.service.endpoint(),
            "registering temp service"
        );
        services.with_temp(PLUGIN_NAME, self.service())
    }
}

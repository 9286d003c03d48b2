use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

use crate::error::{Error, Result};

/// KOOK asset upload endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.kookapp.cn/api/v3/asset/create";

/// Configuration for the KOOK temp file backend.
#[derive(Clone, Deserialize)]
pub struct KookTempConfig {
    /// Bot token from the KOOK developer portal. Required.
    pub token: Secret<String>,

    /// Upload endpoint; only overridden for proxies and tests.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

impl std::fmt::Debug for KookTempConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KookTempConfig")
            .field("token", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl KookTempConfig {
    /// Config pointing at the public KOOK endpoint.
    #[must_use]
    pub fn new(token: Secret<String>) -> Self {
        Self {
            token,
            endpoint: default_endpoint(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Parse and validate the plugin's table from the host config.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| Error::invalid_input(format!("kook config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(Error::invalid_input("kook token must not be empty"));
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| Error::invalid_input(format!("kook endpoint {:?}: {e}", self.endpoint)))?;
        Ok(())
    }
}

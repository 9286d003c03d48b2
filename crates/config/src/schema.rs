use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Keys whose values are replaced by [`REDACTED`] when config is displayed.
const SECRET_KEYS: &[&str] = &["token", "api_key", "secret", "password"];

pub const REDACTED: &str = "[REDACTED]";

/// Top-level configuration file.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerTempConfig {
    /// Settings for the shared outbound HTTP client.
    pub http: HttpConfig,

    /// Per-plugin tables keyed by plugin name. Each plugin parses its own
    /// table.
    pub plugins: BTreeMap<String, serde_json::Value>,
}

impl ServerTempConfig {
    /// Raw config table for `name`, if present.
    #[must_use]
    pub fn plugin(&self, name: &str) -> Option<&serde_json::Value> {
        self.plugins.get(name)
    }

    /// The whole config as JSON with every secret-looking value masked.
    #[must_use]
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        redact(&mut value);
        value
    }
}

impl std::fmt::Debug for ServerTempConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServerTempConfig({})", self.redacted())
    }
}

fn redact(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) && v.is_string() {
                    *v = serde_json::Value::String(REDACTED.into());
                } else {
                    redact(v);
                }
            }
        },
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {},
    }
}

/// Outbound HTTP client settings. The upload core sets no deadline of its
/// own; `timeout_secs` is the only place one is imposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds. `None` disables it.
    pub timeout_secs: Option<u64>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// `User-Agent` header sent on fetches and uploads.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: Some(10),
            user_agent: concat!("server-temp/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

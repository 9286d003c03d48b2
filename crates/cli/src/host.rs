//! Wires configured plugins into the capability container.

use std::time::Duration;

use {
    anyhow::{Context, Result},
    reqwest::Client,
    server_temp_config::{HttpConfig, ServerTempConfig},
    server_temp_kook::{KookTempPlugin, PLUGIN_NAME as KOOK_PLUGIN},
    server_temp_service_traits::{Plugin, Services},
    tracing::debug,
};

/// Plugins this host knows how to start.
pub const KNOWN_PLUGINS: &[&str] = &[KOOK_PLUGIN];

/// Build the shared HTTP client. Timeouts live here, not in the plugins.
pub fn http_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    builder.build().context("failed to build HTTP client")
}

/// Construct every configured plugin and register it.
///
/// A plugin without a config table is skipped, leaving its capability on the
/// `Noop` implementation.
pub fn build_services(config: &ServerTempConfig) -> Result<Services> {
    let client = http_client(&config.http)?;
    let mut services = Services::noop();

    if let Some(table) = config.plugin(KOOK_PLUGIN) {
        let plugin = KookTempPlugin::from_value(client, table.clone())
            .with_context(|| format!("invalid config for plugin {KOOK_PLUGIN}"))?;
        services = plugin.apply(services);
    } else {
        debug!(plugin = KOOK_PLUGIN, "no config table, plugin not started");
    }

    Ok(services)
}

use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::ServerTempConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "server-temp.toml",
    "server-temp.yaml",
    "server-temp.yml",
    "server-temp.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<ServerTempConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load `path` if one was found, otherwise fall back to defaults.
///
/// Pair with [`find_config_file`]. A file that exists but fails to load is an
/// error: defaults would hide a broken plugin table behind "not configured".
pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<ServerTempConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(path)
        },
        None => {
            debug!("no config file found, using defaults");
            Ok(ServerTempConfig::default())
        },
    }
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/server-temp/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "server-temp").map(|d| d.config_dir().to_path_buf())
}

/// Name of the env var that overrides `plugin`'s token, e.g.
/// `server-temp-kook` → `SERVER_TEMP_KOOK_TOKEN`.
#[must_use]
pub fn token_env_var(plugin: &str) -> String {
    format!("{}_TOKEN", plugin.to_ascii_uppercase().replace('-', "_"))
}

/// Apply `<PLUGIN>_TOKEN` environment overrides for the given plugins.
pub fn apply_env_overrides(config: &mut ServerTempConfig, plugins: &[&str]) {
    apply_env_overrides_with(config, plugins, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(
    config: &mut ServerTempConfig,
    plugins: &[&str],
    lookup: impl Fn(&str) -> Option<String>,
) {
    for plugin in plugins {
        let var = token_env_var(plugin);
        let Some(token) = lookup(&var).filter(|t| !t.is_empty()) else {
            continue;
        };
        debug!(plugin, env = %var, "token overridden from environment");
        let table = config
            .plugins
            .entry((*plugin).to_owned())
            .or_insert_with(|| serde_json::json!({}));
        match table.as_object_mut() {
            Some(map) => {
                map.insert("token".into(), serde_json::Value::String(token));
            },
            None => warn!(plugin, "plugin config is not a table, ignoring {var}"),
        }
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<ServerTempConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

pub(crate) fn parse_config_value(raw: &str, path: &Path) -> anyhow::Result<serde_json::Value> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

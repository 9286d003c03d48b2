//! Configuration checks reported as diagnostics rather than hard errors, so
//! `config check` can show everything wrong at once.

use std::path::{Path, PathBuf};

use crate::{env_subst::substitute_env, loader::parse_config_value, schema::ServerTempConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "plugins.server-temp-kook.token"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

const KNOWN_TOP_LEVEL: &[&str] = &["http", "plugins"];
const KNOWN_HTTP: &[&str] = &["timeout_secs", "connect_timeout_secs", "user_agent"];

/// Check a parsed config.
///
/// `required_plugins` lists plugins the host is about to start; each must
/// have a table with a non-empty `token`. Any plugin `endpoint` must parse
/// as a URL.
#[must_use]
pub fn validate(config: &ServerTempConfig, required_plugins: &[&str]) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.http.timeout_secs == Some(0) {
        result.push(Diagnostic::error(
            "http.timeout_secs",
            "must be greater than zero; omit it to disable the timeout",
        ));
    }
    if config.http.connect_timeout_secs == Some(0) {
        result.push(Diagnostic::error(
            "http.connect_timeout_secs",
            "must be greater than zero",
        ));
    }
    if config.http.user_agent.trim().is_empty() {
        result.push(Diagnostic::warning("http.user_agent", "empty User-Agent"));
    }

    for (name, table) in &config.plugins {
        if !table.is_object() {
            result.push(Diagnostic::error(
                format!("plugins.{name}"),
                "plugin config must be a table",
            ));
            continue;
        }
        let endpoint_path = format!("plugins.{name}.endpoint");
        match table.get("endpoint") {
            None => {},
            Some(serde_json::Value::String(endpoint)) => {
                if let Err(e) = url::Url::parse(endpoint) {
                    result.push(Diagnostic::error(
                        endpoint_path,
                        format!("invalid endpoint URL {endpoint:?}: {e}"),
                    ));
                }
            },
            Some(_) => result.push(Diagnostic::error(endpoint_path, "endpoint must be a string")),
        }
    }

    for name in required_plugins {
        let token_path = format!("plugins.{name}.token");
        match config.plugin(name).and_then(|t| t.get("token")) {
            None => result.push(Diagnostic::error(token_path, "missing bot token")),
            Some(serde_json::Value::String(token)) if token.trim().is_empty() => {
                result.push(Diagnostic::error(token_path, "bot token is empty"));
            },
            Some(serde_json::Value::String(token)) if token.starts_with("${") => {
                result.push(Diagnostic::error(
                    token_path,
                    format!("unresolved environment placeholder {token}"),
                ));
            },
            Some(serde_json::Value::String(_)) => {},
            Some(_) => result.push(Diagnostic::error(token_path, "bot token must be a string")),
        }
    }

    result
}

/// Load `path`, flag unknown keys, then run [`validate`].
#[must_use]
pub fn validate_file(path: &Path, required_plugins: &[&str]) -> ValidationResult {
    let mut result = ValidationResult {
        config_path: Some(path.to_path_buf()),
        ..Default::default()
    };

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => substitute_env(&raw),
        Err(e) => {
            result.push(Diagnostic::error(
                path.display().to_string(),
                format!("cannot read config: {e}"),
            ));
            return result;
        },
    };

    let value = match parse_config_value(&raw, path) {
        Ok(value) => value,
        Err(e) => {
            result.push(Diagnostic::error("syntax", e.to_string()));
            return result;
        },
    };
    unknown_keys(&value, &mut result);

    match serde_json::from_value::<ServerTempConfig>(value) {
        Ok(config) => {
            let checked = validate(&config, required_plugins);
            result.diagnostics.extend(checked.diagnostics);
        },
        Err(e) => result.push(Diagnostic::error("type-error", e.to_string())),
    }

    result
}

fn unknown_keys(value: &serde_json::Value, result: &mut ValidationResult) {
    let Some(root) = value.as_object() else {
        return;
    };
    for key in root.keys() {
        if !KNOWN_TOP_LEVEL.contains(&key.as_str()) {
            result.push(Diagnostic::warning(key.clone(), "unknown field"));
        }
    }
    if let Some(http) = root.get("http").and_then(|v| v.as_object()) {
        for key in http.keys() {
            if !KNOWN_HTTP.contains(&key.as_str()) {
                result.push(Diagnostic::warning(format!("http.{key}"), "unknown field"));
            }
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    const KOOK: &str = "server-temp-kook";

    fn config_with_token(token: serde_json::Value) -> ServerTempConfig {
        let mut cfg = ServerTempConfig::default();
        cfg.plugins
            .insert(KOOK.into(), serde_json::json!({ "token": token }));
        cfg
    }

    #[test]
    fn valid_config_has_no_diagnostics() {
        let result = validate(&config_with_token("1/abc".into()), &[KOOK]);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn missing_plugin_table_is_error() {
        let result = validate(&ServerTempConfig::default(), &[KOOK]);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "plugins.server-temp-kook.token");
    }

    #[test]
    fn empty_and_placeholder_tokens_are_errors() {
        assert!(validate(&config_with_token("".into()), &[KOOK]).has_errors());
        let result = validate(&config_with_token("${KOOK_TOKEN}".into()), &[KOOK]);
        assert!(result.diagnostics[0].message.contains("unresolved"));
        assert!(validate(&config_with_token(42.into()), &[KOOK]).has_errors());
    }

    #[test]
    fn unparseable_endpoint_is_error() {
        let mut cfg = config_with_token("1/abc".into());
        cfg.plugins.insert(
            KOOK.into(),
            serde_json::json!({ "token": "1/abc", "endpoint": "not a url" }),
        );
        let result = validate(&cfg, &[KOOK]);
        assert_eq!(result.count(Severity::Error), 1);
        assert_eq!(result.diagnostics[0].path, "plugins.server-temp-kook.endpoint");
        assert!(result.diagnostics[0].message.contains("not a url"));

        cfg.plugins.insert(
            KOOK.into(),
            serde_json::json!({ "token": "1/abc", "endpoint": "http://127.0.0.1:9/asset" }),
        );
        assert!(validate(&cfg, &[KOOK]).diagnostics.is_empty());

        cfg.plugins.insert(
            KOOK.into(),
            serde_json::json!({ "token": "1/abc", "endpoint": 8080 }),
        );
        assert!(validate(&cfg, &[KOOK]).has_errors());
    }

    #[test]
    fn validate_file_reports_bad_endpoint() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
            [plugins.server-temp-kook]
            token = "1/abc"
            endpoint = "://missing-scheme"
            "#
        )
        .unwrap();
        let result = validate_file(file.path(), &[KOOK]);
        assert!(result.has_errors());
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.path == "plugins.server-temp-kook.endpoint")
        );
    }

    #[test]
    fn zero_timeout_is_error() {
        let mut cfg = config_with_token("t".into());
        cfg.http.timeout_secs = Some(0);
        let result = validate(&cfg, &[KOOK]);
        assert_eq!(result.count(Severity::Error), 1);
    }

    #[test]
    fn validate_file_reports_unknown_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
            [http]
            timeout = 5

            [plugins.server-temp-kook]
            token = "1/abc"

            [server]
            port = 1
            "#
        )
        .unwrap();

        let result = validate_file(file.path(), &[KOOK]);
        assert!(!result.has_errors(), "{:?}", result.diagnostics);
        assert_eq!(result.count(Severity::Warning), 2);
        let paths: Vec<_> = result.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"http.timeout"));
        assert!(paths.contains(&"server"));
    }

    #[test]
    fn validate_file_reports_syntax_errors() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[http\n").unwrap();

        let result = validate_file(file.path(), &[KOOK]);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "syntax");
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error("plugins.x.token", "missing bot token");
        assert_eq!(d.to_string(), "error: plugins.x.token: missing bot token");
    }
}

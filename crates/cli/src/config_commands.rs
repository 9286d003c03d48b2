use std::path::{Path, PathBuf};

use {anyhow::Result, clap::Subcommand};

use {
    crate::host::KNOWN_PLUGINS,
    server_temp_config::{Severity, ServerTempConfig, ValidationResult},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check,
    /// Print the effective configuration with secrets redacted.
    Show,
    /// Print the path of the config file that would be loaded.
    Path,
}

pub fn handle_config(
    action: ConfigAction,
    path: Option<&Path>,
    config: &ServerTempConfig,
) -> Result<()> {
    match action {
        ConfigAction::Check => check(path, config),
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            Ok(())
        },
        ConfigAction::Path => {
            match path {
                Some(p) => println!("{}", p.display()),
                None => eprintln!("No config file found."),
            }
            Ok(())
        },
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(path: Option<&Path>, config: &ServerTempConfig) -> Result<()> {
    let result = match path {
        Some(p) => {
            eprintln!("Checking {}\n", p.display());
            let mut result = server_temp_config::validate_file(p, KNOWN_PLUGINS);
            // Env overrides may supply a token the file lacks.
            let effective = server_temp_config::validate(config, KNOWN_PLUGINS);
            retain_effective_token_errors(&mut result, &effective);
            result
        },
        None => {
            eprintln!("No config file found; checking defaults and environment.\n");
            server_temp_config::validate(config, KNOWN_PLUGINS)
        },
    };

    for d in &result.diagnostics {
        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
        };
        eprintln!("  {BOLD}{color}{label}{RESET} {}: {}", d.path, d.message);
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if !result.diagnostics.is_empty() {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Drop token errors from the file check that the effective config (file
/// plus env overrides) no longer has.
fn retain_effective_token_errors(file: &mut ValidationResult, effective: &ValidationResult) {
    file.diagnostics.retain(|d| {
        !d.path.ends_with(".token") || effective.diagnostics.iter().any(|e| e.path == d.path)
    });
}

/// Where `config` subcommands and the loader should look.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(server_temp_config::find_config_file)
}

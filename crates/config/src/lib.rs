//! Configuration loading, env substitution, and validation.
//!
//! Config files: `server-temp.toml`, `server-temp.yaml`, or `server-temp.json`
//! Searched in `./` then `~/.config/server-temp/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in all string
//! values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{
        apply_env_overrides, config_dir, find_config_file, load_config, load_or_default,
        token_env_var,
    },
    schema::{HttpConfig, REDACTED, ServerTempConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_file},
};

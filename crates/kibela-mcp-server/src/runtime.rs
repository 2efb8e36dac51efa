//! Runtime utilities
//!
//! This module is only used by the main binary and provides helper code
//! related to runtime configuration.

mod config;
mod kibela;
pub mod logging;
mod overrides;

use std::path::Path;

pub use config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(kibela_common_env())
        .join(Env::prefixed("KIBELA_MCP_").split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment.
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    Figment::new()
        .join(kibela_common_env())
        .join(Env::prefixed("KIBELA_MCP_").split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file_exact(yaml_path.as_ref()))
        .extract()
}

/// Figment provider that maps `KIBELA_TEAM` and `KIBELA_TOKEN` into the
/// `kibela` section of the config
fn kibela_common_env() -> Env {
    Env::prefixed("KIBELA_")
        .only(&["team", "token"])
        .map(|key| match key.to_string().to_lowercase().as_str() {
            "team" => "KIBELA:TEAM".into(),
            "token" => "KIBELA:TOKEN".into(),

            // `only` filters everything else out
            other => other.to_string().into(),
        })
        .split(":")
}

//! Runtime utilities
//!
//! This module is only used by the `graphql-ops` binary and covers reading
//! configuration and setting up logging.

mod config;
mod logging;

use std::path::Path;

pub use config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use graphql_ops::Document;
use indexmap::IndexMap;
pub use logging::Logging;
use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing_appender::non_blocking::WorkerGuard;

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

const ENV_PREFIX: &str = "GRAPHQL_OPS_";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    let yaml_path = yaml_path.as_ref();
    let mut config: Config = Figment::new()
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file(yaml_path))
        .extract()?;

    if let Some(declared) = DeclaredOperations::read(yaml_path) {
        declared.reorder(&mut config);
    }
    Ok(config)
}

/// Operation names as written in the YAML file.
///
/// Figment hands maps back sorted by key, so the extracted operations are
/// reordered after the file. Names only set through the environment go last.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeclaredOperations {
    queries: IndexMap<String, IgnoredAny>,
    mutations: IndexMap<String, IgnoredAny>,
}

impl DeclaredOperations {
    fn read(yaml_path: &Path) -> Option<Self> {
        #[derive(Deserialize)]
        struct File {
            #[serde(default)]
            operations: DeclaredOperations,
        }

        let source = std::fs::read_to_string(yaml_path).ok()?;
        serde_yaml::from_str::<File>(&source)
            .map(|file| file.operations)
            .ok()
    }

    fn reorder(&self, config: &mut Config) {
        sort_by_declaration(&mut config.operations.queries, &self.queries);
        sort_by_declaration(&mut config.operations.mutations, &self.mutations);
    }
}

fn sort_by_declaration(
    operations: &mut IndexMap<String, Document>,
    declared: &IndexMap<String, IgnoredAny>,
) {
    operations.sort_by_cached_key(|name, _| declared.get_index_of(name).unwrap_or(usize::MAX));
}

/// Sets up either file logging or stderr logging depending on provided configuration options
pub fn setup_logging(config: &Config) -> Result<Option<WorkerGuard>, anyhow::Error> {
    let env_filter = Logging::env_filter(&config.logging)?;
    Logging::init(&config.logging, env_filter)
}

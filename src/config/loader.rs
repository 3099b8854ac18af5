//! Configuration Loader
//!
//! Environment-aware configuration loading: base YAML file, environment
//! overlay, then environment variables, merged with the `config` crate.

use super::error::{ConfigResult, ConfigurationError};
use super::AgentCoreConfig;
use crate::constants::env as env_keys;
use config::{Config, Environment, File, FileFormat, Source};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const BASE_FILE_STEM: &str = "agent_core";

/// Loaded configuration plus the context it was loaded from
#[derive(Debug)]
pub struct ConfigManager {
    config: AgentCoreConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// Useful for tests that must not touch process-wide environment variables.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        if config_directory.exists() && !config_directory.is_dir() {
            return Err(ConfigurationError::DirectoryNotFound {
                path: config_directory,
            });
        }

        debug!(
            environment = %environment,
            directory = %config_directory.display(),
            "Loading configuration"
        );

        let config = Self::build_layered(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = %environment,
            workers = config.dependencies.len(),
            unit_cost_seconds = config.scheduling.unit_cost_seconds,
            timeout_ms = config.execution.timeout_ms,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already-built configuration (tests, embedding applications)
    pub fn from_config(config: AgentCoreConfig, environment: &str) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            environment: environment.to_string(),
            config_directory: PathBuf::from("config"),
        })
    }

    pub fn config(&self) -> &AgentCoreConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    fn build_layered(directory: &Path, environment: &str) -> ConfigResult<AgentCoreConfig> {
        let base_path = directory.join(format!("{BASE_FILE_STEM}.yaml"));
        let overlay_path = directory.join(format!("{BASE_FILE_STEM}.{environment}.yaml"));

        debug!(
            base = %base_path.display(),
            base_exists = base_path.exists(),
            overlay = %overlay_path.display(),
            overlay_exists = overlay_path.exists(),
            "Resolved configuration files"
        );

        let layered = Config::builder()
            .add_source(yaml_file(&base_path))
            .add_source(yaml_file(&overlay_path))
            .add_source(
                Environment::with_prefix(env_keys::CONFIG_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigurationError::load_error(environment, e))?;

        let mut config = layered
            .try_deserialize::<AgentCoreConfig>()
            .map_err(|e| ConfigurationError::load_error(environment, e))?;

        // Merged keys are lowercased but list values are not, so worker
        // names are re-read from the files with their case intact.
        for path in [&overlay_path, &base_path] {
            if let Some(dependencies) = Self::raw_dependencies(path, environment)? {
                config.dependencies = dependencies;
                break;
            }
        }

        Ok(config)
    }

    /// The `dependencies` section of one file as written, if present
    fn raw_dependencies(
        path: &Path,
        environment: &str,
    ) -> ConfigResult<Option<BTreeMap<String, Vec<String>>>> {
        let mut raw = yaml_file(path)
            .collect()
            .map_err(|e| ConfigurationError::load_error(environment, e))?;

        raw.remove("dependencies")
            .map(|section| {
                section
                    .try_deserialize::<BTreeMap<String, Vec<String>>>()
                    .map_err(|e| ConfigurationError::load_error(environment, e))
            })
            .transpose()
    }

    /// Detect current environment from environment variables
    fn detect_environment() -> String {
        crate::logging::get_environment()
    }

    fn default_config_directory() -> PathBuf {
        if let Ok(dir) = env::var(env_keys::CONFIG_DIR) {
            return PathBuf::from(dir);
        }

        if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
            return PathBuf::from(manifest_dir).join("config");
        }

        PathBuf::from("config")
    }
}

fn yaml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Yaml).required(false)
}

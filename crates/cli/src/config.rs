//! Configuration management for the CLI
//!
//! Settings are layered, lowest precedence first: built-in defaults, the
//! config file, `CPU_MODELS_*` environment variables, command-line flags.

use anyhow::{Context, Result};
use cpu_model_lib::{
    Aggregator, EligibilityMode, EligibilityPolicy, EmptyModelPolicy, LabelClassifier,
    LabelNamespaces, CPU_MODEL_PREFIX, HOST_MODEL_PREFIX, KVM_DEVICE_RESOURCE,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "CPU_MODELS";

/// Report settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Which nodes count toward the fleet total
    #[serde(default)]
    pub eligibility: EligibilityMode,

    /// Resource required by the `allocatable` eligibility mode
    #[serde(default = "default_resource_name")]
    pub resource_name: String,

    /// Treatment of labels with an empty model name
    #[serde(default)]
    pub empty_model_names: EmptyModelPolicy,

    #[serde(default = "default_cpu_model_prefix")]
    pub cpu_model_prefix: String,

    #[serde(default = "default_host_model_prefix")]
    pub host_model_prefix: String,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_resource_name() -> String {
    KVM_DEVICE_RESOURCE.to_string()
}

fn default_cpu_model_prefix() -> String {
    CPU_MODEL_PREFIX.to_string()
}

fn default_host_model_prefix() -> String {
    HOST_MODEL_PREFIX.to_string()
}

/// Values supplied on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    /// Explicit config file, which must exist
    pub config_file: Option<PathBuf>,
    pub(crate) values: Vec<(&'static str, String)>,
}

impl Overrides {
    /// Override a setting if a value was given
    pub fn set(mut self, key: &'static str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.values.push((key, value.into()));
        }
        self
    }
}

impl Settings {
    /// Load settings from the config file, environment and overrides
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let mut builder = config::Config::builder();

        match &overrides.config_file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.as_path()).required(true));
            }
            None => {
                if let Some(path) = Self::config_path() {
                    builder =
                        builder.add_source(config::File::from(path.as_path()).required(false));
                }
            }
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

        for (key, value) in &overrides.values {
            builder = builder
                .set_override(*key, value.as_str())
                .with_context(|| format!("Invalid value for {}", key))?;
        }

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Build an aggregator for these settings
    pub fn aggregator(&self) -> Result<Aggregator> {
        let classifier = LabelClassifier::new(LabelNamespaces {
            cpu_model: self.cpu_model_prefix.clone(),
            host_model: self.host_model_prefix.clone(),
        })
        .context("Invalid label prefixes")?
        .with_empty_model_policy(self.empty_model_names);

        let eligibility = EligibilityPolicy::from_mode(self.eligibility, &self.resource_name);

        Ok(Aggregator::new(classifier).with_eligibility(eligibility))
    }

    /// Get the default configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home_config_path(&home))
    }
}

fn home_config_path(home: &Path) -> PathBuf {
    home.join(".config").join("cpu-models").join("config.toml")
}

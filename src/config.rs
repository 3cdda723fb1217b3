//! Runtime configuration: ~/.demo-walkthrough/config.json, then environment,
//! then command-line flags.

use crate::api::DEFAULT_TIMEOUT_SECS;
use crate::gate::{Variant, VariantError, VariantSpec};
use crate::utils::persistence;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.json";

/// Overrides `api_base_url`.
pub const API_URL_ENV: &str = "DEMO_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },
    #[error("could not read variants file {path}: {reason}")]
    VariantsFile { path: PathBuf, reason: String },
    #[error(transparent)]
    Variant(#[from] VariantError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub api_base_url: String,
    pub variant: String,
    pub request_timeout_secs: u64,
    /// Delay between diploma reveal phases
    pub reveal_interval_ms: u64,
    pub learner_name: Option<String>,
    /// JSON list of extra variant definitions
    pub variants_file: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5001".to_string(),
            variant: "guided".to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            reveal_interval_ms: 400,
            learner_name: None,
            variants_file: None,
        }
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliCommand {
    Run,
    ListVariants,
    Version,
    Help,
}

impl DemoConfig {
    /// Loads ~/.demo-walkthrough/config.json, falling back to defaults.
    pub fn load() -> Self {
        persistence::load_json_or_default(CONFIG_FILE)
    }

    pub fn load_from(path: &Path) -> Self {
        persistence::load_json_from(path)
    }

    pub fn save(&self) -> std::io::Result<()> {
        persistence::save_json(CONFIG_FILE, self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Applies environment overrides using `lookup` (usually `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
    }

    /// Parses command-line arguments (without the program name).
    pub fn apply_args(&mut self, args: &[String]) -> Result<CliCommand, ConfigError> {
        let mut command = CliCommand::Run;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--variant" => self.variant = value_for(arg, iter.next())?,
                "--api-url" => self.api_base_url = value_for(arg, iter.next())?,
                "--name" => self.learner_name = Some(value_for(arg, iter.next())?),
                "--variants-file" => {
                    self.variants_file = Some(PathBuf::from(value_for(arg, iter.next())?))
                }
                "--timeout" => {
                    let raw = value_for(arg, iter.next())?;
                    self.request_timeout_secs =
                        raw.parse().map_err(|_| ConfigError::InvalidValue {
                            flag: arg.clone(),
                            value: raw.clone(),
                        })?;
                }
                "--list-variants" => command = CliCommand::ListVariants,
                "--version" | "-v" => return Ok(CliCommand::Version),
                "--help" | "-h" => return Ok(CliCommand::Help),
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }
        Ok(command)
    }

    /// Extra variant specs from `variants_file`, if configured.
    pub fn extra_variants(&self) -> Result<Vec<VariantSpec>, ConfigError> {
        let Some(path) = &self.variants_file else {
            return Ok(Vec::new());
        };
        let json = fs::read_to_string(path).map_err(|e| ConfigError::VariantsFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&json).map_err(|e| ConfigError::VariantsFile {
            path: path.clone(),
            reason: e.to_string(),
        })
    }

    pub fn resolve_variant(&self) -> Result<Variant, ConfigError> {
        let extra = self.extra_variants()?;
        Ok(Variant::by_id(&self.variant, &extra)?)
    }
}

fn value_for(flag: &str, value: Option<&String>) -> Result<String, ConfigError> {
    value
        .cloned()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

pub fn usage() -> String {
    let mut text = String::from("Demo Walkthrough - interactive product demo\n\n");
    text.push_str("Usage: demo-walkthrough [options]\n\n");
    text.push_str("Options:\n");
    text.push_str("  --variant <id>          Walkthrough to run (default: guided)\n");
    text.push_str("  --api-url <url>         Backend base URL\n");
    text.push_str("  --name <name>           Name printed on the diploma\n");
    text.push_str("  --timeout <secs>        Request timeout\n");
    text.push_str("  --variants-file <path>  Extra walkthrough definitions (JSON)\n");
    text.push_str("  --list-variants         List available walkthroughs\n");
    text.push_str("  --version               Show version information\n");
    text.push_str("  --help                  Show this help message\n");
    text
}

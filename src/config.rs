//! Runtime configuration.
//!
//! Loaded from YAML, then overridden from the environment:
//!
//! ```yaml
//! seed: 42
//! default_strategy: selective_combine
//! default_intensity: 1.5
//! verbose: true
//! ```
//!
//! | Variable            | Field               |
//! |---------------------|---------------------|
//! | `CULTURE_SEED`      | `seed`              |
//! | `CULTURE_STRATEGY`  | `default_strategy`  |
//! | `CULTURE_INTENSITY` | `default_intensity` |
//! | `CULTURE_VERBOSE`   | `verbose`           |

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::composer::BlendStrategy;
use crate::error::{CultureError, Result};

pub const ENV_SEED: &str = "CULTURE_SEED";
pub const ENV_STRATEGY: &str = "CULTURE_STRATEGY";
pub const ENV_INTENSITY: &str = "CULTURE_INTENSITY";
pub const ENV_VERBOSE: &str = "CULTURE_VERBOSE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureConfig {
    /// Pins the composer's random source when set.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub default_strategy: BlendStrategy,
    #[serde(default = "default_intensity")]
    pub default_intensity: f64,
    #[serde(default)]
    pub verbose: bool,
}

fn default_intensity() -> f64 {
    1.5
}

impl Default for CultureConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_strategy: BlendStrategy::default(),
            default_intensity: default_intensity(),
            verbose: false,
        }
    }
}

impl CultureConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Override fields from `CULTURE_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Override fields from any key lookup; unset keys leave fields as they are.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SEED) {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| CultureError::Config(format!("{}={:?}: {}", ENV_SEED, raw, e)))?;
            self.seed = Some(seed);
        }

        if let Some(raw) = lookup(ENV_STRATEGY) {
            self.default_strategy = raw
                .parse()
                .map_err(|e| CultureError::Config(format!("{}: {}", ENV_STRATEGY, e)))?;
        }

        if let Some(raw) = lookup(ENV_INTENSITY) {
            let intensity = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| CultureError::Config(format!("{}={:?}: {}", ENV_INTENSITY, raw, e)))?;
            if !intensity.is_finite() || intensity < 0.0 {
                return Err(CultureError::Config(format!(
                    "{} must be finite and non-negative, got {}",
                    ENV_INTENSITY, intensity
                )));
            }
            self.default_intensity = intensity;
        }

        if let Some(raw) = lookup(ENV_VERBOSE) {
            self.verbose = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(CultureError::Config(format!(
                        "{} expects a boolean, got {:?}",
                        ENV_VERBOSE, other
                    )))
                }
            };
        }

        Ok(())
    }
}

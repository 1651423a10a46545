//! Study configuration
//!
//! Loaded from a TOML file such as:
//! ```toml
//! new_cards_per_day = 20
//! reviews_per_day = 100
//!
//! [strength]
//! growth_rate = 0.5
//! overdue_half_life = 1.0
//! ```
//! Every field is optional and falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Limits applied when building a study queue, and the strength curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Maximum never-reviewed cards in one queue
    #[serde(default = "default_new_cards_per_day")]
    pub new_cards_per_day: usize,
    /// Maximum previously reviewed cards in one queue
    #[serde(default = "default_reviews_per_day")]
    pub reviews_per_day: usize,
    #[serde(default)]
    pub strength: StrengthConfig,
}

fn default_new_cards_per_day() -> usize {
    20
}

fn default_reviews_per_day() -> usize {
    100
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            new_cards_per_day: default_new_cards_per_day(),
            reviews_per_day: default_reviews_per_day(),
            strength: StrengthConfig::default(),
        }
    }
}

/// Shape of the knowledge strength curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthConfig {
    /// How quickly strength approaches 1.0 per successful repetition
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,
    /// Overdue time, in multiples of the card's interval, that halves strength
    #[serde(default = "default_overdue_half_life")]
    pub overdue_half_life: f64,
}

fn default_growth_rate() -> f64 {
    0.5
}

fn default_overdue_half_life() -> f64 {
    1.0
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            growth_rate: default_growth_rate(),
            overdue_half_life: default_overdue_half_life(),
        }
    }
}

impl StudyConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded study config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let StrengthConfig {
            growth_rate,
            overdue_half_life,
        } = self.strength;

        if !(growth_rate.is_finite() && growth_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "strength.growth_rate must be positive, got {}",
                growth_rate
            )));
        }
        if !(overdue_half_life.is_finite() && overdue_half_life > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "strength.overdue_half_life must be positive, got {}",
                overdue_half_life
            )));
        }
        Ok(())
    }
}

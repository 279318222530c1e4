//! Layered pipeline configuration.
//!
//! Sources, highest priority first:
//! 1. Command-line overrides
//! 2. `TENOR_*` environment variables (`__` separates sections, so
//!    `TENOR_THRESHOLDS__POSITIVE` sets `thresholds.positive`)
//! 3. `./tenor.toml`
//! 4. `<config dir>/tenor/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tenor_core::PipelineConfig;
use thiserror::Error;

pub const LOCAL_CONFIG_FILE: &str = "tenor.toml";
pub const ENV_PREFIX: &str = "TENOR_";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] tenor_core::ConfigError),
}

/// Values given on the command line. `None` leaves the layered value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub positive_threshold: Option<f64>,
    pub negative_threshold: Option<f64>,
    pub strip_hashtag_text: Option<bool>,
    pub lowercase: Option<bool>,
    pub min_word_length: Option<usize>,
    pub top_words: Option<usize>,
}

impl Overrides {
    fn apply(&self, mut figment: Figment) -> Figment {
        if let Some(v) = self.positive_threshold {
            figment = figment.merge(("thresholds.positive", v));
        }
        if let Some(v) = self.negative_threshold {
            figment = figment.merge(("thresholds.negative", v));
        }
        if let Some(v) = self.strip_hashtag_text {
            figment = figment.merge(("cleaning.strip_hashtag_text", v));
            // Dropping the whole tag needs hashtag handling switched on.
            if v {
                figment = figment.merge(("cleaning.strip_hashtags", true));
            }
        }
        if let Some(v) = self.lowercase {
            figment = figment.merge(("cleaning.lowercase", v));
        }
        if let Some(v) = self.min_word_length {
            figment = figment.merge(("words.min_word_length", v));
        }
        if let Some(v) = self.top_words {
            figment = figment.merge(("words.top_n", v));
        }
        figment
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tenor").join("config.toml"))
}

/// Build the layered figment, reading the user-level file from `global`.
pub fn figment(global: Option<&Path>, overrides: &Overrides) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(PipelineConfig::default()));

    if let Some(path) = global
        && path.exists()
    {
        figment = figment.merge(Toml::file(path));
    }

    let local = Path::new(LOCAL_CONFIG_FILE);
    if local.exists() {
        figment = figment.merge(Toml::file(local));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    overrides.apply(figment)
}

/// Resolve and validate the pipeline configuration.
pub fn load(overrides: &Overrides) -> Result<PipelineConfig, LoadError> {
    load_from(global_config_path().as_deref(), overrides)
}

pub fn load_from(global: Option<&Path>, overrides: &Overrides) -> Result<PipelineConfig, LoadError> {
    let config: PipelineConfig = figment(global, overrides).extract()?;
    config.validate()?;
    Ok(config)
}

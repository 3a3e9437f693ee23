//! Reveal configuration system
//!
//! This crate provides centralized configuration for the reveal sequencer,
//! loading settings from `reveal.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default name of the configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = "reveal.toml";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`RevealConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
    /// Visibility trigger settings
    pub trigger: TriggerConfig,
    /// Defaults applied to numeric counters that don't set their own timing
    pub counter: CounterConfig,
    /// Fade-in presentation settings
    pub fade: FadeConfig,
    /// Demo replay settings
    pub demo: DemoConfig,
}

/// Visibility trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriggerConfig {
    /// Fraction of the container that must be visible, in [0, 1]
    pub threshold: f64,
    /// Pixels the viewport is grown below the fold so containers trigger early
    pub root_margin_px: f64,
    /// Delay between the raw trigger and activation in milliseconds
    pub settle_delay_ms: u64,
    /// Duration of the container's own entrance fade in milliseconds
    pub entrance_ms: u64,
}

/// Numeric counter defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CounterConfig {
    /// Time from first to last step in milliseconds
    pub duration_ms: u64,
    /// Number of equal increments
    pub step_count: u32,
}

/// Fade-in configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FadeConfig {
    /// Opacity transition length once an item becomes visible
    pub duration_ms: u64,
}

/// Demo replay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated frame length in milliseconds
    pub frame_ms: u64,
    /// Pixels scrolled per frame while the page is moving
    pub scroll_step_px: f64,
    /// Optional JSON file holding a custom reveal sequence
    pub sequence_path: Option<PathBuf>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            root_margin_px: 50.0,
            settle_delay_ms: 300,
            entrance_ms: 1000,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1200,
            step_count: 50,
        }
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self { duration_ms: 500 }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            scroll_step_px: 40.0,
            sequence_path: None,
        }
    }
}

impl RevealConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `reveal.toml` in the current directory,
    /// or return the defaults if it is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over file values. Values that
    /// fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        // Trigger settings
        if let Ok(val) = std::env::var("REVEAL_THRESHOLD") {
            if let Ok(threshold) = val.parse::<f64>() {
                self.trigger.threshold = threshold;
            }
        }
        if let Ok(val) = std::env::var("REVEAL_ROOT_MARGIN") {
            if let Ok(margin) = val.parse::<f64>() {
                self.trigger.root_margin_px = margin;
            }
        }
        if let Ok(val) = std::env::var("REVEAL_SETTLE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.trigger.settle_delay_ms = ms;
            }
        }

        // Counter settings
        if let Ok(val) = std::env::var("REVEAL_COUNTER_DURATION_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.counter.duration_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("REVEAL_COUNTER_STEPS") {
            if let Ok(steps) = val.parse::<u32>() {
                self.counter.step_count = steps;
            }
        }

        if let Ok(val) = std::env::var("REVEAL_FADE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.fade.duration_ms = ms;
            }
        }

        // Demo settings
        if let Ok(val) = std::env::var("REVEAL_FRAME_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.demo.frame_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("REVEAL_SCROLL_STEP") {
            if let Ok(step) = val.parse::<f64>() {
                self.demo.scroll_step_px = step;
            }
        }
        if let Ok(path) = std::env::var("REVEAL_SEQUENCE") {
            self.demo.sequence_path = Some(PathBuf::from(path));
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from reveal.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

//! Configuration management for folio
//!
//! Every timing, threshold and DOM hook the controllers use lives here so the
//! same behavior can be replayed headless with different settings.

mod selectors;

pub use selectors::Selectors;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FolioError;

/// Page behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Quiet period after the last scroll event before effects are recomputed
    #[serde(default = "default_scroll_debounce")]
    pub scroll_debounce_ms: u64,

    /// Delay between inserting a notification and sliding it in
    #[serde(default = "default_notification_enter")]
    pub notification_enter_ms: u64,

    /// How long a notification stays before auto-dismissing
    #[serde(default = "default_notification_duration")]
    pub notification_duration_ms: u64,

    /// Exit transition length before an expired notification is removed
    #[serde(default = "default_notification_exit")]
    pub notification_exit_ms: u64,

    /// Simulated latency of the contact form submission
    #[serde(default = "default_submit_latency")]
    pub submit_latency_ms: u64,

    /// Per-index animation delay step (menu entries and grid reveals)
    #[serde(default = "default_stagger_step")]
    pub stagger_step_ms: u64,

    /// Delay before a revealed grid child receives its stagger delay
    #[serde(default = "default_reveal_stagger")]
    pub reveal_stagger_ms: u64,

    /// Vertical offset past which the header is marked as scrolled
    #[serde(default = "default_header_threshold")]
    pub header_scrolled_threshold: f64,

    /// Vertical offset past which the back-to-top control is shown
    #[serde(default = "default_back_to_top_threshold")]
    pub back_to_top_threshold: f64,

    /// Visible fraction at which an observed element is revealed
    #[serde(default = "default_reveal_threshold")]
    pub reveal_threshold: f64,

    /// Pixels trimmed from the bottom of the viewport for reveal detection
    #[serde(default = "default_reveal_bottom_margin")]
    pub reveal_bottom_margin: f64,

    /// Visible fraction at which a lazy image starts loading; zero loads on
    /// the first visible pixel
    #[serde(default)]
    pub lazy_image_threshold: f64,

    /// Pixels trimmed from the bottom of the viewport for lazy image detection
    #[serde(default)]
    pub lazy_image_bottom_margin: f64,

    /// DOM hooks
    #[serde(default)]
    pub selectors: Selectors,
}

/// When an observer reports an element as seen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    /// Minimum visible fraction
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport
    pub bottom_margin: f64,
}

impl Visibility {
    /// Whether a visible fraction of `ratio` counts as seen
    #[must_use]
    pub const fn accepts(self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    /// The bottom margin as an `IntersectionObserver` `rootMargin`
    #[must_use]
    pub fn root_margin(self) -> String {
        if self.bottom_margin > 0.0 {
            format!("0px 0px -{}px 0px", self.bottom_margin)
        } else {
            "0px".to_string()
        }
    }

    fn check(self, name: &str) -> Result<(), FolioError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(FolioError::Config(format!(
                "{name}_threshold must be within 0..=1, got {}",
                self.threshold
            )));
        }
        if !self.bottom_margin.is_finite() || self.bottom_margin < 0.0 {
            return Err(FolioError::Config(format!(
                "{name}_bottom_margin must be a non-negative number, got {}",
                self.bottom_margin
            )));
        }
        Ok(())
    }
}

const fn default_scroll_debounce() -> u64 {
    10
}

const fn default_notification_enter() -> u64 {
    100
}

const fn default_notification_duration() -> u64 {
    5000
}

const fn default_notification_exit() -> u64 {
    300
}

const fn default_submit_latency() -> u64 {
    2000
}

const fn default_stagger_step() -> u64 {
    100
}

const fn default_reveal_stagger() -> u64 {
    100
}

const fn default_header_threshold() -> f64 {
    100.0
}

const fn default_back_to_top_threshold() -> f64 {
    300.0
}

const fn default_reveal_threshold() -> f64 {
    0.1
}

const fn default_reveal_bottom_margin() -> f64 {
    50.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_debounce_ms: default_scroll_debounce(),
            notification_enter_ms: default_notification_enter(),
            notification_duration_ms: default_notification_duration(),
            notification_exit_ms: default_notification_exit(),
            submit_latency_ms: default_submit_latency(),
            stagger_step_ms: default_stagger_step(),
            reveal_stagger_ms: default_reveal_stagger(),
            header_scrolled_threshold: default_header_threshold(),
            back_to_top_threshold: default_back_to_top_threshold(),
            reveal_threshold: default_reveal_threshold(),
            reveal_bottom_margin: default_reveal_bottom_margin(),
            lazy_image_threshold: 0.0,
            lazy_image_bottom_margin: 0.0,
            selectors: Selectors::default(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Rejected config from {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Visibility rule for fade-in and entrance reveals
    #[must_use]
    pub const fn reveal_visibility(&self) -> Visibility {
        Visibility {
            threshold: self.reveal_threshold,
            bottom_margin: self.reveal_bottom_margin,
        }
    }

    /// Visibility rule for deferred images
    #[must_use]
    pub const fn lazy_image_visibility(&self) -> Visibility {
        Visibility {
            threshold: self.lazy_image_threshold,
            bottom_margin: self.lazy_image_bottom_margin,
        }
    }

    /// Check values that serde cannot constrain
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] when a threshold is out of range
    pub fn validate(&self) -> Result<(), FolioError> {
        self.reveal_visibility().check("reveal")?;
        self.lazy_image_visibility().check("lazy_image")?;
        if self.back_to_top_threshold < self.header_scrolled_threshold {
            return Err(FolioError::Config(format!(
                "back_to_top_threshold ({}) must not be below header_scrolled_threshold ({})",
                self.back_to_top_threshold, self.header_scrolled_threshold
            )));
        }
        Ok(())
    }
}

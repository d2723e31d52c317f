//! Site configuration

use std::fs;
use std::path::{Path, PathBuf};

use fz_booking::BookingConfig;
use fz_motion::MotionConfig;
use serde::Deserialize;

use crate::{NavConfig, SiteError};

/// Top-level configuration, loadable from JSON. Every field is optional
/// in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Animation frame interval in milliseconds
    pub frame_interval_ms: f64,
    /// Share of the remaining distance a smooth scroll covers per frame
    pub smooth_scroll_speed: f64,
    /// Emulate an engine without `IntersectionObserver`
    pub intersection_observer: bool,
    /// Persist localStorage here; in-memory when absent
    pub storage_path: Option<PathBuf>,
    /// Pin "today" (`YYYY-MM-DD`); the system date when absent
    pub today: Option<String>,
    pub motion: MotionConfig,
    pub booking: BookingConfig,
    pub nav: NavConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            frame_interval_ms: 16.0,
            smooth_scroll_speed: 0.25,
            intersection_observer: true,
            storage_path: None,
            today: None,
            motion: MotionConfig::default(),
            booking: BookingConfig::default(),
            nav: NavConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SiteError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents).map_err(|source| SiteError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded site config from {}", path.display());
        Ok(config)
    }
}

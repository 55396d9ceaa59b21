//! Configuration loading for Marga

use crate::error::{MargaError, Result};
use crate::route::DeviationMetric;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub announcer: AnnouncerConfig,
}

/// Progress tracking and route deviation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Distance from the route beyond which the rider is off route (meters)
    #[serde(default = "default_off_route_threshold")]
    pub off_route_threshold_m: f64,

    /// Distance at which an instruction counts as reached (meters)
    #[serde(default = "default_instruction_proximity")]
    pub instruction_proximity_m: f64,

    /// Assumed average speed for time estimates (m/s). Not measured.
    #[serde(default = "default_average_speed")]
    pub average_speed_mps: f64,

    /// Maximum instructions the cursor may advance on a single fix
    #[serde(default = "default_max_advance_per_fix")]
    pub max_advance_per_fix: usize,

    /// How distance to the route is measured
    #[serde(default)]
    pub deviation_metric: DeviationMetric,
}

/// Voice announcement settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnnouncerConfig {
    /// Far announcement tier (meters)
    #[serde(default = "default_far_threshold")]
    pub far_threshold_m: f64,

    /// Near announcement tier (meters)
    #[serde(default = "default_near_threshold")]
    pub near_threshold_m: f64,

    /// Immediate announcement tier (meters)
    #[serde(default = "default_immediate_threshold")]
    pub immediate_threshold_m: f64,

    /// Minimum time between any two announcements (seconds)
    #[serde(default = "default_min_interval")]
    pub min_interval_secs: f64,

    /// Announcements on/off
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Locale passed to the phrasebook
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            off_route_threshold_m: default_off_route_threshold(),
            instruction_proximity_m: default_instruction_proximity(),
            average_speed_mps: default_average_speed(),
            max_advance_per_fix: default_max_advance_per_fix(),
            deviation_metric: DeviationMetric::default(),
        }
    }
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            far_threshold_m: default_far_threshold(),
            near_threshold_m: default_near_threshold(),
            immediate_threshold_m: default_immediate_threshold(),
            min_interval_secs: default_min_interval(),
            enabled: default_enabled(),
            locale: default_locale(),
        }
    }
}

// Tracker defaults
fn default_off_route_threshold() -> f64 {
    100.0
}
fn default_instruction_proximity() -> f64 {
    30.0
}
fn default_average_speed() -> f64 {
    60_000.0 / 3600.0
} // 60 km/h
fn default_max_advance_per_fix() -> usize {
    1
}

// Announcer defaults
fn default_far_threshold() -> f64 {
    500.0
}
fn default_near_threshold() -> f64 {
    100.0
}
fn default_immediate_threshold() -> f64 {
    30.0
}
fn default_min_interval() -> f64 {
    3.0
}
fn default_enabled() -> bool {
    true
}
fn default_locale() -> String {
    "en".to_string()
}

/// False for zero, negative and NaN.
#[inline]
fn is_positive(value: f64) -> bool {
    value > 0.0
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MargaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and tier ordering.
    pub fn validate(&self) -> Result<()> {
        let t = &self.tracker;
        if !is_positive(t.off_route_threshold_m) {
            return Err(MargaError::Config(
                "tracker.off_route_threshold_m must be positive".to_string(),
            ));
        }
        if !is_positive(t.instruction_proximity_m) {
            return Err(MargaError::Config(
                "tracker.instruction_proximity_m must be positive".to_string(),
            ));
        }
        if !is_positive(t.average_speed_mps) {
            return Err(MargaError::Config(
                "tracker.average_speed_mps must be positive".to_string(),
            ));
        }
        if t.max_advance_per_fix == 0 {
            return Err(MargaError::Config(
                "tracker.max_advance_per_fix must be at least 1".to_string(),
            ));
        }

        let a = &self.announcer;
        let ordered = is_positive(a.immediate_threshold_m)
            && a.near_threshold_m > a.immediate_threshold_m
            && a.far_threshold_m > a.near_threshold_m;
        if !ordered {
            return Err(MargaError::Config(format!(
                "announcer tiers must satisfy far > near > immediate > 0 (got {} / {} / {})",
                a.far_threshold_m, a.near_threshold_m, a.immediate_threshold_m
            )));
        }
        if a.min_interval_secs.is_nan() || a.min_interval_secs < 0.0 {
            return Err(MargaError::Config(
                "announcer.min_interval_secs must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

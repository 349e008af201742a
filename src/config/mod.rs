//! Overlay configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document is a
//! valid configuration that listens on `/map` and `/robot_pose`.

use crate::common::Color;
use crate::error::{Result, VizError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MAP_TOPIC: &str = "/map";
pub const DEFAULT_ROBOT_POSE: &str = "/robot_pose";
pub const DEFAULT_THROTTLE_RATE_MS: u64 = 100;
pub const DEFAULT_FIXED_FRAME: &str = "map";
/// Longest accepted throttle interval, one hour
pub const MAX_THROTTLE_RATE_MS: u64 = 3_600_000;

/// Top-level overlay options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Map topic the grid client listens to
    pub map_topic: String,
    /// Pose topic, or frame name when a transform client is used
    pub robot_pose: String,
    /// Keep accepting grids after the first one (SLAM)
    pub continuous: bool,
    /// Client-side throttle for the topic pose source, 0 disables it
    pub throttle_rate_ms: u64,
    /// Fixed frame used when building a transform client
    pub fixed_frame: String,
    pub marker: MarkerConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            map_topic: DEFAULT_MAP_TOPIC.to_string(),
            robot_pose: DEFAULT_ROBOT_POSE.to_string(),
            continuous: false,
            throttle_rate_ms: DEFAULT_THROTTLE_RATE_MS,
            fixed_frame: DEFAULT_FIXED_FRAME.to_string(),
            marker: MarkerConfig::default(),
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: OverlayConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Throttle interval for topic subscriptions
    pub fn throttle(&self) -> Option<Duration> {
        (self.throttle_rate_ms > 0).then(|| Duration::from_millis(self.throttle_rate_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.map_topic.is_empty() {
            return Err(VizError::Config("map_topic must not be empty".to_string()));
        }
        if self.robot_pose.is_empty() {
            return Err(VizError::Config("robot_pose must not be empty".to_string()));
        }
        if self.throttle_rate_ms > MAX_THROTTLE_RATE_MS {
            return Err(VizError::Config(format!(
                "throttle_rate_ms must be at most {}, got {}",
                MAX_THROTTLE_RATE_MS, self.throttle_rate_ms
            )));
        }
        self.marker.validate()
    }
}

/// Base outline for shape markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    #[default]
    Circle,
    Square,
}

/// Robot marker appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Image path; selects the image marker when set
    pub image: Option<String>,
    /// Selects the arrow marker when no image is set
    pub use_triangle: bool,
    pub base_type: BaseType,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub size: Option<f64>,
    pub stroke_size: Option<f64>,
    /// Draw a heading indicator on shape markers
    pub use_heading: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            image: None,
            use_triangle: false,
            base_type: BaseType::Circle,
            fill_color: None,
            stroke_color: None,
            size: None,
            stroke_size: None,
            use_heading: true,
        }
    }
}

impl MarkerConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.size {
            if !(size.is_finite() && size > 0.0) {
                return Err(VizError::Config(format!(
                    "marker size must be positive, got {}",
                    size
                )));
            }
        }
        if let Some(stroke) = self.stroke_size {
            if !(stroke.is_finite() && stroke >= 0.0) {
                return Err(VizError::Config(format!(
                    "marker stroke_size must be non-negative, got {}",
                    stroke
                )));
            }
        }
        if let Some(image) = &self.image {
            if image.is_empty() {
                return Err(VizError::Config("marker image path is empty".to_string()));
            }
        }
        for color in [self.fill_color, self.stroke_color].iter().flatten() {
            if !(0.0..=1.0).contains(&color.a) {
                return Err(VizError::Config(format!(
                    "colour alpha must be within [0, 1], got {}",
                    color.a
                )));
            }
        }
        Ok(())
    }
}

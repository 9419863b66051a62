//! Editor configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use ps_camera::config::{ConfigError, load_ron};
use ps_camera::CameraConfig;
use ps_core::constants::SNAP_THRESHOLD;

/// Pixel radius within which a pointer picks a vertex
pub const HOTSPOT_RADIUS: f32 = 8.0;

/// Complete editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Camera settings
    pub camera: CameraConfig,
    /// Snap radius in radians for edited vertices
    pub snap_threshold: f32,
    /// Pick radius in pixels
    pub hotspot_radius: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            snap_threshold: SNAP_THRESHOLD,
            hotspot_radius: HOTSPOT_RADIUS,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_ron(path.as_ref())
    }
}

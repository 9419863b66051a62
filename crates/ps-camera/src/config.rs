//! Camera configuration
//!
//! Settings for the rig and the control plane that can be serialized and
//! loaded from RON files.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use ps_core::Quaternion;

use crate::camera::Rig;

/// Camera and control plane configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Near clipping plane distance
    pub near_plane: f32,
    /// Far clipping plane distance
    pub far_plane: f32,
    /// Initial eye distance from the globe center
    pub distance: f32,
    /// Initial 35mm-equivalent focal length (mm)
    pub focal_length: f32,
    /// Milliseconds a discrete camera nudge takes to settle
    pub transition_time: f32,
    /// Smallest radius of the virtual trackball used by orbit gestures
    pub orbit_min_radius: f32,
    /// Shortest focal length reachable by zoom drags (mm)
    pub min_focal_length: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near_plane: 0.1,
            far_plane: 100.0,
            distance: 4.0,
            focal_length: 32.0,
            transition_time: 64.0,
            orbit_min_radius: 1.0,
            min_focal_length: 8.0,
        }
    }
}

impl CameraConfig {
    /// Clip planes as negative view-space depths `(near, far)`
    pub fn clip(&self) -> Vec2 {
        Vec2::new(-self.near_plane, -self.far_plane)
    }

    /// Initial rig looking at the origin
    pub fn rig(&self) -> Rig {
        Rig::new(
            Vec3::ZERO,
            Quaternion::IDENTITY,
            self.distance,
            self.focal_length,
        )
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_ron(path.as_ref())
    }
}

/// Read and parse a RON configuration file
pub fn load_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    let config = ron::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Configuration loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(String),
    /// The file is not valid RON for the configuration
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CameraConfig::default();
        assert_eq!(config.clip(), Vec2::new(-0.1, -100.0));
        let rig = config.rig();
        assert_eq!(rig.distance, 4.0);
        assert_eq!(rig.focal_length, 32.0);
        assert_eq!(rig.center, Vec3::ZERO);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camera.ron");
        std::fs::write(&path, "(focal_length: 50.0, transition_time: 120.0)").unwrap();

        let config = CameraConfig::load(&path).unwrap();
        assert_eq!(config.focal_length, 50.0);
        assert_eq!(config.transition_time, 120.0);
        assert_eq!(config.distance, 4.0);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(focal_length: \"long\")").unwrap();

        assert!(matches!(CameraConfig::load(&path), Err(ConfigError::Parse(_))));
        assert!(matches!(
            CameraConfig::load(dir.path().join("missing.ron")),
            Err(ConfigError::Io(_))
        ));
    }
}

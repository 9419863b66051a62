//! Map document serialization

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{MAP_VERSION, SEED_POINTS};
use crate::sphere::Sphere;

/// Map document: the border polygon drawn on the globe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    /// File format version
    pub version: u32,
    /// Map name
    pub name: String,
    /// Border vertices on the unit sphere, in order
    points: Vec<Vec3>,
    /// Path of the background image draped over the globe
    #[serde(default)]
    pub background: Option<String>,
}

impl Default for Map {
    fn default() -> Self {
        Self::new("Untitled Map")
    }
}

impl Map {
    /// Create a map holding the seed square
    pub fn new(name: impl Into<String>) -> Self {
        let seed = SEED_POINTS.iter().map(|p| Vec3::from_array(*p)).collect();
        Self {
            version: MAP_VERSION,
            name: name.into(),
            points: normalize_all(seed),
            background: None,
        }
    }

    /// Create a map from arbitrary points, projecting them onto the unit sphere
    pub fn normalizing(name: impl Into<String>, points: Vec<Vec3>) -> Result<Self, MapError> {
        validate(&points)?;
        Ok(Self {
            version: MAP_VERSION,
            name: name.into(),
            points: normalize_all(points),
            background: None,
        })
    }

    /// Border vertices
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Build the editing model for this map
    pub fn sphere(&self, threshold: f32) -> Sphere {
        Sphere::new(self.points.clone()).with_threshold(threshold)
    }

    /// Insert a vertex (renormalized) before `index`
    pub fn insert_point(&mut self, index: usize, point: Vec3) -> Result<(), MapError> {
        if index > self.points.len() {
            return Err(MapError::IndexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        validate(&[point])?;
        self.points.insert(index, point.normalize());
        Ok(())
    }

    /// Replace vertex `index` (renormalized)
    pub fn set_point(&mut self, index: usize, point: Vec3) -> Result<(), MapError> {
        validate(&[point])?;
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(MapError::IndexOutOfRange { index, len })?;
        *slot = point.normalize();
        Ok(())
    }

    /// Remove vertex `index`
    pub fn remove_point(&mut self, index: usize) -> Result<Vec3, MapError> {
        if index >= self.points.len() {
            return Err(MapError::IndexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        Ok(self.points.remove(index))
    }

    /// Save the map, as JSON if the path ends in `.json` and RON otherwise
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_vec_pretty(self).map_err(|e| MapError::Serialize(e.to_string()))?
        } else {
            self.to_bytes()?
        };
        std::fs::write(path, content).map_err(|e| MapError::Io(e.to_string()))?;
        tracing::info!("Saved map '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Serialize the map to RON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, MapError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| MapError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load a map, as JSON if the path ends in `.json` and RON otherwise
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| MapError::Io(e.to_string()))?;
        let map = if is_json(path) {
            let map: Map = serde_json::from_slice(&content)
                .map_err(|e| MapError::Deserialize(e.to_string()))?;
            map.renormalized()?
        } else {
            Self::load_from_bytes(&content)?
        };
        tracing::info!(
            "Loaded map '{}' ({} points) from {}",
            map.name,
            map.points.len(),
            path.display()
        );
        Ok(map)
    }

    /// Load a map from RON bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, MapError> {
        let content =
            std::str::from_utf8(data).map_err(|e| MapError::Deserialize(e.to_string()))?;
        let map: Map = ron::from_str(content).map_err(|e| MapError::Deserialize(e.to_string()))?;
        map.renormalized()
    }

    // files edited by hand may hold points off the sphere
    fn renormalized(mut self) -> Result<Self, MapError> {
        validate(&self.points)?;
        self.points = normalize_all(self.points);
        Ok(self)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn normalize_all(points: Vec<Vec3>) -> Vec<Vec3> {
    points.into_iter().map(Vec3::normalize).collect()
}

fn validate(points: &[Vec3]) -> Result<(), MapError> {
    match points
        .iter()
        .position(|p| !p.is_finite() || p.length_squared() == 0.0)
    {
        Some(index) => Err(MapError::DegeneratePoint(index)),
        None => Ok(()),
    }
}

/// Map-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Point index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Point {0} cannot be projected onto the sphere")]
    DegeneratePoint(usize),
}

//! Pointer ray casting

use glam::{Mat3, Vec2, Vec3};

use ps_core::Ray;

/// Frozen ray caster for one camera pose.
///
/// Gestures keep the rayfilm that was current when they started so that the
/// pointer keeps mapping to the same rays while the camera moves under it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rayfilm {
    /// Fragment matrix taking `(x, y, 1)` window pixels to view directions
    pub matrix: Mat3,
    /// Eye position the rays start from
    pub source: Vec3,
}

impl Default for Rayfilm {
    fn default() -> Self {
        Self {
            matrix: Mat3::IDENTITY,
            source: Vec3::ZERO,
        }
    }
}

impl Rayfilm {
    /// Create a rayfilm from a fragment matrix and an eye position
    pub fn new(matrix: Mat3, source: Vec3) -> Self {
        Self { matrix, source }
    }

    /// Ray through window pixel `s` (origin bottom-left, y up)
    pub fn cast(&self, s: Vec2) -> Ray {
        Ray::new(self.source, self.matrix * s.extend(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_normalizes_direction() {
        let film = Rayfilm::new(Mat3::from_diagonal(Vec3::new(1.0, 1.0, -2.0)), Vec3::Z);
        let ray = film.cast(Vec2::ZERO);
        assert_eq!(ray.source, Vec3::Z);
        assert!(ray.vector.abs_diff_eq(Vec3::NEG_Z, 1e-6));

        let oblique = film.cast(Vec2::new(2.0, 0.0));
        assert!(oblique.vector.abs_diff_eq(Vec3::new(1.0, 0.0, -1.0).normalize(), 1e-6));
    }
}

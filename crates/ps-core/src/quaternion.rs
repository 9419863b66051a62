//! Unit quaternion used for camera orientation
//!
//! Stored as a real part `a` and a vector part `b`, so that the quaternion is
//! `a + b.x i + b.y j + b.z k`. Every constructor and product renormalizes, so
//! a [`Quaternion`] is always a rotation.

use std::ops::Mul;

use glam::{Mat3, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::constants::ANTIPODAL_EPSILON;

/// Rotation quaternion `a + b·(i, j, k)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// Real part
    pub a: f32,
    /// Vector part
    pub b: Vec3,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The rotation that leaves every vector unchanged.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: Vec3::ZERO,
    };

    /// Creates a quaternion from raw components and normalizes it.
    pub fn new(a: f32, b: Vec3) -> Self {
        Self { a, b }.normalized()
    }

    /// Shortest-arc rotation taking unit vector `from` onto unit vector `to`.
    ///
    /// Built as `(a / 2, from × to / a)` with `a = sqrt(2 (1 + from · to))`.
    /// When the inputs are antipodal that formula divides by zero; instead the
    /// half turn about an axis orthogonal to `from` is returned.
    pub fn from_arc(from: Vec3, to: Vec3) -> Self {
        debug_assert!(from.is_normalized() && to.is_normalized());

        let d = 1.0 + from.dot(to);
        if d < ANTIPODAL_EPSILON {
            return Self {
                a: 0.0,
                b: from.any_orthonormal_vector(),
            };
        }

        let a = (2.0 * d).sqrt();
        Self::new(0.5 * a, from.cross(to) / a)
    }

    /// Rotation of `angle` radians about the unit vector `axis`.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin, cos) = (0.5 * angle).sin_cos();
        Self::new(cos, sin * axis)
    }

    /// Euclidean norm of the four components.
    pub fn length(&self) -> f32 {
        self.as_vec4().length()
    }

    /// Returns the quaternion scaled to unit length.
    pub fn normalized(self) -> Self {
        let q = self.as_vec4().normalize();
        Self {
            a: q.w,
            b: q.truncate(),
        }
    }

    /// Inverse rotation (the conjugate, valid because the quaternion is unit).
    pub fn inverse(&self) -> Self {
        Self {
            a: self.a,
            b: -self.b,
        }
    }

    /// Rotates `point`, computing `q p q⁻¹` without building the product.
    pub fn rotate(&self, point: Vec3) -> Vec3 {
        let r = 2.0 * (self.b.dot(point) * self.b + self.a * self.b.cross(point));
        r + point * (self.a * self.a - self.b.dot(self.b))
    }

    /// Equivalent 3x3 rotation matrix.
    pub fn matrix(&self) -> Mat3 {
        let b = self.b;
        let r = Vec3::new(b.y, b.z, b.x);
        let o = b * r;
        let i = b * b;
        let a = b * self.a;

        Mat3::from_cols(
            Vec3::new(
                1.0 - 2.0 * (i.y + i.z),
                2.0 * (o.x + a.z),
                2.0 * (o.z - a.y),
            ),
            Vec3::new(
                2.0 * (o.x - a.z),
                1.0 - 2.0 * (i.x + i.z),
                2.0 * (o.y + a.x),
            ),
            Vec3::new(
                2.0 * (o.z + a.y),
                2.0 * (o.y - a.x),
                1.0 - 2.0 * (i.x + i.y),
            ),
        )
    }

    /// Component-wise closeness check.
    pub fn abs_diff_eq(&self, other: Self, max_abs_diff: f32) -> bool {
        self.as_vec4().abs_diff_eq(other.as_vec4(), max_abs_diff)
    }

    fn as_vec4(&self) -> Vec4 {
        self.b.extend(self.a)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    /// Hamilton product, renormalized to absorb floating-point drift.
    fn mul(self, rhs: Quaternion) -> Quaternion {
        let a = self.a * rhs.a - self.b.dot(rhs.b);
        let b = self.a * rhs.b + rhs.a * self.b + self.b.cross(rhs.b);
        Quaternion::new(a, b)
    }
}

impl From<Quaternion> for Quat {
    fn from(q: Quaternion) -> Self {
        Quat::from_xyzw(q.b.x, q.b.y, q.b.z, q.a)
    }
}

impl From<Quat> for Quaternion {
    fn from(q: Quat) -> Self {
        Quaternion::new(q.w, Vec3::new(q.x, q.y, q.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn samples() -> Vec<Vec3> {
        vec![
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(-0.3, 0.8, 0.5).normalize(),
            Vec3::new(0.2, -0.9, -0.4).normalize(),
            Vec3::new(-1.0, -1.0, 1.0).normalize(),
        ]
    }

    #[test]
    fn test_arc_rotates_source_onto_target() {
        for s in samples() {
            for t in samples() {
                if s.dot(t) < -0.999 {
                    continue;
                }
                let q = Quaternion::from_arc(s, t);
                assert!(q.rotate(s).abs_diff_eq(t, 1e-5), "{s} -> {t}");
                assert_abs_diff_eq!(q.length(), 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_product_stays_normalized() {
        let mut q = Quaternion::IDENTITY;
        for s in samples() {
            q = Quaternion::from_arc(Vec3::Z, s) * q;
            assert_abs_diff_eq!(q.length(), 1.0, epsilon = 1e-6);
        }

        let skewed = Quaternion { a: 2.0, b: Vec3::new(0.0, 1.0, 0.0) };
        assert_abs_diff_eq!((skewed * skewed).length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.0, 0.6, 0.8), 1.1);
        let p = Vec3::new(0.4, -2.0, 3.0);
        assert!(q.inverse().rotate(q.rotate(p)).abs_diff_eq(p, 1e-5));
        assert!((q * q.inverse()).abs_diff_eq(Quaternion::IDENTITY, 1e-6));
    }

    #[test]
    fn test_matrix_matches_rotate() {
        let q = Quaternion::from_arc(Vec3::Z, Vec3::new(0.3, -0.5, 0.8).normalize());
        let p = Vec3::new(1.5, 0.25, -0.75);
        assert!((q.matrix() * p).abs_diff_eq(q.rotate(p), 1e-5));

        // and agrees with glam
        let glam_q: Quat = q.into();
        assert!((glam_q * p).abs_diff_eq(q.rotate(p), 1e-5));
    }

    #[test]
    fn test_composition_order() {
        let qa = Quaternion::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2);
        let qb = Quaternion::from_axis_angle(Vec3::X, std::f32::consts::FRAC_PI_2);
        let p = Vec3::Y;
        // (qa * qb) applies qb first
        assert!((qa * qb).rotate(p).abs_diff_eq(qa.rotate(qb.rotate(p)), 1e-5));
    }

    #[test]
    fn test_antipodal_arc_is_half_turn() {
        let q = Quaternion::from_arc(Vec3::X, Vec3::NEG_X);
        assert!(q.a.is_finite() && q.b.is_finite());
        assert_abs_diff_eq!(q.length(), 1.0, epsilon = 1e-6);
        assert!(q.rotate(Vec3::X).abs_diff_eq(Vec3::NEG_X, 1e-5));
        // the axis is orthogonal to the input
        assert_abs_diff_eq!(q.b.dot(Vec3::X), 0.0, epsilon = 1e-6);
    }
}

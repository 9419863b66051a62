//! Geometry helpers layered on top of glam
//!
//! glam supplies the vector and matrix kernel. This module adds the pixel-space
//! [`Rectangle`], the [`Ray`] type used for picking, and the ray-sphere
//! projections shared by the control plane and the sphere editing model.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel space.
///
/// `a` is the minimum corner and `b` the maximum corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    /// Minimum corner
    pub a: Vec2,
    /// Maximum corner
    pub b: Vec2,
}

impl Rectangle {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        a: Vec2::ZERO,
        b: Vec2::ZERO,
    };

    /// Creates a rectangle from its two corners.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Creates a rectangle anchored at the origin with the given size.
    pub fn from_size(size: Vec2) -> Self {
        Self {
            a: Vec2::ZERO,
            b: size,
        }
    }

    /// Returns the extent of the rectangle.
    pub fn size(&self) -> Vec2 {
        self.b - self.a
    }

    /// Returns the center of the rectangle.
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// Returns true if `point` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.a.x && point.x <= self.b.x && point.y >= self.a.y && point.y <= self.b.y
    }

    /// Returns true if the rectangle has no area.
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !(size.x > 0.0 && size.y > 0.0)
    }
}

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin of the ray
    pub source: Vec3,
    /// Direction of the ray (unit length)
    pub vector: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `vector`.
    pub fn new(source: Vec3, vector: Vec3) -> Self {
        Self {
            source,
            vector: vector.normalize(),
        }
    }

    /// Returns the point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.source + self.vector * t
    }
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Near intersection of a ray with a sphere, if any.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<Vec3> {
    let c = center - ray.source;
    let l = c.dot(ray.vector);

    let discriminant = radius * radius + l * l - c.length_squared();
    if discriminant < 0.0 {
        return None;
    }

    Some(ray.at(l - discriminant.sqrt()))
}

/// Projects a ray onto a sphere.
///
/// If the ray hits the sphere, the near intersection point is returned.
/// Otherwise the result is the point where the ray crosses the line joining
/// the sphere center and the silhouette point closest to the ray, so that
/// `(result - center).normalize() * radius` is the closest visible point on
/// the sphere's outline.
///
/// # Algorithm
///
/// With `A` the angle at the ray source between the direction to the center
/// and the tangent line, and `B` the angle between the ray and the direction
/// to the center:
///
/// ```text
/// sin C = sin B cos A + sin A cos B
///     a = |c| sin A / sin C
///       = |c| h / (r sin B + h cos B)      where h = sqrt(|c|² - r²)
/// ```
///
/// This stays numerically stable as long as the camera is not so far away
/// that the sphere's disk degenerates to a point.
pub fn project_on_sphere(ray: &Ray, center: Vec3, radius: f32) -> Vec3 {
    let c = center - ray.source;
    let l = c.dot(ray.vector);
    let c2 = c.length_squared();

    let discriminant = radius * radius + l * l - c2;
    let a = if discriminant < 0.0 {
        let h = (c2 - radius * radius).sqrt();
        let g = c.normalize().dot(ray.vector);
        (c2.sqrt() * h) / (radius * (1.0 - g * g).max(0.0).sqrt() + g * h)
    } else {
        l - discriminant.sqrt()
    };

    ray.at(a)
}

/// Unit direction from `center` toward the point of the sphere nearest to the ray.
///
/// Rays that miss are attracted to their point of closest approach.
pub fn closest_on_sphere(ray: &Ray, center: Vec3, radius: f32) -> Vec3 {
    let c = center - ray.source;
    let l = c.dot(ray.vector);

    let discriminant = (radius * radius + l * l - c.length_squared()).max(0.0);
    (ray.at(l - discriminant.sqrt()) - center).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rectangle_metrics() {
        let rect = Rectangle::new(Vec2::new(10.0, 20.0), Vec2::new(110.0, 70.0));
        assert_eq!(rect.size(), Vec2::new(100.0, 50.0));
        assert_eq!(rect.midpoint(), Vec2::new(60.0, 45.0));
        assert!(rect.contains(Vec2::new(10.0, 70.0)));
        assert!(!rect.contains(Vec2::new(9.0, 30.0)));
        assert!(!rect.is_degenerate());
        assert!(Rectangle::ZERO.is_degenerate());
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
    }

    #[test]
    fn test_ray_hits_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = intersect_sphere(&ray, Vec3::ZERO, 1.0).expect("ray should hit");
        assert!(hit.abs_diff_eq(Vec3::Z, 1e-6));
        assert!(project_on_sphere(&ray, Vec3::ZERO, 1.0).abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_ray_misses_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::NEG_Z);
        assert!(intersect_sphere(&ray, Vec3::ZERO, 1.0).is_none());

        // closest approach is straight up the y axis
        let attracted = closest_on_sphere(&ray, Vec3::ZERO, 1.0);
        assert!(attracted.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_project_missing_ray_onto_silhouette() {
        // tangent point seen from (0, 0, 5) lies at z = 1/5
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 1.0, -1.0));
        let p = project_on_sphere(&ray, Vec3::ZERO, 1.0);
        let outline = p.normalize();
        assert_abs_diff_eq!(outline.z, 0.2, epsilon = 1e-4);
        assert_abs_diff_eq!(outline.y, 0.96_f32.sqrt(), epsilon = 1e-4);
        assert_abs_diff_eq!(outline.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_project_off_center_sphere() {
        let center = Vec3::new(2.0, 0.0, 0.0);
        let ray = Ray::new(Vec3::new(2.0, 0.0, 10.0), Vec3::NEG_Z);
        let p = project_on_sphere(&ray, center, 2.0);
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, 2.0), 1e-5));
    }
}

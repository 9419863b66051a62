//! Vertex editing on the surface of a sphere
//!
//! A [`Sphere`] holds an ordered, circular list of quasi-normalized points: the
//! predecessor of the first point is the last one and vice versa. Edits are
//! previewed first and then committed; a preview reports one of three
//! [`Operation`] outcomes, where [`Operation::Deleted`] signals that the edit
//! would degenerate the polygon (two adjacent vertices coinciding).

use glam::Vec3;

use crate::constants::SNAP_THRESHOLD;
use crate::math::{self, Ray};

/// Outcome of a previewed or committed edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// The destination is free
    Unconstrained(Vec3),
    /// The destination coincides with an existing, non-adjacent vertex
    Snapped(Vec3),
    /// The edit collapses onto an adjacent vertex; carries that vertex's index
    /// as it will be once the edit is applied
    Deleted(usize),
}

impl Operation {
    /// Point that the edit would place, if it places one
    pub fn destination(&self) -> Option<Vec3> {
        match *self {
            Operation::Unconstrained(p) | Operation::Snapped(p) => Some(p),
            Operation::Deleted(_) => None,
        }
    }
}

/// Index of `index` after the element at `around` has been removed.
pub fn collapse(index: usize, around: usize) -> usize {
    if index <= around { index } else { index - 1 }
}

/// Circular point set on a sphere
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    points: Vec<Vec3>,
    center: Vec3,
    threshold: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Sphere {
    /// Create a unit sphere at the origin holding `points`
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            center: Vec3::ZERO,
            threshold: SNAP_THRESHOLD,
        }
    }

    /// Move the sphere's center
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Set the snap radius in radians
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Points relative to the sphere center
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the sphere holds no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sphere center
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Snap radius in radians
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Replace every vertex, e.g. after the document changed underneath
    pub fn replace(&mut self, points: Vec<Vec3>) {
        self.points = points;
    }

    fn index_before(&self, index: usize) -> usize {
        let n = self.points.len();
        (index + n - 1) % n
    }

    fn index_after(&self, index: usize) -> usize {
        (index + 1) % self.points.len()
    }

    /// Neighbours of `index`.
    ///
    /// The two indices are not guaranteed to be distinct (a digon), but are
    /// guaranteed to differ from `index`.
    pub fn adjacent(&self, index: usize) -> Option<(usize, usize)> {
        if self.points.len() < 2 {
            return None;
        }
        Some((self.index_before(index), self.index_after(index)))
    }

    /// Index of the angularly closest vertex, if it is within `threshold` radians
    pub fn nearest(&self, target: Vec3, threshold: f32) -> Option<usize> {
        self.nearest_filtered(target, threshold, None)
    }

    /// Like [`Sphere::nearest`] but never returns `exclude`
    pub fn nearest_without(&self, target: Vec3, threshold: f32, exclude: usize) -> Option<usize> {
        self.nearest_filtered(target, threshold, Some(exclude))
    }

    fn nearest_filtered(
        &self,
        target: Vec3,
        threshold: f32,
        exclude: Option<usize>,
    ) -> Option<usize> {
        let mut gamma = f32::NEG_INFINITY;
        let mut index = None;
        for (i, point) in self.points.iter().enumerate() {
            if Some(i) == exclude {
                continue;
            }

            let g = point.dot(target);
            if g > gamma {
                gamma = g;
                index = Some(i);
            }
        }

        let i = index?;
        if threshold >= std::f32::consts::PI {
            return Some(i);
        }
        // chord length instead of cosine: cos(threshold) rounds to 1 for tiny thresholds
        let chord = 2.0 * (threshold / 2.0).sin();
        (self.points[i].distance(target) <= chord).then_some(i)
    }

    /// Vertex under a ray, if the ray hits the sphere near one
    pub fn find(&self, ray: &Ray) -> Option<usize> {
        let hit = math::intersect_sphere(ray, self.center, 1.0)?;
        self.nearest((hit - self.center).normalize(), self.threshold)
    }

    fn attract(&self, ray: &Ray) -> Vec3 {
        math::closest_on_sphere(ray, self.center, 1.0)
    }

    /// Preview inserting a vertex at `index` (before the current occupant).
    ///
    /// Landing on either vertex bordering the insertion slot reports
    /// [`Operation::Deleted`] with that vertex's index.
    pub fn preview_add(&self, index: usize, ray: &Ray) -> Operation {
        let destination = self.attract(ray);
        let Some(nearest) = self.nearest(destination, self.threshold) else {
            return Operation::Unconstrained(destination);
        };

        let n = self.points.len();
        let before = (index + n - 1) % n;
        let after = index % n;
        if nearest == before {
            Operation::Deleted(before)
        } else if nearest == after {
            Operation::Deleted(after)
        } else {
            Operation::Snapped(self.points[nearest])
        }
    }

    /// Preview moving vertex `index` under the ray.
    ///
    /// Dropping it onto a neighbour collapses the two when at least two other
    /// vertices remain; the reported index is the neighbour's index after
    /// `index` is removed.
    pub fn preview_move(&self, index: usize, ray: &Ray) -> Operation {
        debug_assert!(index < self.points.len());

        let destination = self.attract(ray);
        let Some(nearest) = self.nearest_without(destination, self.threshold, index) else {
            return Operation::Unconstrained(destination);
        };

        if self.points.len() > 2 {
            let before = self.index_before(index);
            let after = self.index_after(index);
            if nearest == before {
                return Operation::Deleted(collapse(before, index));
            } else if nearest == after {
                return Operation::Deleted(collapse(after, index));
            }
        }

        Operation::Snapped(self.points[nearest])
    }

    /// Insert a vertex at `index`, following [`Sphere::preview_add`]
    pub fn add(&mut self, index: usize, ray: &Ray) -> Operation {
        let operation = self.preview_add(index, ray);
        if let Some(destination) = operation.destination() {
            self.points.insert(index, destination);
            tracing::debug!("Inserted vertex {} ({} total)", index, self.points.len());
        }
        operation
    }

    /// Move vertex `index`, following [`Sphere::preview_move`]
    pub fn move_point(&mut self, index: usize, ray: &Ray) -> Operation {
        let operation = self.preview_move(index, ray);
        match operation.destination() {
            Some(destination) => self.points[index] = destination,
            None => {
                self.points.remove(index);
                tracing::debug!("Vertex {} collapsed ({} left)", index, self.points.len());
            }
        }
        operation
    }

    /// Remove vertex `index`
    pub fn delete(&mut self, index: usize) -> Option<Vec3> {
        if index < self.points.len() {
            Some(self.points.remove(index))
        } else {
            None
        }
    }

    /// Vertices in world space
    pub fn apply(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| *p + self.center).collect()
    }

    /// Vertices in world space as they would look with `operation` inserted at `index`
    pub fn apply_adding(&self, operation: Operation, index: usize) -> Vec<Vec3> {
        let mut vertices = self.apply();
        if let Some(destination) = operation.destination() {
            vertices.insert(index, destination + self.center);
        }
        vertices
    }

    /// Vertices in world space as they would look with vertex `index` moved by `operation`
    pub fn apply_moving(&self, operation: Operation, index: usize) -> Vec<Vec3> {
        let mut vertices = self.apply();
        match operation.destination() {
            Some(destination) => vertices[index] = destination + self.center,
            None => {
                vertices.remove(index);
            }
        }
        vertices
    }
}

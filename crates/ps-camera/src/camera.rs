//! Camera rig and the matrices derived from it

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use ps_core::math::lerp;
use ps_core::{Quaternion, Rectangle};

use crate::rayfilm::Rayfilm;

/// Diagonal of a 35mm film frame, the reference for equivalent focal lengths
const REFERENCE_35: Vec2 = Vec2::new(24.0, 36.0);

/// Distance the rig center moves per track step
const TRACK_STEP: f32 = 0.1;

/// Focal length change per zoom step (mm)
const ZOOM_STEP: f32 = 10.0;

/// Shortest focal length reachable by zoom steps (mm)
const ZOOM_FLOOR: f32 = 20.0;

/// Screen direction of a discrete camera nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the top of the screen
    Up,
    /// Toward the bottom of the screen
    Down,
    /// Toward the left of the screen
    Left,
    /// Toward the right of the screen
    Right,
}

/// Kind of discrete camera nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Rotate around the rig center
    Orbit,
    /// Slide the rig center in the view plane
    Track,
    /// Change the focal length
    Zoom,
}

/// Camera pose relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    /// Look-at point
    pub center: Vec3,
    /// Rotation taking the default view (looking down -Z) to the current one
    pub orientation: Quaternion,
    /// Eye offset from `center` along the rotated +Z axis
    pub distance: f32,
    /// 35mm-equivalent focal length in millimetres
    pub focal_length: f32,
}

impl Default for Rig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            orientation: Quaternion::IDENTITY,
            distance: 0.0,
            focal_length: 35.0,
        }
    }
}

impl Rig {
    /// Create a rig from all of its parameters
    pub fn new(center: Vec3, orientation: Quaternion, distance: f32, focal_length: f32) -> Self {
        Self {
            center,
            orientation,
            distance,
            focal_length,
        }
    }

    /// Apply a discrete keyboard nudge
    pub fn displace(&mut self, action: Action, direction: Direction) {
        match action {
            Action::Orbit => {
                let tilt = match direction {
                    Direction::Up => Vec3::new(0.0, 1.0, 1.0),
                    Direction::Down => Vec3::new(0.0, -1.0, 1.0),
                    Direction::Right => Vec3::new(1.0, 0.0, 1.0),
                    Direction::Left => Vec3::new(-1.0, 0.0, 1.0),
                };
                let q = Quaternion::from_arc(Vec3::Z, tilt.normalize());
                self.orientation = q * self.orientation;
            }
            Action::Track => {
                let d = match direction {
                    Direction::Up => Vec3::new(0.0, TRACK_STEP, 0.0),
                    Direction::Down => Vec3::new(0.0, -TRACK_STEP, 0.0),
                    Direction::Right => Vec3::new(TRACK_STEP, 0.0, 0.0),
                    Direction::Left => Vec3::new(-TRACK_STEP, 0.0, 0.0),
                };
                self.center += self.orientation.rotate(d);
            }
            Action::Zoom => {
                match direction {
                    Direction::Up => self.focal_length += ZOOM_STEP,
                    Direction::Down => {
                        self.focal_length = (self.focal_length - ZOOM_STEP).max(ZOOM_FLOOR)
                    }
                    Direction::Left | Direction::Right => {}
                }
                self.focal_length = self.focal_length.round();
            }
        }
    }

    /// Blend two rigs.
    ///
    /// Center, distance and focal length are interpolated linearly. The
    /// orientation is not interpolated: it stays at `a` until `t` reaches 1.
    pub fn lerp(a: &Rig, b: &Rig, t: f32) -> Rig {
        Rig {
            center: a.center.lerp(b.center, t),
            orientation: if t < 1.0 { a.orientation } else { b.orientation },
            distance: lerp(a.distance, b.distance, t),
            focal_length: lerp(a.focal_length, b.focal_length, t),
        }
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        -self.translation()
    }

    // rotates the camera (and the world) into the default orientation
    fn rotation(&self) -> Mat3 {
        self.orientation.inverse().matrix()
    }

    // translates the camera (and the world) to the origin
    fn translation(&self) -> Vec3 {
        -(self.orientation.rotate(Vec3::new(0.0, 0.0, self.distance)) + self.center)
    }

    /// Derive the camera matrices.
    ///
    /// `frame` is the pixel rectangle whose diagonal the focal length refers
    /// to; its midpoint becomes the optical center. `viewport` is the full
    /// drawable size in pixels and `clip` holds the near and far planes as
    /// negative view-space depths.
    ///
    /// # Algorithm
    ///
    /// ```text
    /// c    = 43.3mm / |p|
    /// f    = q / c
    /// a.xy = p * a.z / f
    ///      = p * a.z * 43.3mm / (|p| * q)
    /// ```
    ///
    /// where `q` is the 35mm-equivalent focal length, `p` a pixel offset of the
    /// frame boundary and `c` the crop factor.
    pub fn matrices(
        &self,
        frame: Rectangle,
        viewport: Vec2,
        clip: Vec2,
    ) -> Result<Camera, CameraError> {
        if frame.is_degenerate() || !(viewport.x > 0.0 && viewport.y > 0.0) {
            return Err(CameraError::DegenerateFrame { frame, viewport });
        }

        let center = frame.midpoint();
        let factor = -clip.x * REFERENCE_35.length() / (self.focal_length * frame.size().length());

        let a = (-center * factor).extend(clip.x);
        let b = ((viewport - center) * factor).extend(clip.y);

        let r = self.rotation();
        let t = self.translation();
        let p = Self::projection(a, b)?;

        let v = Mat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            (r * t).extend(1.0),
        );

        // maps window coordinates to world-space view directions (not normalized)
        let k = (b - a).truncate() / viewport;
        let s = r.transpose();
        let f = Mat3::from_cols(
            k.x * s.x_axis,
            k.y * s.y_axis,
            a.z * s.z_axis + a.y * s.y_axis + a.x * s.x_axis,
        );

        Ok(Camera {
            u: p * v,
            v,
            f,
            position: -t,
            frame,
            viewport,
        })
    }

    // off-axis perspective projection from the near corner `a` (at the near
    // plane) and the far corner `b` (xy still on the near plane, z on the far one)
    fn projection(a: Vec3, b: Vec3) -> Result<Mat4, CameraError> {
        // the depth condition reads more naturally as |a.z| < |b.z|
        let ordered = a.x < b.x && a.y < b.y && b.z < a.z && a.z < 0.0;
        if !(ordered && a.is_finite() && b.is_finite()) {
            return Err(CameraError::InvalidFrustum { near: a, far: b });
        }

        let scale = (a - b).recip();
        let shift = -(a + b) * scale;

        Ok(Mat4::from_cols(
            Vec4::new(2.0 * a.z * scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * a.z * scale.y, 0.0, 0.0),
            Vec4::new(shift.x, shift.y, shift.z, -1.0),
            Vec4::new(0.0, 0.0, 2.0 * a.z * b.z * scale.z, 0.0),
        ))
    }
}

/// Matrices derived from a rig for one frame and viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Projection times view
    pub u: Mat4,
    /// View matrix (world to camera)
    pub v: Mat4,
    /// Fragment matrix: `f * (x, y, 1)` is the world-space view direction of
    /// window pixel `(x, y)`
    pub f: Mat3,
    /// Eye position in world space
    pub position: Vec3,
    /// Frame the matrices were derived for
    pub frame: Rectangle,
    /// Viewport the matrices were derived for
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Camera {
    /// Placeholder camera used before the first derivation
    pub const IDENTITY: Self = Self {
        u: Mat4::IDENTITY,
        v: Mat4::IDENTITY,
        f: Mat3::IDENTITY,
        position: Vec3::ZERO,
        frame: Rectangle::ZERO,
        viewport: Vec2::ZERO,
    };

    /// Snapshot for casting pointer rays
    pub fn rayfilm(&self) -> Rayfilm {
        Rayfilm::new(self.f, self.position)
    }

    /// Normalized device coordinates of a world-space point
    pub fn trace(&self, point: Vec3) -> Vec2 {
        let h = self.u * point.extend(1.0);
        h.truncate().truncate() / h.w
    }

    /// Window pixel of a world-space point, or `None` if it lies behind the eye
    pub fn to_viewport(&self, point: Vec3) -> Option<Vec2> {
        let h = self.u * point.extend(1.0);
        if h.w <= 0.0 {
            return None;
        }
        let ndc = h.truncate().truncate() / h.w;
        Some((ndc * 0.5 + 0.5) * self.viewport)
    }

    /// Get camera uniform data
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            u: self.u.to_cols_array_2d(),
            v: self.v.to_cols_array_2d(),
            fragment: [
                self.f.x_axis.extend(0.0).to_array(),
                self.f.y_axis.extend(0.0).to_array(),
                self.f.z_axis.extend(0.0).to_array(),
                self.position.extend(1.0).to_array(),
            ],
        }
    }
}

/// Camera uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection-view matrix
    pub u: [[f32; 4]; 4],
    /// View matrix
    pub v: [[f32; 4]; 4],
    /// Fragment matrix columns padded to vec4, then the eye position (w = 1)
    pub fragment: [[f32; 4]; 4],
}

/// Camera derivation errors
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CameraError {
    /// The frustum corners violate `a.x < b.x`, `a.y < b.y`, `b.z < a.z < 0`
    #[error("Frustum corners out of order: near {near}, far {far}")]
    InvalidFrustum {
        /// Near corner
        near: Vec3,
        /// Far corner
        far: Vec3,
    },
    /// The frame or viewport has no area
    #[error("Degenerate frame {frame:?} for viewport {viewport}")]
    DegenerateFrame {
        /// Frame rectangle
        frame: Rectangle,
        /// Viewport size
        viewport: Vec2,
    },
}

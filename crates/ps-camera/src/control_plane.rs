//! Interactive camera controller
//!
//! A [`ControlPlane`] keeps two rig keyframes. `base` is where the camera
//! rests and `head` is where it is going. Pointer gestures write `head`
//! directly (phase 0, no easing) while discrete nudges start an eased
//! transition (phase 1 decaying to 0). The visible rig is
//! `Rig::lerp(head, base, phase²)`.

use glam::{Vec2, Vec3};

use ps_core::math::project_on_sphere;
use ps_core::{Quaternion, Ray, Rectangle};

use crate::camera::{Action, Camera, CameraError, Direction, Rig};
use crate::config::CameraConfig;
use crate::latch::Latch;
use crate::rayfilm::Rayfilm;

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Left button
    Primary,
    /// Right button
    Secondary,
    /// Wheel button
    Middle,
}

/// Active pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum State {
    /// No gesture in progress
    #[default]
    None,
    /// Trackball rotation around `base.center`
    Orbit {
        /// Point grabbed on the trackball sphere
        anchor: Vec3,
        /// Trackball radius
        radius: f32,
        /// Ray caster frozen at gesture start
        rayfilm: Rayfilm,
    },
    /// Sliding the center within the view plane
    Track {
        /// Point grabbed on the view plane
        anchor: Vec3,
        /// Ray caster frozen at gesture start
        rayfilm: Rayfilm,
    },
    /// Vertical drag changing the focal length
    Zoom {
        /// Pointer y at gesture start
        origin: f32,
    },
}

impl State {
    fn matches(&self, button: Button) -> bool {
        matches!(
            (self, button),
            (State::Orbit { .. }, Button::Primary)
                | (State::Track { .. }, Button::Secondary)
                | (State::Zoom { .. }, Button::Middle)
        )
    }
}

/// Camera controller driven by pointer, keyboard and frame ticks
#[derive(Debug, Clone)]
pub struct ControlPlane {
    head: Rig,
    base: Rig,
    state: State,
    phase: Option<f32>,
    sensor: Rectangle,
    viewport: Vec2,
    clip: Vec2,
    transition_time: f32,
    orbit_min_radius: f32,
    min_focal_length: f32,
    camera: Latch<Camera>,
}

impl Default for ControlPlane {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl ControlPlane {
    /// Create a controller resting at `rig` with default settings
    pub fn new(rig: Rig) -> Self {
        Self {
            head: rig,
            base: rig,
            ..Self::default()
        }
    }

    /// Create a controller from configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        let rig = config.rig();
        Self {
            head: rig,
            base: rig,
            state: State::None,
            // the first tick derives the camera
            phase: Some(0.0),
            sensor: Rectangle::ZERO,
            viewport: Vec2::ZERO,
            clip: config.clip(),
            transition_time: config.transition_time,
            orbit_min_radius: config.orbit_min_radius,
            min_focal_length: config.min_focal_length,
            camera: Latch::new(Camera::IDENTITY),
        }
    }

    /// Target rig
    pub fn head(&self) -> &Rig {
        &self.head
    }

    /// Resting rig
    pub fn base(&self) -> &Rig {
        &self.base
    }

    /// Active gesture
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Remaining transition, `None` when settled
    pub fn phase(&self) -> Option<f32> {
        self.phase
    }

    /// Frame rectangle the focal length refers to
    pub fn sensor(&self) -> Rectangle {
        self.sensor
    }

    /// Drawable size in pixels
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Most recently derived camera
    pub fn camera(&self) -> &Camera {
        self.camera.get()
    }

    /// Ray caster for the current camera
    pub fn rayfilm(&self) -> Rayfilm {
        self.camera.get().rayfilm()
    }

    /// Normalized device coordinates of a world-space point under the current camera
    pub fn trace(&self, point: Vec3) -> Vec2 {
        self.camera.get().trace(point)
    }

    /// Set the frame rectangle and schedule a recompute
    pub fn set_sensor(&mut self, sensor: Rectangle) {
        self.sensor = sensor;
        self.phase.get_or_insert(0.0);
    }

    /// Resize the drawable; the sensor follows it
    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
        self.set_sensor(Rectangle::from_size(size));
    }

    /// Start a gesture at window pixel `position`
    pub fn down(&mut self, position: Vec2, button: Button) {
        self.rebase();

        let rayfilm = self.rayfilm();
        let ray = rayfilm.cast(position);
        let center = self.base.center;

        self.state = match button {
            Button::Primary => {
                let c = center - ray.source;
                let l = c.dot(ray.vector);
                let radius = (c.length_squared() - l * l)
                    .max(0.0)
                    .sqrt()
                    .max(self.orbit_min_radius);
                State::Orbit {
                    anchor: project_on_sphere(&ray, center, radius),
                    radius,
                    rayfilm,
                }
            }
            Button::Secondary => match self.view_plane_hit(&ray, &rayfilm) {
                Some(anchor) => State::Track { anchor, rayfilm },
                None => {
                    tracing::warn!("Track ignored: pointer ray parallel to the view plane");
                    State::None
                }
            },
            Button::Middle => State::Zoom { origin: position.y },
        };
        tracing::debug!("Gesture started: {:?}", self.state);
    }

    /// Continue the active gesture; hovering without a gesture does nothing
    pub fn move_to(&mut self, position: Vec2) {
        let center = self.base.center;
        match self.state {
            State::None => return,
            State::Orbit {
                anchor,
                radius,
                rayfilm,
            } => {
                let current = project_on_sphere(&rayfilm.cast(position), center, radius);
                let (Some(from), Some(to)) = (
                    (anchor - center).try_normalize(),
                    (current - center).try_normalize(),
                ) else {
                    return;
                };
                let attract = Quaternion::from_arc(from, to);
                self.head.orientation = attract.inverse() * self.base.orientation;
            }
            State::Track { anchor, rayfilm } => {
                if let Some(hit) = self.view_plane_hit(&rayfilm.cast(position), &rayfilm) {
                    self.head.center = center + (anchor - hit);
                }
            }
            State::Zoom { origin } => {
                self.head.focal_length = (self.base.focal_length + (position.y - origin) / 8.0)
                    .max(self.min_focal_length);
            }
        }
        self.phase = Some(0.0);
    }

    /// Finish the gesture started with `button`
    pub fn up(&mut self, position: Vec2, button: Button) {
        self.move_to(position);
        if self.state.matches(button) {
            self.rebase();
        } else if self.state == State::None {
            tracing::warn!("Release of {:?} without an active gesture", button);
        }
    }

    /// Start an eased nudge; ignored during a gesture
    pub fn bump(&mut self, direction: Direction, action: Action) -> bool {
        if !self.charge() {
            return false;
        }
        self.head.displace(action, direction);
        true
    }

    /// Start an eased move of the center to `to`; ignored during a gesture
    pub fn jump(&mut self, to: Vec3) -> bool {
        if !self.charge() {
            return false;
        }
        self.head.center = to;
        true
    }

    /// Advance the transition by `delta` milliseconds.
    ///
    /// Returns true if a new camera was derived.
    pub fn process(&mut self, delta: u32) -> bool {
        let Some(phase) = self.phase else {
            return false;
        };

        let remaining = phase - delta as f32 / self.transition_time;
        let rig = if remaining > 0.0 {
            self.phase = Some(remaining);
            self.interpolate(remaining)
        } else {
            self.phase = None;
            self.head
        };

        match rig.matrices(self.sensor, self.viewport, self.clip) {
            Ok(camera) => {
                self.camera.set(camera);
                true
            }
            Err(e @ CameraError::DegenerateFrame { .. }) => {
                tracing::debug!("Camera not derived: {e}");
                false
            }
            Err(e) => {
                tracing::warn!("Camera not derived: {e}");
                false
            }
        }
    }

    /// Camera derived since the last call, if any
    pub fn pop(&mut self) -> Option<Camera> {
        self.camera.pop()
    }

    fn interpolate(&self, phase: f32) -> Rig {
        Rig::lerp(&self.head, &self.base, phase * phase)
    }

    // freeze whatever is visible as the new resting rig
    fn rebase(&mut self) {
        if let Some(phase) = self.phase.filter(|phase| *phase > 0.0) {
            self.head = self.interpolate(phase);
            self.phase = Some(0.0);
        }
        self.base = self.head;
        self.state = State::None;
    }

    fn charge(&mut self) -> bool {
        if self.state != State::None {
            tracing::debug!("Nudge ignored during {:?}", self.state);
            return false;
        }
        self.rebase();
        self.phase = Some(1.0);
        true
    }

    // plane through the resting center facing the eye
    fn view_plane_hit(&self, ray: &Ray, rayfilm: &Rayfilm) -> Option<Vec3> {
        let center = self.base.center;
        let normal = (rayfilm.source - center)
            .try_normalize()
            .unwrap_or_else(|| self.base.orientation.rotate(Vec3::Z));

        let denominator = ray.vector.dot(normal);
        if denominator.abs() < 1e-6 {
            return None;
        }
        let t = (center - ray.source).dot(normal) / denominator;
        Some(ray.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn settled() -> ControlPlane {
        let mut plane = ControlPlane::default();
        plane.set_viewport(Vec2::new(800.0, 600.0));
        assert!(plane.process(16));
        plane.pop();
        plane
    }

    #[test]
    fn test_first_tick_derives_camera() {
        let mut plane = ControlPlane::default();
        // no viewport yet
        assert!(!plane.process(16));
        assert_eq!(plane.pop(), None);

        plane.set_viewport(Vec2::new(800.0, 600.0));
        assert_eq!(plane.phase(), Some(0.0));
        assert!(plane.process(16));
        assert_eq!(plane.phase(), None);
        assert!(plane.pop().is_some());
        assert!(!plane.process(16));
    }

    #[test]
    fn test_center_ray_orbit_anchor() {
        let mut plane = settled();
        plane.down(Vec2::new(400.0, 300.0), Button::Primary);
        match *plane.state() {
            State::Orbit { anchor, radius, .. } => {
                assert_abs_diff_eq!(radius, 1.0);
                assert!(anchor.abs_diff_eq(Vec3::Z, 1e-4));
            }
            ref other => panic!("expected orbit, got {other:?}"),
        }
    }

    #[test]
    fn test_orbit_keeps_anchor_under_pointer() {
        let mut plane = settled();
        let before = *plane.camera();
        let start = Vec2::new(400.0, 300.0);
        let end = Vec2::new(460.0, 330.0);

        plane.down(start, Button::Primary);
        let State::Orbit { anchor, radius, rayfilm } = *plane.state() else {
            panic!("expected orbit");
        };
        plane.move_to(end);
        assert_eq!(plane.phase(), Some(0.0));
        assert!(plane.process(16));

        let target = project_on_sphere(&rayfilm.cast(end), Vec3::ZERO, radius);
        let after = plane.camera();
        assert!(after.trace(anchor).abs_diff_eq(before.trace(target), 1e-3));
        // orbiting never moves the center
        assert_eq!(plane.head().center, Vec3::ZERO);
    }

    #[test]
    fn test_track_grabs_view_plane() {
        let mut plane = settled();
        plane.down(Vec2::new(400.0, 300.0), Button::Secondary);
        assert!(matches!(plane.state(), State::Track { .. }));

        plane.up(Vec2::new(500.0, 300.0), Button::Secondary);
        assert_eq!(*plane.state(), State::None);
        let center = plane.base().center;
        // dragging right slides the camera left
        assert!(center.x < 0.0);
        assert_abs_diff_eq!(center.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(center.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_drag_clamps_focal_length() {
        let mut plane = settled();
        plane.down(Vec2::new(400.0, 300.0), Button::Middle);
        plane.move_to(Vec2::new(400.0, 380.0));
        assert_abs_diff_eq!(plane.head().focal_length, 42.0);
        plane.move_to(Vec2::new(400.0, -1000.0));
        assert_abs_diff_eq!(plane.head().focal_length, 8.0);
        plane.up(Vec2::new(400.0, -1000.0), Button::Middle);
        assert_abs_diff_eq!(plane.base().focal_length, 8.0);
    }

    #[test]
    fn test_mismatched_release_keeps_gesture() {
        let mut plane = settled();
        plane.down(Vec2::new(400.0, 300.0), Button::Primary);
        plane.up(Vec2::new(410.0, 300.0), Button::Secondary);
        assert!(matches!(plane.state(), State::Orbit { .. }));
    }

    #[test]
    fn test_nudges_wait_for_gesture_end() {
        let mut plane = settled();
        plane.down(Vec2::new(400.0, 300.0), Button::Primary);
        assert!(!plane.bump(Direction::Up, Action::Zoom));
        assert!(!plane.jump(Vec3::X));
        assert_eq!(plane.head().focal_length, 32.0);

        plane.up(Vec2::new(400.0, 300.0), Button::Primary);
        assert!(plane.jump(Vec3::X));
        assert_eq!(plane.phase(), Some(1.0));
        assert_eq!(plane.head().center, Vec3::X);
        assert_eq!(plane.base().center, Vec3::ZERO);
    }

    #[test]
    fn test_transition_eases_with_squared_phase() {
        let mut plane = settled();
        plane.jump(Vec3::new(1.0, 0.0, 0.0));

        // half of the transition time
        assert!(plane.process(32));
        assert_eq!(plane.phase(), Some(0.5));
        let camera = plane.pop().unwrap();
        // lerp(head, base, 0.25) puts the center three quarters of the way
        let eye = Vec3::new(0.75, 0.0, 4.0);
        assert!(camera.position.abs_diff_eq(eye, 1e-5));

        assert!(plane.process(32));
        assert_eq!(plane.phase(), None);
        assert!(plane.pop().unwrap().position.abs_diff_eq(Vec3::new(1.0, 0.0, 4.0), 1e-5));
    }

    #[test]
    fn test_gesture_interrupts_transition() {
        let mut plane = settled();
        plane.jump(Vec3::new(1.0, 0.0, 0.0));
        plane.process(32);

        // down freezes the visible rig as the new base
        plane.down(Vec2::new(400.0, 300.0), Button::Middle);
        assert_eq!(plane.phase(), Some(0.0));
        assert!(plane.base().center.abs_diff_eq(Vec3::new(0.75, 0.0, 0.0), 1e-6));
        assert_eq!(plane.head(), plane.base());
    }

    #[test]
    fn test_sensor_change_schedules_recompute() {
        let mut plane = settled();
        assert_eq!(plane.phase(), None);
        plane.set_sensor(Rectangle::new(Vec2::new(100.0, 0.0), Vec2::new(700.0, 600.0)));
        assert_eq!(plane.phase(), Some(0.0));
        assert!(plane.process(0));
        assert_eq!(plane.pop().unwrap().frame.a, Vec2::new(100.0, 0.0));
    }
}

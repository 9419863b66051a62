//! Polysphere camera
//!
//! Camera rig, projection matrices and the interactive controller that turns
//! pointer, keyboard and frame ticks into camera updates.
//!
//! # Architecture
//!
//! - [`camera::Rig`] - Camera pose relative to its target
//! - [`camera::Camera`] - Matrices derived from a rig for one viewport
//! - [`rayfilm::Rayfilm`] - Frozen pointer ray caster
//! - [`control_plane::ControlPlane`] - Gesture state machine and eased transitions
//!
//! # Module Structure
//!
//! ```text
//! ps-camera/
//! ├── camera.rs          # Rig, Camera, CameraUniform
//! ├── rayfilm.rs         # Window pixel to world ray
//! ├── control_plane.rs   # Orbit/track/zoom gestures and keyframe easing
//! ├── latch.rs           # Pop-once value slot
//! └── config.rs          # Camera configuration
//! ```

pub mod camera;
pub mod config;
pub mod control_plane;
pub mod latch;
pub mod rayfilm;

pub use camera::{Action, Camera, CameraError, CameraUniform, Direction, Rig};
pub use config::{CameraConfig, ConfigError};
pub use control_plane::{Button, ControlPlane, State};
pub use latch::Latch;
pub use rayfilm::Rayfilm;

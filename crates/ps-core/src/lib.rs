//! Polysphere core
//!
//! Geometry and document types shared by the camera and editor crates.
//!
//! # Module Structure
//!
//! ```text
//! ps-core/
//! ├── constants.rs     # Shared tolerances and defaults
//! ├── math.rs          # Rectangle, Ray, sphere projection helpers
//! ├── quaternion.rs    # Unit quaternion with shortest-arc construction
//! ├── sphere.rs        # Circular point list on the unit sphere (editing model)
//! └── map.rs           # Map document and RON/JSON persistence
//! ```

pub mod constants;
pub mod map;
pub mod math;
pub mod quaternion;
pub mod sphere;

pub use map::{Map, MapError};
pub use math::{Ray, Rectangle};
pub use quaternion::Quaternion;
pub use sphere::{Operation, Sphere, collapse};

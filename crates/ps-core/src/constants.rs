//! Global constants for ps-core

/// Snap radius (radians) used when an edited vertex lands near an existing one
pub const SNAP_THRESHOLD: f32 = 0.1;

/// Below this value of `1 + dot(from, to)` two unit vectors are treated as antipodal
pub const ANTIPODAL_EPSILON: f32 = 1e-6;

/// Current map file format version
pub const MAP_VERSION: u32 = 1;

/// Unnormalized corners of the square every new map starts with
pub const SEED_POINTS: [[f32; 3]; 4] = [
    [0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, -1.0, 1.0],
    [-1.0, 0.0, 1.0],
];

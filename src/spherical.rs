//! Spherical to cartesian conversion.
//!
//! Physics convention with +Y as the pole: pitch is the polar angle measured
//! from +Y, yaw the azimuth measured from +X toward +Z.

use glam::{Vec2, Vec3};

/// World up axis shared by the orbit, the mesh poles and `look_at`.
pub const UP: Vec3 = Vec3::Y;

/// Unit direction for a `(yaw, pitch)` pair in radians.
///
/// Defined for every finite input. At pitch 0 or π the result collapses onto
/// the pole and yaw no longer changes it.
pub fn direction_from_spherical(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(sin_pitch * cos_yaw, cos_pitch, sin_pitch * sin_yaw)
}

/// Same as [`direction_from_spherical`] with the angles packed as `(yaw, pitch)`.
pub fn spherical_to_cartesian(orientation: Vec2) -> Vec3 {
    direction_from_spherical(orientation.x, orientation.y)
}

//! Viewer settings shared by the binary and the orbit controller.

use crate::camera::CameraParams;
use crate::mesh::MIN_SUBDIVISIONS;
use crate::raster::terminal_aspect_ratio;
use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub fov_y_degrees: f32,
    /// Viewport size in terminal cells.
    pub columns: usize,
    pub rows: usize,
    /// Orbit step per yaw/pitch command.
    pub angle_step_degrees: f32,
    /// Zoom step per distance command.
    pub distance_step: f32,
    /// Keeps pitch inside (epsilon, π - epsilon).
    pub pitch_epsilon: f32,
    /// Multiplier applied to every catalog radius so small bodies stay visible.
    pub radius_scale: f32,
    /// Focused camera distance, in radii of the focused body.
    pub focus_distance_factor: f32,
    /// Near plane while focused, in radii of the focused body.
    pub near_factor: f32,
    pub parallel_count: u32,
    pub meridian_count: u32,
    /// Log the pointer ray every frame.
    pub trace_pointer: bool,
    /// Draw triangle edges instead of filled faces.
    pub wireframe: bool,
    /// Report frame time, at most once per second.
    pub print_frame_time: bool,
    /// Body focused when the viewer starts, if the catalog has any.
    pub initial_focus: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 80.0,
            columns: 100,
            rows: 40,
            angle_step_degrees: 5.0,
            distance_step: 1.0,
            pitch_epsilon: 1e-3,
            radius_scale: 100.0,
            focus_distance_factor: 2.0,
            near_factor: 0.9,
            parallel_count: 20,
            meridian_count: 20,
            trace_pointer: false,
            wireframe: false,
            print_frame_time: false,
            initial_focus: 0,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        let fov = self.fov_y_degrees.to_radians();
        if !(fov > 0.0 && fov < std::f32::consts::PI) {
            bail!("Field of view must be inside (0, 180) degrees, got {}", self.fov_y_degrees);
        }
        if self.columns == 0 || self.rows == 0 {
            bail!("Viewport must be non-empty, got {}x{} cells", self.columns, self.rows);
        }
        if self.parallel_count < MIN_SUBDIVISIONS || self.meridian_count < MIN_SUBDIVISIONS {
            bail!(
                "Sphere mesh needs at least {} parallels and meridians, got {}x{}",
                MIN_SUBDIVISIONS,
                self.parallel_count,
                self.meridian_count
            );
        }
        if !(self.radius_scale.is_finite() && self.radius_scale > 0.0) {
            bail!("Radius scale must be positive, got {}", self.radius_scale);
        }
        if !(self.pitch_epsilon > 0.0 && self.pitch_epsilon < std::f32::consts::FRAC_PI_2) {
            bail!("Pitch epsilon must be inside (0, π/2) radians, got {}", self.pitch_epsilon);
        }
        if !(self.near_factor > 0.0 && self.near_factor < self.focus_distance_factor) {
            bail!(
                "Near factor {} must be positive and below the focus distance factor {}",
                self.near_factor,
                self.focus_distance_factor
            );
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        terminal_aspect_ratio(self.columns, self.rows)
    }

    /// Starting camera: looking at the origin from the equator.
    pub fn initial_camera_params(&self) -> CameraParams {
        CameraParams::new(self.fov_y_degrees.to_radians(), self.aspect_ratio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let configs = [
            ViewerConfig { fov_y_degrees: 0.0, ..Default::default() },
            ViewerConfig { fov_y_degrees: 180.0, ..Default::default() },
            ViewerConfig { rows: 0, ..Default::default() },
            ViewerConfig { meridian_count: 2, ..Default::default() },
            ViewerConfig { radius_scale: -1.0, ..Default::default() },
            ViewerConfig { near_factor: 3.0, ..Default::default() },
        ];
        for config in configs {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_initial_camera() {
        let config = ViewerConfig::default();
        let params = config.initial_camera_params();
        assert_eq!(params.aspect_ratio, 1.25);
        assert_eq!(params.fov_y, 80f32.to_radians());
    }
}

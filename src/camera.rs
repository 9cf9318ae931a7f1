//! Orbit camera with spherical coordinates.
//!
//! Y-up, right-handed view space looking down -Z, infinite far plane.
//! `CameraParams` is the mutable input side; `Camera` is derived from it in
//! one go every time the parameters change and keeps no history.

use crate::spherical::{spherical_to_cartesian, UP};
use glam::{Mat4, Vec2, Vec3};

const DEFAULT_FOV_DEGREES: f32 = 80.0;
const DEFAULT_ASPECT_RATIO: f32 = 1080.0 / 720.0;
const DEFAULT_DISTANCE: f32 = 1092.0;
const DEFAULT_NEAR_DISTANCE: f32 = 1.0;

/// Inputs the camera is derived from. Owned by the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view in radians, inside (0, π).
    pub fov_y: f32,
    pub aspect_ratio: f32,
    /// Distance from the focus to the eye.
    pub distance: f32,
    pub near_distance: f32,
    /// `(yaw, pitch)` in radians. Pitch must stay inside (0, π).
    pub orientation: Vec2,
    pub focus: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            distance: DEFAULT_DISTANCE,
            near_distance: DEFAULT_NEAR_DISTANCE,
            orientation: Vec2::new(0.0, std::f32::consts::FRAC_PI_2),
            focus: Vec3::ZERO,
        }
    }
}

impl CameraParams {
    pub fn new(fov_y: f32, aspect_ratio: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            ..Self::default()
        }
    }

    pub fn yaw(&self) -> f32 {
        self.orientation.x
    }

    pub fn pitch(&self) -> f32 {
        self.orientation.y
    }

    /// Keeps pitch inside `[epsilon, π - epsilon]` so the orbit never sits on a pole.
    pub fn clamp_pitch(&mut self, epsilon: f32) {
        self.orientation.y = self
            .orientation
            .y
            .clamp(epsilon, std::f32::consts::PI - epsilon);
    }

    pub fn make_camera(&self) -> Camera {
        Camera::from_params(self)
    }
}

/// Derived view state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Unit vector from `position` toward the focus.
    pub look_vector: Vec3,
    /// `(tan(fov/2) * aspect, tan(fov/2))`.
    pub half_screen: Vec2,
    pub view_projection_matrix: Mat4,
    pub inverse_view_matrix: Mat4,
}

impl Camera {
    pub fn from_params(params: &CameraParams) -> Self {
        let tan_half_fov = (params.fov_y / 2.0).tan();
        let half_screen = Vec2::new(tan_half_fov * params.aspect_ratio, tan_half_fov);

        let position = params.focus + params.distance * spherical_to_cartesian(params.orientation);

        let view = Mat4::look_at_rh(position, params.focus, UP);
        let projection = Mat4::perspective_infinite_rh(
            params.fov_y,
            params.aspect_ratio,
            params.near_distance,
        );

        Self {
            position,
            look_vector: (params.focus - position).normalize(),
            half_screen,
            view_projection_matrix: projection * view,
            inverse_view_matrix: view.inverse(),
        }
    }

    /// World-space unit direction through a normalized screen point.
    ///
    /// `screen_point` spans [0,1]x[0,1] with (0,0) at the bottom-left corner.
    pub fn world_direction_from_screen(&self, screen_point: Vec2) -> Vec3 {
        let view_direction = Vec3::new(
            self.half_screen.x * (2.0 * screen_point.x - 1.0),
            self.half_screen.y * (2.0 * screen_point.y - 1.0),
            -1.0,
        );
        // w = 0: rotate only, the eye translation does not apply to directions.
        self.inverse_view_matrix
            .transform_vector3(view_direction)
            .normalize()
    }

    pub fn view_projection_cols(&self) -> [[f32; 4]; 4] {
        self.view_projection_matrix.to_cols_array_2d()
    }
}

/// Maps a pixel position (origin top-left) to a normalized screen point
/// (origin bottom-left).
pub fn screen_point_from_pixel(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(x / width, 1.0 - y / height)
}

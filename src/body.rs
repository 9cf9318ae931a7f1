//! Catalog body: a named, colored sphere with a mass and a state vector.
//!
//! Only `radius` and `position` feed the camera and picking math; name and
//! color are for display, mass and velocity are carried through untouched.

use glam::{Mat4, Vec3};

/// Longest name kept from a catalog record.
pub const MAX_NAME_LEN: usize = 19;

const PALETTE: [[f32; 3]; 8] = [
    [1.0, 0.85, 0.3],  // sun yellow
    [0.6, 0.6, 0.6],   // rock grey
    [0.9, 0.7, 0.4],   // sand
    [0.3, 0.5, 1.0],   // ocean blue
    [0.9, 0.4, 0.25],  // rust
    [0.85, 0.65, 0.5], // banded tan
    [0.9, 0.8, 0.55],  // pale gold
    [0.5, 0.85, 0.9],  // ice cyan
];

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: String,
    pub color: [f32; 3],
    pub radius: f32,
    pub mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Body {
    pub fn new(name: &str, radius: f32, mass: f32, position: Vec3) -> Self {
        Self {
            name: name.chars().take(MAX_NAME_LEN).collect(),
            color: [1.0, 1.0, 1.0],
            radius,
            mass,
            position,
            velocity: Vec3::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    /// Places the shared unit sphere mesh: translate(position) * scale(radius).
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.radius))
    }

    /// Whether the body can be hit by a pick ray at all.
    pub fn is_pickable(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }
}

/// Stable display color for the body at `index` when the catalog has none.
pub fn palette_color(index: usize) -> [f32; 3] {
    PALETTE[index % PALETTE.len()]
}

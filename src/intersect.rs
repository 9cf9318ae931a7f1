//! Line-sphere classification used for picking.

use glam::Vec3;

/// Where a sphere lies relative to a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intersection {
    /// The supporting line never reaches the sphere.
    Miss,
    /// Both intersections sit at a negative ray parameter.
    Behind,
    /// At least one intersection sits at a non-negative ray parameter.
    Front,
}

impl Intersection {
    pub fn is_front(self) -> bool {
        self == Intersection::Front
    }
}

/// Both roots of the line-sphere equation, `near <= far`, or `None` when the
/// line misses. Non-positive or non-finite radii never intersect.
fn line_sphere_roots(
    sphere_center: Vec3,
    sphere_radius: f32,
    ray_origin: Vec3,
    ray_direction: Vec3,
) -> Option<(f32, f32)> {
    if !(sphere_radius.is_finite() && sphere_radius > 0.0) {
        return None;
    }

    let to_line = ray_origin - sphere_center;
    let projection = ray_direction.dot(to_line);
    let discriminant =
        projection * projection - to_line.dot(to_line) + sphere_radius * sphere_radius;

    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    Some((-projection - root, -projection + root))
}

/// Classifies a sphere against a ray. `ray_direction` must be unit length.
pub fn line_sphere_intersect(
    sphere_center: Vec3,
    sphere_radius: f32,
    ray_origin: Vec3,
    ray_direction: Vec3,
) -> Intersection {
    match line_sphere_roots(sphere_center, sphere_radius, ray_origin, ray_direction) {
        None => Intersection::Miss,
        Some((_, far)) if far < 0.0 => Intersection::Behind,
        Some(_) => Intersection::Front,
    }
}

/// Distance along the ray to the first point of the sphere at or ahead of the
/// origin. Zero when the origin is inside the sphere; `None` unless the sphere
/// classifies as [`Intersection::Front`].
pub fn ray_sphere_distance(
    sphere_center: Vec3,
    sphere_radius: f32,
    ray_origin: Vec3,
    ray_direction: Vec3,
) -> Option<f32> {
    let (near, far) =
        line_sphere_roots(sphere_center, sphere_radius, ray_origin, ray_direction)?;
    if far < 0.0 {
        None
    } else {
        Some(near.max(0.0))
    }
}

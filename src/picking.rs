//! Resolves which body sits under a screen point.

use crate::body::Body;
use crate::camera::Camera;
use crate::intersect::{line_sphere_intersect, ray_sphere_distance, Intersection};
use glam::{Vec2, Vec3};

/// The body chosen by a pick and how far along the ray it was hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub index: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickReport {
    pub origin: Vec3,
    pub direction: Vec3,
    /// One entry per body, in catalog order.
    pub classifications: Vec<Intersection>,
    /// Closest body classified as front, if any.
    pub nearest: Option<Pick>,
}

impl PickReport {
    pub fn picked<'a>(&self, bodies: &'a [Body]) -> Option<&'a Body> {
        self.nearest.and_then(|pick| bodies.get(pick.index))
    }

    pub fn front_count(&self) -> usize {
        self.classifications.iter().filter(|c| c.is_front()).count()
    }
}

/// Casts a ray from the eye through `screen_point` and resolves the nearest hit.
pub fn pick(camera: &Camera, screen_point: Vec2, bodies: &[Body]) -> PickReport {
    let direction = camera.world_direction_from_screen(screen_point);
    pick_along_ray(camera.position, direction, bodies)
}

/// Classifies every body against a ray. Equal distances keep the lower index.
pub fn pick_along_ray(origin: Vec3, direction: Vec3, bodies: &[Body]) -> PickReport {
    let mut classifications = Vec::with_capacity(bodies.len());
    let mut nearest: Option<Pick> = None;

    for (index, body) in bodies.iter().enumerate() {
        let classification = line_sphere_intersect(body.position, body.radius, origin, direction);
        classifications.push(classification);

        if !classification.is_front() {
            continue;
        }
        let Some(distance) = ray_sphere_distance(body.position, body.radius, origin, direction)
        else {
            continue;
        };
        log::debug!("Pick candidate {} '{}' at {:.3}", index, body.name, distance);

        if nearest.map_or(true, |best| distance < best.distance) {
            nearest = Some(Pick { index, distance });
        }
    }

    PickReport {
        origin,
        direction,
        classifications,
        nearest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_of_bodies() -> Vec<Body> {
        vec![
            Body::new("far", 1.0, 1.0, Vec3::new(0.0, 0.0, -20.0)),
            Body::new("near", 1.0, 1.0, Vec3::new(0.0, 0.0, -5.0)),
            Body::new("behind", 1.0, 1.0, Vec3::new(0.0, 0.0, 10.0)),
            Body::new("aside", 1.0, 1.0, Vec3::new(8.0, 0.0, -5.0)),
        ]
    }

    #[test]
    fn test_nearest_front_wins_over_catalog_order() {
        let bodies = row_of_bodies();
        let report = pick_along_ray(Vec3::ZERO, -Vec3::Z, &bodies);

        assert_eq!(
            report.classifications,
            vec![
                Intersection::Front,
                Intersection::Front,
                Intersection::Behind,
                Intersection::Miss,
            ]
        );
        assert_eq!(report.front_count(), 2);
        assert_eq!(report.picked(&bodies).unwrap().name, "near");
        assert_eq!(report.nearest.unwrap().distance, 4.0);
    }

    #[test]
    fn test_tie_keeps_first_body() {
        let bodies = vec![
            Body::new("first", 1.0, 1.0, Vec3::new(0.0, 0.0, -5.0)),
            Body::new("second", 1.0, 1.0, Vec3::new(0.0, 0.0, -5.0)),
        ];
        let report = pick_along_ray(Vec3::ZERO, -Vec3::Z, &bodies);
        assert_eq!(report.nearest.unwrap().index, 0);
    }

    #[test]
    fn test_empty_catalog() {
        let report = pick_along_ray(Vec3::ZERO, Vec3::X, &[]);
        assert!(report.classifications.is_empty());
        assert!(report.nearest.is_none());
    }
}

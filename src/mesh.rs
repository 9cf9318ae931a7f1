//! UV-sphere mesh shared by every body.
//!
//! Vertex 0 is the north pole (+Y), followed by `parallel_count` rings of
//! `meridian_count` vertices each, then the south pole. Triangles wind
//! counter-clockwise seen from outside.

use glam::Vec3;
use std::f32::consts::PI;

/// Fewest parallels or meridians that still enclose a volume.
pub const MIN_SUBDIVISIONS: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: u32) -> Vec3 {
        Vec3::from(self.vertices[index as usize])
    }

    /// Triangles as index triples, in buffer order.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Raw vertex buffer contents (tightly packed xyz f32).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index buffer contents (u32).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Builds a unit UV-sphere.
///
/// Vertex count is `parallel_count * meridian_count + 2`, triangle count
/// `2 * meridian_count + 2 * (parallel_count - 1) * meridian_count`. Ring `r`
/// sits at polar angle `π (r + 1) / parallel_count`, so the last ring lands
/// on the south pole and the bottom fan has zero area.
///
/// # Panics
/// If either count is below [`MIN_SUBDIVISIONS`].
pub fn generate_uv_sphere(parallel_count: u32, meridian_count: u32) -> SphereMesh {
    assert!(
        parallel_count >= MIN_SUBDIVISIONS && meridian_count >= MIN_SUBDIVISIONS,
        "sphere needs at least {} parallels and meridians, got {}x{}",
        MIN_SUBDIVISIONS,
        parallel_count,
        meridian_count
    );

    SphereMesh {
        vertices: sphere_vertices(parallel_count, meridian_count),
        indices: sphere_indices(parallel_count, meridian_count),
    }
}

fn sphere_vertices(parallel_count: u32, meridian_count: u32) -> Vec<[f32; 3]> {
    let mut vertices = Vec::with_capacity((parallel_count * meridian_count + 2) as usize);
    vertices.push([0.0, 1.0, 0.0]);

    for ring in 0..parallel_count {
        let parallel = PI * (ring + 1) as f32 / parallel_count as f32;
        let (sin_parallel, cos_parallel) = parallel.sin_cos();

        for i in 0..meridian_count {
            let meridian = 2.0 * PI * i as f32 / meridian_count as f32;
            let (sin_meridian, cos_meridian) = meridian.sin_cos();
            vertices.push([
                sin_parallel * cos_meridian,
                cos_parallel,
                sin_parallel * sin_meridian,
            ]);
        }
    }

    vertices.push([0.0, -1.0, 0.0]);
    vertices
}

fn sphere_indices(parallel_count: u32, meridian_count: u32) -> Vec<u32> {
    let triangle_count = 2 * meridian_count + 2 * (parallel_count - 1) * meridian_count;
    let mut indices = Vec::with_capacity(3 * triangle_count as usize);
    let ring_start = |ring: u32| 1 + ring * meridian_count;

    // Top cap
    let first = ring_start(0);
    for i in 0..meridian_count {
        let next = (i + 1) % meridian_count;
        indices.extend_from_slice(&[0, first + next, first + i]);
    }

    // Body: one quad per ring pair and meridian, split in two
    for ring in 0..parallel_count - 1 {
        let upper = ring_start(ring);
        let lower = ring_start(ring + 1);
        for i in 0..meridian_count {
            let next = (i + 1) % meridian_count;
            indices.extend_from_slice(&[upper + i, lower + next, lower + i]);
            indices.extend_from_slice(&[upper + i, upper + next, lower + next]);
        }
    }

    // Bottom cap
    let last = ring_start(parallel_count - 1);
    let south_pole = parallel_count * meridian_count + 1;
    for i in 0..meridian_count {
        let next = (i + 1) % meridian_count;
        indices.extend_from_slice(&[south_pole, last + i, last + next]);
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_sphere_counts() {
        let mesh = generate_uv_sphere(3, 3);
        assert_eq!(mesh.vertex_count(), 11);
        assert_eq!(mesh.triangle_count(), 2 * 3 + 2 * 2 * 3);
    }

    #[test]
    fn test_poles() {
        let mesh = generate_uv_sphere(4, 6);
        assert_eq!(mesh.vertex(0), Vec3::Y);
        assert_eq!(mesh.vertex(mesh.vertex_count() as u32 - 1), -Vec3::Y);
    }

    #[test]
    fn test_top_fan_wraps() {
        let mesh = generate_uv_sphere(4, 5);
        let last_top = mesh.triangles().nth(4).unwrap();
        assert_eq!(last_top, [0, 1, 5]);
    }

    #[test]
    fn test_buffer_bytes() {
        let mesh = generate_uv_sphere(3, 4);
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertex_count() * 12);
        assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
    }

    #[test]
    #[should_panic]
    fn test_too_few_meridians() {
        generate_uv_sphere(4, 2);
    }
}

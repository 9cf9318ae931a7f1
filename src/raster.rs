//! Terminal renderer.
//!
//! Rasterizes the shared sphere mesh for every body into a grid of glyphs:
//! model-view-projection transform, near-plane rejection, back-face culling
//! (counter-clockwise is front), depth test and a Lambert headlight mapped onto
//! a luminance ramp. In wireframe mode only the edges of front-facing
//! triangles are drawn.

use crate::body::Body;
use crate::camera::Camera;
use crate::mesh::SphereMesh;
use glam::{Vec2, Vec3, Vec4Swizzles};

/// Darkest to brightest.
const RAMP: &[u8] = b".:-=+*#%@";
const AMBIENT: f32 = 0.08;
/// Width over height of one terminal character cell.
const CELL_ASPECT: f32 = 0.5;
const MIN_TRIANGLE_AREA: f32 = 1e-12;
const BLANK: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    /// Shaded body color, `None` for background.
    pub color: Option<[f32; 3]>,
    /// Index of the body covering this cell.
    pub body: Option<usize>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: BLANK,
            color: None,
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn cell(&self, column: usize, row: usize) -> &Cell {
        &self.cells[row * self.width + column]
    }

    /// Cell under a normalized screen point (origin bottom-left).
    pub fn cell_at(&self, screen_point: Vec2) -> (usize, usize) {
        let column = (screen_point.x * self.width as f32).floor() as isize;
        let row = ((1.0 - screen_point.y) * self.height as f32).floor() as isize;
        (
            column.clamp(0, self.width as isize - 1) as usize,
            row.clamp(0, self.height as isize - 1) as usize,
        )
    }

    /// Overwrites the glyph under `screen_point`, keeping its color.
    pub fn mark(&mut self, screen_point: Vec2, glyph: char) {
        if self.cells.is_empty() {
            return;
        }
        let (column, row) = self.cell_at(screen_point);
        self.cells[row * self.width + column].glyph = glyph;
    }

    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.body.is_some()).count()
    }

    pub fn to_plain_string(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            text.extend(row.iter().map(|cell| cell.glyph));
            text.push('\n');
        }
        text
    }

    /// Same layout as [`Frame::to_plain_string`] with 24-bit ANSI colors.
    pub fn to_ansi_string(&self) -> String {
        let mut text = String::new();
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                match cell.color {
                    Some([r, g, b]) => text.push_str(&format!(
                        "\x1B[38;2;{};{};{}m{}",
                        to_channel(r),
                        to_channel(g),
                        to_channel(b),
                        cell.glyph
                    )),
                    None => {
                        text.push_str("\x1B[0m");
                        text.push(cell.glyph);
                    }
                }
            }
            text.push_str("\x1B[0m\n");
        }
        text
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Camera aspect ratio that makes spheres look round in a `columns x rows` grid.
pub fn terminal_aspect_ratio(columns: usize, rows: usize) -> f32 {
    columns as f32 / rows as f32 * CELL_ASPECT
}

struct ProjectedVertex {
    ndc: Vec2,
    depth: f32,
}

pub struct TerminalRenderer {
    width: usize,
    height: usize,
    mesh: SphereMesh,
    wireframe: bool,
}

impl TerminalRenderer {
    pub fn new(width: usize, height: usize, mesh: SphereMesh) -> Self {
        Self {
            width,
            height,
            mesh,
            wireframe: false,
        }
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn render(&self, camera: &Camera, bodies: &[Body]) -> Frame {
        let mut frame = Frame::new(self.width, self.height);
        let mut depth = vec![f32::INFINITY; self.width * self.height];

        for (index, body) in bodies.iter().enumerate() {
            if !body.is_pickable() {
                continue;
            }
            self.draw_body(camera, index, body, &mut frame, &mut depth);
        }

        frame
    }

    fn draw_body(
        &self,
        camera: &Camera,
        index: usize,
        body: &Body,
        frame: &mut Frame,
        depth: &mut [f32],
    ) {
        let model = body.model_matrix();
        let transform = camera.view_projection_matrix * model;

        for triangle in self.mesh.triangles() {
            let world = triangle.map(|i| model.transform_point3(self.mesh.vertex(i)));

            let mut projected = Vec::with_capacity(3);
            for &i in &triangle {
                let clip = transform * self.mesh.vertex(i).extend(1.0);
                // Clip z turns negative in front of the near plane.
                if clip.z < 0.0 || clip.w <= 0.0 {
                    break;
                }
                projected.push(ProjectedVertex {
                    ndc: clip.xy() / clip.w,
                    depth: clip.z / clip.w,
                });
            }
            if projected.len() < 3 {
                continue;
            }

            let area = edge(projected[0].ndc, projected[1].ndc, projected[2].ndc);
            if area <= MIN_TRIANGLE_AREA {
                continue;
            }

            let normal = (world[1] - world[0]).cross(world[2] - world[0]).normalize_or_zero();
            let centroid = (world[0] + world[1] + world[2]) / 3.0;
            let light = (camera.position - centroid).normalize_or_zero();
            let intensity = AMBIENT + (1.0 - AMBIENT) * normal.dot(light).max(0.0);

            let paint = Paint::new(index, body.color, intensity);
            if self.wireframe {
                for (from, to) in [(0, 1), (1, 2), (2, 0)] {
                    self.draw_edge(&projected[from], &projected[to], &paint, frame, depth);
                }
            } else {
                self.fill_triangle(&projected, area, &paint, frame, depth);
            }
        }
    }

    fn to_cell(&self, ndc: Vec2) -> (isize, isize) {
        (
            ((ndc.x + 1.0) * 0.5 * self.width as f32).floor() as isize,
            ((1.0 - ndc.y) * 0.5 * self.height as f32).floor() as isize,
        )
    }

    /// Bresenham line between two projected vertices, depth interpolated
    /// linearly along the steps.
    fn draw_edge(
        &self,
        from: &ProjectedVertex,
        to: &ProjectedVertex,
        paint: &Paint,
        frame: &mut Frame,
        depth: &mut [f32],
    ) {
        let (mut x0, mut y0) = self.to_cell(from.ndc);
        let (x1, y1) = self.to_cell(to.ndc);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let steps = dx.max(-dy).max(1) as f32;
        let mut err = dx + dy;
        let mut step = 0;

        loop {
            if x0 >= 0 && x0 < self.width as isize && y0 >= 0 && y0 < self.height as isize {
                let t = step as f32 / steps;
                let z = from.depth + (to.depth - from.depth) * t;
                paint.plot(y0 as usize * self.width + x0 as usize, z, frame, depth);
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1;
        }
    }

    fn fill_triangle(
        &self,
        vertices: &[ProjectedVertex],
        area: f32,
        paint: &Paint,
        frame: &mut Frame,
        depth: &mut [f32],
    ) {
        let (min, max) = vertices.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), v| (min.min(v.ndc), max.max(v.ndc)),
        );

        let to_column = |x: f32| (x + 1.0) * 0.5 * self.width as f32;
        let to_row = |y: f32| (1.0 - y) * 0.5 * self.height as f32;
        let first_column = to_column(min.x).floor().max(0.0) as usize;
        let last_column = (to_column(max.x).ceil() as usize).min(self.width);
        let first_row = to_row(max.y).floor().max(0.0) as usize;
        let last_row = (to_row(min.y).ceil() as usize).min(self.height);

        for row in first_row..last_row {
            for column in first_column..last_column {
                let point = Vec2::new(
                    (column as f32 + 0.5) / self.width as f32 * 2.0 - 1.0,
                    1.0 - (row as f32 + 0.5) / self.height as f32 * 2.0,
                );
                let w0 = edge(vertices[1].ndc, vertices[2].ndc, point);
                let w1 = edge(vertices[2].ndc, vertices[0].ndc, point);
                let w2 = edge(vertices[0].ndc, vertices[1].ndc, point);
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = (w0 * vertices[0].depth + w1 * vertices[1].depth + w2 * vertices[2].depth)
                    / area;
                paint.plot(row * self.width + column, z, frame, depth);
            }
        }
    }
}

/// Glyph and color a triangle of one body is drawn with.
struct Paint {
    cell: Cell,
}

impl Paint {
    fn new(index: usize, color: [f32; 3], intensity: f32) -> Self {
        let glyph = RAMP[((intensity * RAMP.len() as f32) as usize).min(RAMP.len() - 1)] as char;
        Self {
            cell: Cell {
                glyph,
                color: Some(color.map(|channel| channel * intensity)),
                body: Some(index),
            },
        }
    }

    /// Writes the cell at `slot` if `z` passes the depth test.
    fn plot(&self, slot: usize, z: f32, frame: &mut Frame, depth: &mut [f32]) {
        if z >= depth[slot] {
            return;
        }
        depth[slot] = z;
        frame.cells[slot] = self.cell;
    }
}

/// Twice the signed area of `abc`; positive when counter-clockwise.
fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Pointer ray segment the way the debug overlay draws it: from just in front
/// of the eye along the look vector to the same depth along the pick ray.
pub fn pointer_segment(camera: &Camera, direction: Vec3, near_distance: f32) -> (Vec3, Vec3) {
    let reach = 2.0 * near_distance;
    (
        camera.position + reach * camera.look_vector,
        camera.position + reach * direction,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraParams;
    use crate::mesh::generate_uv_sphere;

    #[test]
    fn test_edge_sign() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);
        assert!(edge(a, b, c) > 0.0);
        assert!(edge(a, c, b) < 0.0);
    }

    #[test]
    fn test_cell_at_corners() {
        let frame = Frame::new(10, 4);
        assert_eq!(frame.cell_at(Vec2::new(0.0, 1.0)), (0, 0));
        assert_eq!(frame.cell_at(Vec2::new(1.0, 0.0)), (9, 3));
        assert_eq!(frame.cell_at(Vec2::new(0.5, 0.5)), (5, 2));
    }

    #[test]
    fn test_plain_string_layout() {
        let mut frame = Frame::new(3, 2);
        frame.mark(Vec2::new(0.0, 1.0), '+');
        assert_eq!(frame.to_plain_string(), "+  \n   \n");
    }

    #[test]
    fn test_terminal_aspect() {
        assert_eq!(terminal_aspect_ratio(80, 20), 2.0);
    }

    #[test]
    fn test_wireframe_draws_edges_only() {
        let (width, height) = (120, 60);
        let mut params = CameraParams::new(60f32.to_radians(), terminal_aspect_ratio(width, height));
        params.distance = 3.0;
        params.near_distance = 0.5;
        let camera = params.make_camera();
        let bodies = [Body::new("ball", 1.0, 1.0, Vec3::ZERO)];

        let mut renderer = TerminalRenderer::new(width, height, generate_uv_sphere(4, 6));
        let filled = renderer.render(&camera, &bodies);
        renderer.set_wireframe(true);
        let wire = renderer.render(&camera, &bodies);

        assert!(wire.covered_cells() > 0);
        assert!(wire.covered_cells() < filled.covered_cells());
    }
}

pub mod body;
pub mod camera;
pub mod config;
pub mod controls;
pub mod intersect;
pub mod loader;
pub mod mesh;
pub mod picking;
pub mod raster;
pub mod spherical;

use anyhow::{bail, Result};
use body::Body;
use camera::Camera;
use config::ViewerConfig;
use controls::{Command, OrbitController, Outcome};
use glam::Vec2;
use loader::Catalog;
use mesh::generate_uv_sphere;
use picking::{pick, PickReport};
use raster::{pointer_segment, Frame, TerminalRenderer};
use std::time::{Duration, Instant};

const POINTER_GLYPH: char = '+';
const FRAME_TIME_INTERVAL: Duration = Duration::from_secs(1);

/// Throttles frame-time reports to one per interval.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    interval: Duration,
    last_report: Option<Instant>,
}

impl FrameTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_report: None,
        }
    }

    /// Records a frame that ended at `now` and took `elapsed`. Returns the
    /// frame time in milliseconds when a report is due.
    pub fn record(&mut self, now: Instant, elapsed: Duration) -> Option<f32> {
        let due = self
            .last_report
            .map_or(true, |last| now.duration_since(last) >= self.interval);
        if !due {
            return None;
        }
        self.last_report = Some(now);
        Some(elapsed.as_secs_f32() * 1000.0)
    }
}

/// Ties the catalog, the orbit controller and the terminal renderer together.
pub struct Viewer {
    bodies: Vec<Body>,
    controller: OrbitController,
    renderer: TerminalRenderer,
    pointer: Option<Vec2>,
    frame_timer: FrameTimer,
}

impl Viewer {
    pub fn new(config: &ViewerConfig, mut catalog: Catalog) -> Result<Self> {
        config.validate()?;
        catalog.scale_radii(config.radius_scale);

        let mesh = generate_uv_sphere(config.parallel_count, config.meridian_count);
        log::info!(
            "Sphere mesh: {} vertices, {} triangles ({} vertex bytes, {} index bytes)",
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.vertex_bytes().len(),
            mesh.index_bytes().len()
        );

        let mut controller = OrbitController::new(config);
        controller.set_viewport(config.columns, config.rows);
        if !catalog.is_empty() && !controller.focus(config.initial_focus, &catalog.bodies) {
            bail!("Cannot focus body {}", config.initial_focus);
        }

        Ok(Self {
            bodies: catalog.bodies,
            controller,
            renderer: TerminalRenderer::new(config.columns, config.rows, mesh),
            pointer: None,
            frame_timer: FrameTimer::new(FRAME_TIME_INTERVAL),
        })
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut OrbitController {
        &mut self.controller
    }

    pub fn camera(&self) -> Camera {
        self.controller.camera()
    }

    pub fn focus(&mut self, index: usize) -> bool {
        self.controller.focus(index, &self.bodies)
    }

    /// Screen point drawn as the pointer and traced when tracing is on.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    pub fn render(&mut self) -> Frame {
        let start = Instant::now();
        self.controller.follow(&self.bodies);
        self.renderer.set_wireframe(self.controller.wireframe());
        let camera = self.camera();
        let mut frame = self.renderer.render(&camera, &self.bodies);

        if let Some(pointer) = self.pointer {
            frame.mark(pointer, POINTER_GLYPH);
            if self.controller.trace_pointer() {
                let direction = camera.world_direction_from_screen(pointer);
                let (from, to) =
                    pointer_segment(&camera, direction, self.controller.params().near_distance);
                log::debug!("Pointer ray {:?} -> {:?}", from, to);
            }
        }

        if self.controller.print_frame_time() {
            if let Some(ms) = self.frame_timer.record(Instant::now(), start.elapsed()) {
                log::info!("Frame {:.2} ms, {} cells covered", ms, frame.covered_cells());
            }
        }
        frame
    }

    pub fn pick(&self, screen_point: Vec2) -> PickReport {
        let report = pick(&self.camera(), screen_point, &self.bodies);
        match report.picked(&self.bodies) {
            Some(body) => log::info!("Picked '{}'", body.name),
            None => log::info!("Picked nothing at {:?}", screen_point),
        }
        report
    }

    /// Applies a command. Picks also move the pointer.
    pub fn handle(&mut self, command: Command) -> (Outcome, Option<PickReport>) {
        let outcome = self.controller.apply(command, &self.bodies);
        let report = match outcome {
            Outcome::Pick(point) => {
                self.pointer = Some(point);
                self.controller.follow(&self.bodies);
                Some(self.pick(point))
            }
            _ => None,
        };
        (outcome, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timer_reports_once_per_interval() {
        let mut timer = FrameTimer::new(Duration::from_secs(1));
        let start = Instant::now();
        let frame = Duration::from_millis(16);

        assert!(timer.record(start, frame).is_some());
        assert_eq!(timer.record(start + Duration::from_millis(500), frame), None);
        let ms = timer.record(start + Duration::from_millis(1200), frame);
        assert!((ms.unwrap() - 16.0).abs() < 1e-3);
        assert_eq!(timer.record(start + Duration::from_millis(1900), frame), None);
    }
}

//! Orbit controller: turns viewer commands into camera parameter updates.
//!
//! Pitch is clamped here and only here, so every `CameraParams` that leaves
//! the controller keeps the orbit off the poles.

use crate::body::Body;
use crate::camera::{screen_point_from_pixel, Camera, CameraParams};
use crate::config::ViewerConfig;
use crate::raster::terminal_aspect_ratio;
use anyhow::{anyhow, bail, Result};
use glam::Vec2;
use std::str::FromStr;

const MIN_DISTANCE_MARGIN: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    /// Moves the eye away from the focus.
    Farther,
    /// Moves the eye toward the focus.
    Closer,
    Focus(usize),
    /// Normalized screen point, origin bottom-left.
    Pick(Vec2),
    /// Viewport cell, origin top-left.
    Click { column: usize, row: usize },
    TogglePointerTrace,
    ToggleWireframe,
    ToggleFrameTime,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let Some(head) = tokens.next() else {
            bail!("Empty command");
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "left" | "yaw-" => Command::YawLeft,
            "right" | "yaw+" => Command::YawRight,
            "up" | "pitch+" => Command::PitchUp,
            "down" | "pitch-" => Command::PitchDown,
            "+" | "farther" | "zoom+" => Command::Farther,
            "-" | "closer" | "zoom-" => Command::Closer,
            "trace" => Command::TogglePointerTrace,
            "w" | "wireframe" => Command::ToggleWireframe,
            "t" | "time" => Command::ToggleFrameTime,
            "q" | "quit" | "exit" | "esc" => Command::Quit,
            "focus" => {
                let index = tokens
                    .next()
                    .ok_or_else(|| anyhow!("focus needs a body index"))?;
                Command::Focus(parse_index(index)?)
            }
            "click" => {
                let column = parse_cell(tokens.next())?;
                let row = parse_cell(tokens.next())?;
                Command::Click { column, row }
            }
            "pick" => {
                let x = parse_coordinate(tokens.next())?;
                let y = parse_coordinate(tokens.next())?;
                Command::Pick(Vec2::new(x, y))
            }
            digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                Command::Focus(parse_index(digit)?)
            }
            other => bail!("Unknown command '{}'", other),
        };

        if let Some(extra) = tokens.next() {
            bail!("Unexpected argument '{}' after '{}'", extra, head);
        }
        Ok(command)
    }
}

fn parse_index(text: &str) -> Result<usize> {
    text.parse()
        .map_err(|_| anyhow!("Expected a body index, got '{}'", text))
}

fn parse_cell(token: Option<&str>) -> Result<usize> {
    let text = token.ok_or_else(|| anyhow!("click needs a column and a row"))?;
    text.parse()
        .map_err(|_| anyhow!("Expected a cell coordinate, got '{}'", text))
}

fn parse_coordinate(token: Option<&str>) -> Result<f32> {
    let text = token.ok_or_else(|| anyhow!("pick needs two coordinates"))?;
    let value: f32 = text
        .parse()
        .map_err(|_| anyhow!("Expected a screen coordinate, got '{}'", text))?;
    if !(0.0..=1.0).contains(&value) {
        bail!("Screen coordinate {} is outside [0, 1]", value);
    }
    Ok(value)
}

/// What the frame loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Redraw,
    Pick(Vec2),
    Quit,
}

pub struct OrbitController {
    params: CameraParams,
    viewport: (usize, usize),
    focused: Option<usize>,
    angle_step: f32,
    distance_step: f32,
    pitch_epsilon: f32,
    focus_distance_factor: f32,
    near_factor: f32,
    trace_pointer: bool,
    wireframe: bool,
    print_frame_time: bool,
}

impl OrbitController {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut controller = Self {
            params: config.initial_camera_params(),
            viewport: (config.columns, config.rows),
            focused: None,
            angle_step: config.angle_step_degrees.to_radians(),
            distance_step: config.distance_step,
            pitch_epsilon: config.pitch_epsilon,
            focus_distance_factor: config.focus_distance_factor,
            near_factor: config.near_factor,
            trace_pointer: config.trace_pointer,
            wireframe: config.wireframe,
            print_frame_time: config.print_frame_time,
        };
        controller.params.clamp_pitch(controller.pitch_epsilon);
        controller
    }

    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    pub fn camera(&self) -> Camera {
        self.params.make_camera()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn trace_pointer(&self) -> bool {
        self.trace_pointer
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn print_frame_time(&self) -> bool {
        self.print_frame_time
    }

    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.params.orientation = Vec2::new(yaw, pitch);
        self.params.clamp_pitch(self.pitch_epsilon);
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.params.orientation += Vec2::new(delta_yaw, delta_pitch);
        self.params.clamp_pitch(self.pitch_epsilon);
    }

    pub fn zoom(&mut self, delta: f32) {
        let min_distance = self.params.near_distance + MIN_DISTANCE_MARGIN;
        self.params.distance = (self.params.distance + delta).max(min_distance);
        log::debug!("Camera distance: {}", self.params.distance);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.params.aspect_ratio = aspect_ratio;
    }

    /// Resizes the viewport in cells and matches the aspect ratio to it.
    pub fn set_viewport(&mut self, columns: usize, rows: usize) {
        self.viewport = (columns, rows);
        self.set_aspect_ratio(terminal_aspect_ratio(columns, rows));
    }

    pub fn viewport(&self) -> (usize, usize) {
        self.viewport
    }

    /// Normalized screen point at the centre of a viewport cell, or `None`
    /// when the cell lies outside the viewport.
    pub fn cell_to_screen(&self, column: usize, row: usize) -> Option<Vec2> {
        let (columns, rows) = self.viewport;
        if column >= columns || row >= rows {
            return None;
        }
        Some(screen_point_from_pixel(
            column as f32 + 0.5,
            row as f32 + 0.5,
            columns as f32,
            rows as f32,
        ))
    }

    /// Frames the body at `index`. Returns false and leaves the camera alone
    /// when the index is out of range or the body has no positive radius.
    pub fn focus(&mut self, index: usize, bodies: &[Body]) -> bool {
        let Some(body) = bodies.get(index) else {
            log::warn!("No body {} to focus (catalog has {})", index, bodies.len());
            return false;
        };
        if !body.is_pickable() {
            log::warn!("Body {} '{}' has no positive radius", index, body.name);
            return false;
        }

        self.focused = Some(index);
        self.params.focus = body.position;
        self.params.distance = self.focus_distance_factor * body.radius;
        self.params.near_distance = self.near_factor * body.radius;
        log::info!("Focus {} '{}'", index, body.name);
        true
    }

    /// Re-centres on the focused body's current position.
    pub fn follow(&mut self, bodies: &[Body]) {
        if let Some(body) = self.focused.and_then(|index| bodies.get(index)) {
            self.params.focus = body.position;
        }
    }

    pub fn apply(&mut self, command: Command, bodies: &[Body]) -> Outcome {
        match command {
            Command::YawLeft => self.rotate(-self.angle_step, 0.0),
            Command::YawRight => self.rotate(self.angle_step, 0.0),
            Command::PitchUp => self.rotate(0.0, self.angle_step),
            Command::PitchDown => self.rotate(0.0, -self.angle_step),
            Command::Farther => self.zoom(self.distance_step),
            Command::Closer => self.zoom(-self.distance_step),
            Command::Focus(index) => {
                self.focus(index, bodies);
            }
            Command::TogglePointerTrace => self.trace_pointer = !self.trace_pointer,
            Command::ToggleWireframe => self.wireframe = !self.wireframe,
            Command::ToggleFrameTime => self.print_frame_time = !self.print_frame_time,
            Command::Pick(point) => return Outcome::Pick(point),
            Command::Click { column, row } => match self.cell_to_screen(column, row) {
                Some(point) => return Outcome::Pick(point),
                None => log::warn!(
                    "Cell ({}, {}) is outside the {}x{} viewport",
                    column,
                    row,
                    self.viewport.0,
                    self.viewport.1
                ),
            },
            Command::Quit => return Outcome::Quit,
        }
        Outcome::Redraw
    }
}

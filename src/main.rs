//! Terminal planetarium.
//!
//! Loads a body catalog, orbits a camera around the focused body, renders
//! the scene as shaded glyphs and resolves picks under a screen point.
//!
//! # Interactive commands (one per line on stdin)
//! - `left` / `right` / `up` / `down`: orbit by the angle step
//! - `+` / `-`: move the eye farther / closer
//! - `0`..`9` or `focus N`: focus a body
//! - `pick X Y`: pick at a normalized screen point (origin bottom-left)
//! - `click COL ROW`: pick at a viewport cell (origin top-left)
//! - `w`: toggle wireframe
//! - `t`: toggle frame time reports (at most one per second)
//! - `trace`: toggle pointer ray tracing in the debug log
//! - `q` / `quit`: exit

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use glam::{Vec2, Vec3};
use ptarium::{
    body::Body,
    config::ViewerConfig,
    controls::{Command, Outcome},
    loader::{Catalog, CatalogLoader},
    picking::PickReport,
    raster::Frame,
    Viewer,
};
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ptarium")]
#[command(about = "Terminal planetarium with orbit camera and ray picking")]
struct Args {
    /// CSV catalog: name, radius, mass, px, py, pz, vx, vy, vz[, r, g, b]
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Index of the body to focus at startup
    #[arg(long, default_value = "0")]
    focus: usize,

    /// Orbit yaw in degrees
    #[arg(long, default_value = "0")]
    yaw: f32,

    /// Orbit pitch in degrees, measured from +Y
    #[arg(long, default_value = "90")]
    pitch: f32,

    /// Vertical field of view in degrees
    #[arg(long, default_value = "80")]
    fov: f32,

    /// Viewport width in characters
    #[arg(long, default_value = "100")]
    columns: usize,

    /// Viewport height in characters
    #[arg(long, default_value = "40")]
    rows: usize,

    /// Multiplier applied to every catalog radius
    #[arg(long, default_value = "100")]
    radius_scale: f32,

    /// Parallels and meridians of the sphere mesh
    #[arg(long, default_value = "20")]
    resolution: u32,

    /// Pick at a normalized screen point, e.g. 0.5,0.5
    #[arg(long, value_parser = parse_screen_point)]
    pick: Option<Vec2>,

    /// Read commands from stdin after the first frame
    #[arg(long)]
    interactive: bool,

    /// Emit 24-bit ANSI colors
    #[arg(long)]
    color: bool,

    /// Log the pointer ray every frame (RUST_LOG=debug)
    #[arg(long)]
    trace_pointer: bool,

    /// Draw triangle edges only
    #[arg(long)]
    wireframe: bool,

    /// Report frame time once per second (RUST_LOG=info)
    #[arg(long)]
    frame_time: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args);
    let catalog = load_catalog(&args)?;
    let mut viewer = Viewer::new(&config, catalog)?;

    viewer
        .controller_mut()
        .set_orientation(args.yaw.to_radians(), args.pitch.to_radians());

    if let Some(point) = args.pick {
        viewer.set_pointer(Some(point));
        let report = viewer.pick(point);
        print_frame(&viewer.render(), args.color);
        print_pick(&report, viewer.bodies());
    } else {
        print_frame(&viewer.render(), args.color);
    }

    if args.interactive {
        run_interactive(&mut viewer, args.color)?;
    }
    Ok(())
}

fn build_config(args: &Args) -> ViewerConfig {
    ViewerConfig {
        fov_y_degrees: args.fov,
        columns: args.columns,
        rows: args.rows,
        radius_scale: args.radius_scale,
        parallel_count: args.resolution,
        meridian_count: args.resolution,
        trace_pointer: args.trace_pointer,
        wireframe: args.wireframe,
        print_frame_time: args.frame_time,
        initial_focus: args.focus,
        ..ViewerConfig::default()
    }
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    match &args.catalog {
        Some(path) => {
            let catalog = CatalogLoader::load(path)?;
            if catalog.is_empty() {
                log::warn!("Catalog {} has no usable bodies", path.display());
            }
            Ok(catalog)
        }
        None => {
            println!("No catalog given, using demo scene.");
            Ok(create_demo_catalog())
        }
    }
}

fn create_demo_catalog() -> Catalog {
    Catalog {
        bodies: vec![
            Body::new("Sun", 6.96, 1989.0, Vec3::ZERO).with_color([1.0, 0.85, 0.3]),
            Body::new("Earth", 0.064, 0.006, Vec3::new(1496.0, 0.0, 0.0))
                .with_velocity(Vec3::new(0.0, 0.0, 0.3))
                .with_color([0.3, 0.5, 1.0]),
            Body::new("Moon", 0.017, 0.0001, Vec3::new(1496.0, 0.0, 20.0))
                .with_color([0.6, 0.6, 0.6]),
        ],
        skipped: Vec::new(),
    }
}

fn parse_screen_point(text: &str) -> Result<Vec2> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected X,Y, got '{}'", text))?;
    let x: f32 = x.trim().parse().context("Invalid X coordinate")?;
    let y: f32 = y.trim().parse().context("Invalid Y coordinate")?;
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(anyhow!("Screen point {},{} is outside [0, 1]", x, y));
    }
    Ok(Vec2::new(x, y))
}

fn run_interactive(viewer: &mut Viewer, color: bool) -> Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let (outcome, report) = viewer.handle(command);
        if outcome == Outcome::Quit {
            break;
        }

        print_frame(&viewer.render(), color);
        if let Some(report) = report {
            print_pick(&report, viewer.bodies());
        }
    }
    Ok(())
}

fn print_frame(frame: &Frame, color: bool) {
    if color {
        print!("{}", frame.to_ansi_string());
    } else {
        print!("{}", frame.to_plain_string());
    }
}

fn print_pick(report: &PickReport, bodies: &[Body]) {
    match report.picked(bodies) {
        Some(body) => println!("Picked: {}", body.name),
        None => println!("Picked: nothing"),
    }
}

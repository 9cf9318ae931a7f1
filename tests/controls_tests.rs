use approx::assert_abs_diff_eq;
use glam::{Vec2, Vec3};
use ptarium::body::Body;
use ptarium::config::ViewerConfig;
use ptarium::controls::{Command, OrbitController, Outcome};
use std::f32::consts::PI;

fn bodies() -> Vec<Body> {
    vec![
        Body::new("Sun", 10.0, 1000.0, Vec3::ZERO),
        Body::new("Planet", 2.0, 1.0, Vec3::new(100.0, 0.0, 0.0)),
        Body::new("Dust", 0.0, 0.0, Vec3::new(0.0, 50.0, 0.0)),
    ]
}

#[test]
fn test_pitch_never_reaches_pole() {
    let config = ViewerConfig::default();
    let mut controller = OrbitController::new(&config);
    let bodies = bodies();

    for _ in 0..100 {
        controller.apply(Command::PitchUp, &bodies);
    }
    let pitch = controller.params().pitch();
    assert!(pitch < PI, "pitch {} reached the south pole", pitch);
    assert_abs_diff_eq!(pitch, PI - config.pitch_epsilon, epsilon = 1e-6);
    assert!(controller.camera().view_projection_matrix.is_finite());

    for _ in 0..200 {
        controller.apply(Command::PitchDown, &bodies);
    }
    let pitch = controller.params().pitch();
    assert!(pitch > 0.0);
    assert!(controller.camera().look_vector.is_finite());
}

#[test]
fn test_yaw_steps() {
    let config = ViewerConfig::default();
    let mut controller = OrbitController::new(&config);
    let start = controller.params().yaw();

    controller.apply(Command::YawRight, &[]);
    controller.apply(Command::YawRight, &[]);
    controller.apply(Command::YawLeft, &[]);
    assert_abs_diff_eq!(
        controller.params().yaw(),
        start + config.angle_step_degrees.to_radians(),
        epsilon = 1e-6
    );
}

#[test]
fn test_set_orientation_clamps() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    controller.set_orientation(1.0, 0.0);
    assert!(controller.params().pitch() > 0.0);
    assert_eq!(controller.params().yaw(), 1.0);
}

#[test]
fn test_focus_frames_body() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    let bodies = bodies();

    assert_eq!(controller.apply(Command::Focus(1), &bodies), Outcome::Redraw);
    assert_eq!(controller.focused(), Some(1));

    let params = controller.params();
    assert_eq!(params.focus, Vec3::new(100.0, 0.0, 0.0));
    assert_abs_diff_eq!(params.distance, 4.0);
    assert_abs_diff_eq!(params.near_distance, 1.8, epsilon = 1e-6);

    let camera = controller.camera();
    assert_abs_diff_eq!((camera.position - params.focus).length(), 4.0, epsilon = 1e-4);
}

#[test]
fn test_invalid_focus_is_ignored() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    let bodies = bodies();
    let before = *controller.params();

    assert!(!controller.focus(7, &bodies));
    assert!(!controller.focus(2, &bodies)); // zero radius
    assert_eq!(controller.focused(), None);
    assert_eq!(*controller.params(), before);
}

#[test]
fn test_zoom_stops_before_near_plane() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    let bodies = bodies();
    controller.focus(1, &bodies);

    for _ in 0..10 {
        controller.apply(Command::Closer, &bodies);
    }
    let params = *controller.params();
    assert!(params.distance > params.near_distance);

    controller.apply(Command::Farther, &bodies);
    assert!(controller.params().distance > params.near_distance + 0.5);
}

#[test]
fn test_follow_tracks_moving_body() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    let mut bodies = bodies();
    controller.focus(1, &bodies);
    controller.apply(Command::Farther, &bodies);
    let distance = controller.params().distance;

    bodies[1].position = Vec3::new(120.0, 5.0, 0.0);
    controller.follow(&bodies);
    assert_eq!(controller.params().focus, Vec3::new(120.0, 5.0, 0.0));
    assert_eq!(controller.params().distance, distance);
}

#[test]
fn test_pick_and_quit_outcomes() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    let point = Vec2::new(0.2, 0.9);
    assert_eq!(controller.apply(Command::Pick(point), &[]), Outcome::Pick(point));
    assert_eq!(controller.apply(Command::Quit, &[]), Outcome::Quit);
}

#[test]
fn test_click_maps_cells_to_screen() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    controller.set_viewport(10, 4);
    assert_abs_diff_eq!(controller.params().aspect_ratio, 1.25);

    let outcome = controller.apply(Command::Click { column: 0, row: 0 }, &[]);
    assert_eq!(outcome, Outcome::Pick(Vec2::new(0.05, 0.875)));

    let outcome = controller.apply(Command::Click { column: 9, row: 3 }, &[]);
    match outcome {
        Outcome::Pick(point) => assert!(point.abs_diff_eq(Vec2::new(0.95, 0.125), 1e-6)),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_toggle_trace() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    assert!(!controller.trace_pointer());
    controller.apply("trace".parse().unwrap(), &[]);
    assert!(controller.trace_pointer());
}

#[test]
fn test_click_outside_viewport_is_ignored() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    controller.set_viewport(10, 4);

    assert_eq!(controller.cell_to_screen(10, 0), None);
    assert_eq!(controller.cell_to_screen(0, 4), None);
    assert_eq!(
        controller.apply(Command::Click { column: 500, row: 500 }, &[]),
        Outcome::Redraw
    );
    assert_eq!(
        controller.apply(Command::Click { column: 9, row: 4 }, &[]),
        Outcome::Redraw
    );
    assert!(matches!(
        controller.apply(Command::Click { column: 9, row: 3 }, &[]),
        Outcome::Pick(_)
    ));
}

#[test]
fn test_wireframe_and_frame_time_toggle_independently() {
    let mut controller = OrbitController::new(&ViewerConfig::default());
    assert!(!controller.wireframe());
    assert!(!controller.print_frame_time());

    controller.apply(Command::ToggleWireframe, &[]);
    assert!(controller.wireframe());
    assert!(!controller.print_frame_time());
    assert!(!controller.trace_pointer());

    controller.apply("t".parse().unwrap(), &[]);
    assert!(controller.print_frame_time());
    assert!(!controller.trace_pointer());

    controller.apply(Command::ToggleWireframe, &[]);
    assert!(!controller.wireframe());
    assert!(controller.print_frame_time());
}

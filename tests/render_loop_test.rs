use approx::assert_relative_eq;
use ripple_ngin::{
    Duration, LoopState, LoopToken, Session, advance,
    clock::Clock,
    config::{Config, OrbitSettings},
    demos::{self, waves::Waves},
    Demo,
};

use crate::common::test_utils::Counting;

mod common;

#[test]
fn tick_hands_elapsed_time_to_the_demo() {
    let mut demo = Counting::default();
    let mut session = Session::new(&demo.config(), 800, 600);
    session.clock = Clock::frozen_at(Duration::from_millis(1500));

    assert_eq!(advance(&mut session, &mut demo), LoopState::Running);
    assert_eq!(advance(&mut session, &mut demo), LoopState::Running);
    assert_eq!(demo.updates, 2);
    assert_eq!(demo.last_elapsed, Some(Duration::from_millis(1500)));
}

#[test]
fn cancelled_loop_stops_without_updating() {
    let token = LoopToken::new();
    let mut demo = Counting::default();
    let mut session = Session::with_token(&demo.config(), 800, 600, token.clone());

    assert_eq!(advance(&mut session, &mut demo), LoopState::Running);
    token.cancel();
    assert_eq!(advance(&mut session, &mut demo), LoopState::Stopped);
    assert_eq!(advance(&mut session, &mut demo), LoopState::Stopped);
    assert_eq!(demo.updates, 1);
}

#[test]
fn initial_viewport_sets_aspect() {
    let session = Session::new(&Config::default(), 800, 600);
    assert_relative_eq!(session.projection.aspect, 1.333_333, epsilon = 1e-5);
    assert_eq!(session.projection.aspect, 800.0 / 600.0);
}

#[test]
fn resize_is_exact() {
    let mut session = Session::new(&Config::default(), 800, 600);
    for (w, h) in [(1920, 1080), (333, 777), (1, 1)] {
        assert!(session.resize(w, h));
        assert_eq!(session.projection.aspect, w as f32 / h as f32);
        assert_eq!((session.viewport.width, session.viewport.height), (w, h));
    }
}

#[test]
fn damped_orbit_settles_between_ticks() {
    let config = Config {
        orbit_controls: Some(OrbitSettings {
            damping: Some(0.05),
            ..OrbitSettings::default()
        }),
        ..Config::default()
    };
    let mut demo = Counting::new(config.clone());
    let mut session = Session::new(&config, 800, 600);
    let start = session.camera.position;
    let distance = |p: ripple_ngin::Point3<f32>| (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();

    session.orbit.as_mut().unwrap().rotate(200.0, 0.0);
    advance(&mut session, &mut demo);
    let first = session.camera.position;
    advance(&mut session, &mut demo);
    let second = session.camera.position;

    assert_ne!(first, start);
    // inertia keeps the camera moving on the next tick
    assert_ne!(second, first);
    // orbiting never changes the distance to the target
    assert_relative_eq!(distance(second), distance(start), epsilon = 1e-4);
}

#[test]
fn wave_frequency_at_its_maximum() {
    let mut demo = Waves::new();
    let binding = demo.controls().unwrap();
    assert_eq!(binding.panel.set(binding.uniforms, "frequency x", 10.0).unwrap(), 10.0);
    assert_eq!(binding.panel.set(binding.uniforms, "frequency x", 12.5).unwrap(), 10.0);
    assert_eq!(demo.uniforms().vec2("frequency").unwrap()[0], 10.0);
}

#[test]
fn colour_control_reencodes_hex() {
    let mut demo = Waves::new();
    let binding = demo.controls().unwrap();
    binding
        .panel
        .set_hex(binding.uniforms, "surface colour", "#ffffff")
        .unwrap();
    assert_eq!(
        demo.uniforms().color("surface_color").unwrap().to_hex(),
        "#ffffff"
    );
}

#[test]
fn every_demo_builds_a_session() {
    for name in demos::NAMES {
        let demo = demos::by_name(name).unwrap();
        let session = Session::new(&demo.config(), 640, 480);
        assert_eq!(session.projection.aspect, 640.0 / 480.0, "{name}");
    }
}

use std::time::{Duration, Instant};

use skyburst::fireworks::{BurstSettings, Density, FireworkBox, PathLibrary, Shape, Vector};
use skyburst::{Options, start, stop};

fn launch_and_burst(shape: Shape, density: Density) -> (Vector, usize) {
    let settings = BurstSettings {
        density,
        ..BurstSettings::default()
    };
    let rng = fastrand::Rng::with_seed(42);
    let mut fireworks = FireworkBox::new(200.0, 400.0, shape, settings, rng);
    fireworks.start_new_firework(Some(Vector::new(150.0, 50.0)));

    let shell = &fireworks.fireworks()[0];
    let launch = shell.particles()[0].velocity;

    let mut ticks = 0;
    while !fireworks.fireworks()[0].exploded() {
        fireworks.step();
        ticks += 1;
        assert!(ticks < 500, "shell never burst");
    }
    (launch, fireworks.fireworks()[0].particles().len())
}

#[test]
fn test_targeted_launch_is_deterministic() {
    let (launch, _) = launch_and_burst(Shape::Normal, Density::Standard);
    assert!((launch.x - 50.0 / 120.0).abs() < 1e-12);
    assert!((launch.y + 7.0).abs() < 1e-9);
}

#[test]
fn test_burst_sizes() {
    assert_eq!(launch_and_burst(Shape::Normal, Density::Standard).1, 180);
    assert_eq!(launch_and_burst(Shape::Normal, Density::Dense).1, 360);
    assert_eq!(launch_and_burst(Shape::Heart, Density::Standard).1, 180);
    assert_eq!(launch_and_burst(Shape::Circle, Density::Standard).1, 180);
    assert_eq!(launch_and_burst(Shape::Donut, Density::Standard).1, 360);
    assert_eq!(launch_and_burst(Shape::Eagle, Density::Standard).1, 180);
}

#[test]
fn test_display_never_exceeds_cap() {
    let options = Options {
        frequency: 10,
        max_fireworks: 3,
        seed: Some(8),
        ..Options::default()
    };
    let mut display = start(320.0, 400.0, options, PathLibrary::with_builtins()).unwrap();

    // Ten simulated seconds at 60 frames per second
    let t0 = Instant::now();
    for frame in 0..600u64 {
        display.tick(t0 + Duration::from_millis(frame * 1000 / 60));
        assert!(display.fireworks().count() <= 3);
    }

    let stats = stop(display);
    assert_eq!(stats.peak_count, 3);
    assert!(stats.ignitions > 3);
}

#[test]
fn test_seeded_displays_match_and_stay_independent() {
    let options = Options {
        shape: Shape::Random,
        seed: Some(99),
        ..Options::default()
    };
    let mut a = start(320.0, 400.0, options.clone(), PathLibrary::with_builtins()).unwrap();
    let mut b = start(320.0, 400.0, options, PathLibrary::with_builtins()).unwrap();

    let t0 = Instant::now();
    for frame in 0..300u64 {
        let now = t0 + Duration::from_millis(frame * 1000 / 60);
        a.tick(now);
        b.tick(now);
    }
    let shapes = |d: &skyburst::Display| {
        d.fireworks()
            .fireworks()
            .iter()
            .map(|f| (f.burst_shape(), f.particles().len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shapes(&a), shapes(&b));

    // Driving one display leaves the other untouched
    let before = b.fireworks().count();
    for frame in 300..400u64 {
        a.tick(t0 + Duration::from_millis(frame * 1000 / 60));
    }
    assert_eq!(b.fireworks().count(), before);
}

#[test]
fn test_unknown_custom_path_falls_back_to_normal() {
    let options = Options {
        shape: Shape::CustomPath,
        path_reference: Some("nowhere".to_string()),
        seed: Some(3),
        ..Options::default()
    };
    let mut display = start(320.0, 400.0, options, PathLibrary::new()).unwrap();
    display.launch_at(Vector::new(160.0, 120.0));
    let t0 = Instant::now();
    let mut frame = 0u64;
    while !display.fireworks().fireworks()[0].exploded() {
        display.tick(t0 + Duration::from_millis(frame * 1000 / 60));
        frame += 1;
        assert!(frame < 500);
    }
    let firework = &display.fireworks().fireworks()[0];
    assert_eq!(firework.burst_shape(), Some(Shape::Normal));
    assert_eq!(firework.particles().len(), 180);
}

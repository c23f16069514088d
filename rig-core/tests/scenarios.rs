use glam::Vec2;
use rig_core::{
    ControlInput, Outcome, Pose2D, Rig, RigConfig, Simulation,
    collision::{ParkingZone, WorldBounds, inside_zone},
    level::{Level, ParkingTarget},
    phases::parking_phase,
};
use std::f32::consts::PI;

const BRAKE: ControlInput = ControlInput {
    accelerate: false,
    brake: true,
    steer_left: false,
    steer_right: false,
};

const GAS: ControlInput = ControlInput {
    accelerate: true,
    brake: false,
    steer_left: false,
    steer_right: false,
};

fn is_axis_aligned(corners: &[Vec2; 4]) -> bool {
    (0..4).all(|i| {
        let edge = corners[(i + 1) % 4] - corners[i];
        edge.x.abs() < 1e-3 || edge.y.abs() < 1e-3
    })
}

#[test]
fn straight_reverse_stays_on_one_axis() {
    let mut rig = Rig::new(Pose2D::new(600.0, 600.0, PI), &RigConfig::default());
    let mut last_y = rig.tractor().pose.y;

    for _ in 0..200 {
        rig.update(BRAKE);
        let snap = rig.snapshot();

        assert_eq!(snap.tractor.steering_angle, 0.0);
        assert_eq!(snap.tractor.heading, PI);
        assert!((snap.tractor.x - 600.0).abs() < 1e-2);
        assert!(snap.tractor.y <= last_y, "reverse should move toward -Y");
        last_y = snap.tractor.y;

        assert!(is_axis_aligned(&snap.tractor_corners));
        assert!(is_axis_aligned(&snap.trailer_corners));
        assert!((snap.trailer.x - 600.0).abs() < 1e-2);
    }

    // Capped at 60% of max speed in reverse.
    let max = rig.tractor().tuning.max_speed;
    assert!((rig.speed() + 0.6 * max).abs() < 1e-5);
    assert!(last_y < 600.0 - 300.0);
}

#[test]
fn steering_right_clamps_exactly_at_max() {
    let mut rig = Rig::new(Pose2D::new(600.0, 400.0, 0.0), &RigConfig::default());
    let max = rig.tractor().tuning.max_steering_angle;
    let right = ControlInput {
        steer_right: true,
        ..ControlInput::IDLE
    };

    for _ in 0..200 {
        rig.update(right);
        assert!(rig.tractor().steering_angle <= max);
    }
    assert_eq!(rig.tractor().steering_angle, max);
}

#[test]
fn held_brake_at_lock_keeps_speed_at_zero_until_accelerate() {
    let mut rig = Rig::new(Pose2D::new(600.0, 400.0, 0.0), &RigConfig::default());
    let reverse_right = ControlInput {
        brake: true,
        steer_right: true,
        ..ControlInput::IDLE
    };

    let mut ticks = 0;
    while !rig.is_jackknifed() {
        rig.update(reverse_right);
        ticks += 1;
        assert!(ticks < 2000, "reversing with full lock never jackknifed");
    }
    assert!(rig.speed() <= 0.0);

    for _ in 0..300 {
        rig.update(BRAKE);
        assert_eq!(rig.speed(), 0.0);
    }

    // Pulling forward is always allowed and eventually straightens the rig.
    rig.update(GAS);
    assert!(rig.speed() > 0.0);
    for _ in 0..400 {
        rig.update(GAS);
    }
    assert!(!rig.is_jackknifed());
}

#[test]
fn rig_at_rest_stays_put() {
    let mut rig = Rig::new(Pose2D::new(300.0, 300.0, 1.1), &RigConfig::default());
    let tractor = rig.tractor().pose;
    let trailer = rig.trailer().pose;

    for _ in 0..500 {
        rig.update(ControlInput::IDLE);
    }

    assert_eq!(rig.tractor().pose, tractor);
    assert_eq!(rig.speed(), 0.0);
    assert_eq!(rig.tractor().steering_angle, 0.0);
    assert!((rig.trailer().pose.position() - trailer.position()).length() < 1e-3);
    assert!((rig.trailer().pose.heading - trailer.heading).abs() < 1e-4);
}

fn dock_level() -> Level {
    Level {
        name: "First Delivery".into(),
        description: "Back the trailer into the zone".into(),
        start: Pose2D::new(600.0, 600.0, PI),
        parking_target: ParkingTarget::Trailer,
        parking_zone: ParkingZone {
            x: 572.0,
            y: 50.0,
            width: 56.0,
            height: 170.0,
            angle: 0.0,
        },
        obstacles: Vec::new(),
        bounds: WorldBounds::new(1200.0, 800.0),
    }
}

#[test]
fn parking_requires_every_corner_and_low_speed() {
    let cfg = RigConfig::default();
    let level = dock_level();

    // Seat the trailer in the middle of the zone: centre (600, 135).
    // Its hitch sits link_length below, the tractor hitch_offset beyond that.
    let probe = Rig::new(level.start, &cfg);
    let link = probe.trailer().link_length();
    let hitch_offset = probe.tractor().tuning.hitch_offset;
    let rig = Rig::new(Pose2D::new(600.0, 135.0 + link + hitch_offset, PI), &cfg);

    let corners = rig.trailer_corners();
    assert!(inside_zone(&corners, &level.parking_zone));
    assert!(parking_phase(&rig, &level, &cfg.handling));

    // Push a single corner just past the zone's right edge.
    let mut nudged = corners;
    nudged[1].x = 629.0;
    assert!(!inside_zone(&nudged, &level.parking_zone));

    // Still inside, but rolling too fast to count.
    let mut moving = rig.clone();
    for _ in 0..10 {
        moving.update(GAS);
    }
    assert!(moving.speed() > cfg.handling.parked_speed_limit);
    assert!(inside_zone(&moving.trailer_corners(), &level.parking_zone));
    assert!(!parking_phase(&moving, &level, &cfg.handling));

    // Through the simulation the first crawl tick already parks, and the
    // outcome then holds until restart.
    let start = rig.tractor().pose;
    let mut sim = Simulation::new(Level { start, ..level }, &cfg);
    let report = sim.step(GAS);
    assert_eq!(report.tick, 1);
    assert_eq!(report.outcome, Outcome::Parked);
    assert_eq!(sim.step(GAS), report);

    sim.restart();
    assert_eq!(sim.outcome(), Outcome::Driving);
}

#[test]
fn simulation_reset_accepts_any_finite_heading() {
    let cfg = RigConfig::default();
    let mut sim = Simulation::new(dock_level(), &cfg);

    for heading in [2.0e8, -7.5e9, 1.0e30] {
        sim.reset(600.0, 500.0, heading);
        let report = sim.step(GAS);
        let h = report.rig.tractor.heading;
        assert!(h > -PI && h <= PI, "reset({heading}) gave heading {h}");
        assert!(report.rig.jackknife_angle.abs() < 1e-3);
    }
}

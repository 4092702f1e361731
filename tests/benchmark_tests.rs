//! Performance benchmarks for critical synchronization paths

use client::game::ViewState;
use server::registry::PlayerRegistry;
use shared::protocol::ServerMessage;
use shared::{step, Controls, Kinematics, StateUpdate};
use std::time::Instant;

/// Benchmarks the pure physics step
#[test]
fn benchmark_physics_step() {
    let mut state = Kinematics {
        x: 400.0,
        y: 300.0,
        rotation: 0.0,
        speed: 0.0,
    };
    let controls = Controls {
        accelerate: true,
        steer_right: true,
        ..Default::default()
    };

    let iterations = 1_000_000;
    let start = Instant::now();

    for _ in 0..iterations {
        state = step(&state, &controls);
    }

    let duration = start.elapsed();
    println!(
        "Physics step: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Guards against the optimizer deleting the loop.
    assert!(state.speed > 0.0);
    // One frame's worth of steps must be far below the frame budget.
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks registry registration and removal churn
#[test]
fn benchmark_registry_churn() {
    let mut registry = PlayerRegistry::new();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let id = registry.register().id;
        registry.remove(&id);
    }

    let duration = start.elapsed();
    println!(
        "Registry churn: {} join/leave cycles in {:?} ({:.2} µs/cycle)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(registry.is_empty());
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks partial updates against a populated registry
#[test]
fn benchmark_registry_updates() {
    let mut registry = PlayerRegistry::new();
    let ids: Vec<String> = (0..64).map(|_| registry.register().id).collect();

    let update = StateUpdate {
        x: Some(500.0),
        y: Some(250.0),
        rotation: Some(180.0),
        speed: Some(4.0),
    };

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        registry.apply_update(&ids[i % ids.len()], &update);
    }

    let duration = start.elapsed();
    println!(
        "Registry updates: {} merges across {} players in {:?} ({:.2} ns/merge)",
        iterations,
        ids.len(),
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}

/// Benchmarks wire serialization of the broadcast-heavy message
#[test]
fn benchmark_update_serialization() {
    let message = ServerMessage::PlayerUpdated {
        id: "abc1234".to_string(),
        data: StateUpdate {
            x: Some(123.456),
            y: Some(654.321),
            rotation: Some(725.0),
            speed: Some(7.84),
        },
    };

    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let text = serde_json::to_string(&message).unwrap();
        let _parsed: ServerMessage = serde_json::from_str(&text).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Update round-trip: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Benchmarks init serialization with a full lobby
#[test]
fn benchmark_init_serialization() {
    let mut registry = PlayerRegistry::new();
    for _ in 0..64 {
        registry.register();
    }
    let snapshot = registry.snapshot();
    let own_id = snapshot.keys().next().unwrap().clone();

    let message = ServerMessage::Init {
        id: own_id,
        players: snapshot,
    };

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _text = serde_json::to_string(&message).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Init with 64 players: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Stress test: the view reducer under a flood of updates
#[test]
fn stress_test_view_reducer() {
    let mut registry = PlayerRegistry::new();
    let ids: Vec<String> = (0..32).map(|_| registry.register().id).collect();

    let mut view = ViewState::new();
    view.apply_message(ServerMessage::Init {
        id: ids[0].clone(),
        players: registry.snapshot(),
    });

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        view.apply_message(ServerMessage::PlayerUpdated {
            id: ids[i % ids.len()].clone(),
            data: StateUpdate {
                x: Some((i % 1200) as f64),
                y: Some((i % 800) as f64),
                rotation: Some(i as f64),
                speed: Some(1.0),
            },
        });
    }

    let duration = start.elapsed();
    println!(
        "View reducer: {} updates across {} players in {:?} ({:.2} ns/update)",
        iterations,
        ids.len(),
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert_eq!(view.len(), 32);
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks a long simulated drive, the per-frame client workload
#[test]
fn benchmark_simulated_drive() {
    let mut view = ViewState::couch();
    let controls = Controls {
        accelerate: true,
        steer_right: true,
        ..Default::default()
    };

    let frames = 100_000;
    let start = Instant::now();

    for _ in 0..frames {
        view.advance_actor(client::game::COUCH_P1, &controls);
    }

    let duration = start.elapsed();
    println!(
        "Simulated drive: {} frames in {:?} ({:.2} ns/frame)",
        frames,
        duration,
        duration.as_nanos() as f64 / frames as f64
    );

    let car = view.get(client::game::COUCH_P1).unwrap();
    assert!(car.speed > 0.0);
    assert!(duration.as_millis() < 2000);
}

use clap::Parser;
use client::game::{ViewState, COUCH_P1, COUCH_P2};
use client::input::{ControlSource, ScriptedControls};
use client::network::SyncClient;
use log::info;
use shared::Controls;
use std::time::Duration;
use tokio::time::interval;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket server URL to connect to
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080")]
    server: String,

    /// Drive two local cars on one keyboard instead of connecting
    #[arg(long)]
    couch: bool,
}

/// Lap-ish demo pattern: straights with alternating sweeps.
fn drive_pattern() -> ScriptedControls {
    let forward = Controls {
        accelerate: true,
        ..Default::default()
    };
    let sweep_right = Controls {
        accelerate: true,
        steer_right: true,
        ..Default::default()
    };
    let sweep_left = Controls {
        accelerate: true,
        steer_left: true,
        ..Default::default()
    };

    ScriptedControls::new(vec![
        (120, forward),
        (60, sweep_right),
        (120, forward),
        (60, sweep_left),
    ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    if args.couch {
        run_couch().await
    } else {
        run_multiplayer(&args.server).await
    }
}

/// Headless networked session: the scripted pattern stands in for a player.
async fn run_multiplayer(server: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Connecting to {}", server);

    let sync_client = SyncClient::new(server);
    let view = sync_client.view();
    let mut session = tokio::spawn(sync_client.run(drive_pattern()));

    let mut status_interval = interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = status_interval.tick() => {
                let view = view.read().await;
                if let Some(player) = view.local_id().and_then(|id| view.get(id)) {
                    info!(
                        "{}: ({:.1}, {:.1}) heading {:.0} speed {:.2}, {} racing",
                        player.name, player.x, player.y, player.rotation, player.speed, view.len()
                    );
                }
            }
            result = &mut session => {
                result??;
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Two cars, one process, no network. Both route through the same physics
/// step as the networked path; results just stay local.
async fn run_couch() -> Result<(), Box<dyn std::error::Error>> {
    info!("Couch mode demo: two scripted cars sharing one world");

    let mut view = ViewState::couch();
    let mut p1_controls = drive_pattern();
    let mut p2_controls = ScriptedControls::hold(Controls {
        accelerate: true,
        steer_left: true,
        ..Default::default()
    });

    let mut frame_interval = interval(Duration::from_millis(16));
    let mut status_interval = interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let c1 = p1_controls.sample();
                view.advance_actor(COUCH_P1, &c1);
                let c2 = p2_controls.sample();
                view.advance_actor(COUCH_P2, &c2);
            }
            _ = status_interval.tick() => {
                for id in [COUCH_P1, COUCH_P2] {
                    if let Some(player) = view.get(id) {
                        info!(
                            "{}: ({:.1}, {:.1}) heading {:.0} speed {:.2}",
                            player.name, player.x, player.y, player.rotation, player.speed
                        );
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    Ok(())
}

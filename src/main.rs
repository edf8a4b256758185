use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{error, info};

use rwd_car::config::load_config;
use rwd_car::net::start_websocket_server;
use rwd_car::physics::PhysicsWorld;
use rwd_car::state::SharedGameState;
use rwd_car::vehicle::REFERENCE_CAR;

#[derive(Parser, Debug)]
#[command(about = "Rear-wheel-drive car physics server")]
struct Args {
    /// TOML config file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `bind_addr` from the config.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        cfg.bind_addr = bind;
    }
    info!(?cfg, "Server config loaded");

    let state = Arc::new(Mutex::new(SharedGameState::new(cfg.vehicle, cfg.spawn_height)));
    let physics = Arc::new(Mutex::new(PhysicsWorld::new()));

    let server = tokio::spawn(start_websocket_server(
        cfg.bind_addr.clone(),
        Arc::clone(&state),
        Arc::clone(&physics),
    ));

    let dt = cfg.dt();
    let mut ticker = interval(Duration::from_secs_f32(dt));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(tick_hz = cfg.tick_hz, "simulation running");

    loop {
        ticker.tick().await;

        if server.is_finished() {
            return match server.await {
                Ok(Err(e)) => Err(e.into()),
                Err(e) => {
                    error!("network task panicked: {e}");
                    Err(e.into())
                }
                Ok(Ok(())) => Ok(()),
            };
        }

        let mut phys = physics.lock().await;
        let mut game = state.lock().await;

        // New players get a car before their first forces.
        game.ensure_cars(&mut phys, &REFERENCE_CAR);

        // Read state -> force model -> applicator.
        game.drive_vehicles(&mut phys);

        phys.step(dt);
        game.reset_exploded_cars(&mut phys, &REFERENCE_CAR);

        game.tick += 1;
        game.broadcast_snapshot(&phys);
    }
}

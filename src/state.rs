use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::applicator::{ForceApplicator, RapierForceApplicator};
use crate::force_model;
use crate::input::KeyboardState;
use crate::physics::PhysicsWorld;
use crate::vehicle::{CarBodies, CarLayout, VehicleConfig};

/// Cars are spawned side by side along X, this far apart.
const SPAWN_SPACING: f32 = 4.0;
const SPAWN_SLOTS: usize = 8;

pub struct Player {
    pub id: String,
    pub car: Option<CarBodies>,
    /// Where the current car was spawned; exploded cars are rebuilt here.
    pub home: [f32; 3],
    pub keys: KeyboardState,
    pub config: VehicleConfig,
    pub tx: UnboundedSender<String>,
}

#[derive(Serialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4], // quaternion [x, y, z, w]
    pub speed: f32, // horizontal, m/s
}

#[derive(Serialize)]
#[serde(tag = "type", rename = "snapshot")]
pub struct Snapshot {
    pub tick: u64,
    pub players: Vec<PlayerSnapshot>,
}

pub struct SharedGameState {
    pub tick: u64,
    pub players: HashMap<String, Player>,
    pub defaults: VehicleConfig,
    pub spawn_height: f32,
    spawned: usize,
}

impl SharedGameState {
    pub fn new(defaults: VehicleConfig, spawn_height: f32) -> Self {
        Self {
            tick: 0,
            players: HashMap::new(),
            defaults,
            spawn_height,
            spawned: 0,
        }
    }

    pub fn add_player(&mut self, tx: UnboundedSender<String>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.players.insert(
            id.clone(),
            Player {
                id: id.clone(),
                car: None,
                home: [0.0; 3],
                keys: KeyboardState::new(),
                config: self.defaults,
                tx,
            },
        );
        id
    }

    pub fn remove_player(&mut self, id: &str, phys: &mut PhysicsWorld) {
        if let Some(car) = self.players.remove(id).and_then(|p| p.car) {
            phys.remove_car(&car);
        }
    }

    /// Next spawn point, cycling through a row of slots.
    fn next_spawn(&mut self, layout: &CarLayout) -> [f32; 3] {
        let slot = self.spawned % SPAWN_SLOTS;
        self.spawned += 1;
        let x = (slot as f32 - (SPAWN_SLOTS as f32 - 1.0) * 0.5) * SPAWN_SPACING;
        [x, layout.ride_height() + self.spawn_height, 0.0]
    }

    /// Give every player without a car a fresh one.
    pub fn ensure_cars(&mut self, phys: &mut PhysicsWorld, layout: &CarLayout) {
        let missing: Vec<String> = self
            .players
            .values()
            .filter(|p| p.car.is_none())
            .map(|p| p.id.clone())
            .collect();

        for id in missing {
            let pos = self.next_spawn(layout);
            let car = phys.spawn_car(layout, pos);
            if let Some(p) = self.players.get_mut(&id) {
                p.car = Some(car);
                p.home = pos;
            }
            debug!(player = %id, "car created");
        }
    }

    /// Run the force model for every car and hand the result to the engine.
    ///
    /// A car with missing bodies is dropped (leftovers removed) so that
    /// `ensure_cars` spawns a fresh one next tick.
    pub fn drive_vehicles(&mut self, phys: &mut PhysicsWorld) {
        for p in self.players.values_mut() {
            let Some(car) = p.car else { continue };

            let (Some(state), Some(wheels)) =
                (phys.vehicle_state(&car), phys.wheel_velocities(&car))
            else {
                warn!(player = %p.id, "car bodies missing, respawning");
                phys.remove_car(&car);
                p.car = None;
                continue;
            };

            let intent = p.keys.intent();
            let cmds = force_model::tick(&state, &wheels, &intent, &p.config);

            RapierForceApplicator::begin_tick(&mut phys.bodies, &car).apply_all(&cmds);
        }
    }

    /// Safety: rebuild any car that ran off to insane coordinates at its spawn point.
    pub fn reset_exploded_cars(&self, phys: &mut PhysicsWorld, layout: &CarLayout) {
        for p in self.players.values() {
            let Some(car) = p.car else { continue };
            if phys.car_exploded(&car) {
                phys.reset_car(&car, layout, p.home);
                warn!(player = %p.id, home = ?p.home, "reset exploding car");
            }
        }
    }

    pub fn snapshot(&self, phys: &PhysicsWorld) -> Snapshot {
        let mut players = Vec::with_capacity(self.players.len());

        for p in self.players.values() {
            let Some(body) = p.car.and_then(|c| phys.bodies.get(c.chassis)) else { continue };
            let pos = body.translation();
            let rot = body.rotation();
            let vel = body.linvel();
            players.push(PlayerSnapshot {
                id: p.id.clone(),
                position: [pos.x, pos.y, pos.z],
                rotation: [rot.i, rot.j, rot.k, rot.w],
                speed: (vel.x * vel.x + vel.z * vel.z).sqrt(),
            });
        }

        Snapshot { tick: self.tick, players }
    }

    /// Build and send a snapshot of all cars to all clients.
    pub fn broadcast_snapshot(&self, phys: &PhysicsWorld) {
        let json = match serde_json::to_string(&self.snapshot(phys)) {
            Ok(j) => j,
            Err(e) => {
                warn!("snapshot serialization failed: {e}");
                return;
            }
        };

        for p in self.players.values() {
            let _ = p.tx.send(json.clone());
        }
    }
}

//! Rear-wheel-drive car on a rapier3d world: a pure per-tick force model
//! (`force_model`) plus the server shell that feeds it input and applies its
//! output.

pub mod applicator;
pub mod config;
pub mod force_model;
pub mod input;
pub mod net;
pub mod physics;
pub mod state;
pub mod vehicle;

//! force_model - engine-agnostic vehicle forces (pure types + per-tick composition)

pub mod types;
pub mod drag;
pub mod motor;
pub mod steering;
pub mod brake;
pub mod tick;

pub use types::*;
pub use drag::compute_drag;
pub use motor::compute_motor_force;
pub use steering::compute_steering_force;
pub use brake::compute_brake_forces;
pub use tick::tick;

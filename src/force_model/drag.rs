// ==============================================================================
// drag.rs — GROUND DRAG ON THE CHASSIS
// ------------------------------------------------------------------------------
// Only horizontal motion is damped; vertical velocity (falling, bouncing) is
// left to the engine.
//
//     speed = |(vx, vz)|
//     F     = (-vx, 0, -vz) * speed * drag_coefficient * DRAG_SCALE
//
// Magnitude grows with speed², so this is quadratic damping, not linear drag.
// At rest the product is zero, no branch needed.
// ==============================================================================

use crate::force_model::types::{BodyTarget, DRAG_SCALE, ForceCommand, Vec3, horizontal_opposing};

pub fn compute_drag(velocity: &Vec3, drag_coefficient: f32) -> ForceCommand {
    let speed = (velocity.x * velocity.x + velocity.z * velocity.z).sqrt();
    let factor = speed * drag_coefficient * DRAG_SCALE;

    ForceCommand::at_origin(BodyTarget::Chassis, horizontal_opposing(velocity) * factor)
}

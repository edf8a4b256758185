// ==============================================================================
// brake.rs — PER-WHEEL BRAKE FORCE
// ------------------------------------------------------------------------------
// Each wheel is braked against its OWN horizontal velocity, not the chassis':
//
//     F_i = (-vx_i, 0, -vz_i) * brake_power * BRAKE_SCALE
//
// While braking, exactly one command per wheel is emitted, zero force included.
// ==============================================================================

use crate::force_model::types::{
    BRAKE_SCALE, BodyTarget, ForceCommand, WheelRole, WheelVelocities, horizontal_opposing,
};

pub fn compute_brake_forces(
    brake: bool,
    wheel_velocities: &WheelVelocities,
    brake_power: f32,
) -> Vec<ForceCommand> {
    if !brake {
        return Vec::new();
    }

    let gain = brake_power * BRAKE_SCALE;

    WheelRole::ALL
        .iter()
        .map(|&w| {
            let v = &wheel_velocities[w.index()];
            ForceCommand::at_origin(BodyTarget::Wheel(w), horizontal_opposing(v) * gain)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force_model::types::Vec3;

    #[test]
    fn four_zero_commands_at_rest() {
        let cmds = compute_brake_forces(true, &[Vec3::zeros(); 4], 3000.0);
        assert_eq!(cmds.len(), 4);
        for (c, w) in cmds.iter().zip(WheelRole::ALL) {
            assert_eq!(c.target, BodyTarget::Wheel(w));
            assert_eq!(c.force, Vec3::zeros());
        }
    }

    #[test]
    fn each_wheel_uses_its_own_velocity() {
        let v = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 5.0, 2.0),
            Vec3::new(-3.0, 0.0, 0.0),
            Vec3::zeros(),
        ];
        let cmds = compute_brake_forces(true, &v, 3000.0);

        assert!((cmds[0].force - Vec3::new(-30.0, 0.0, 0.0)).norm() < 1e-4);
        assert!((cmds[1].force - Vec3::new(0.0, 0.0, -60.0)).norm() < 1e-4);
        assert!((cmds[2].force - Vec3::new(90.0, 0.0, 0.0)).norm() < 1e-4);
        assert_eq!(cmds[3].force, Vec3::zeros());
    }

    #[test]
    fn released_brake_emits_nothing() {
        let cmds = compute_brake_forces(false, &[Vec3::new(4.0, 0.0, 4.0); 4], 3000.0);
        assert!(cmds.is_empty());
    }
}

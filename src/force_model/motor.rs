// ==============================================================================
// motor.rs — REAR-WHEEL DRIVE FORCE
// ------------------------------------------------------------------------------
// The chassis forward vector (rotation * [0,0,1]) scaled by throttle sign and
// motor power. The full force goes to EACH rear wheel; it is not split between
// them. Brake held suppresses drive entirely.
// ==============================================================================

use crate::force_model::types::{
    BodyTarget, ForceCommand, Orientation, WheelRole, ground_direction, local_forward,
};

pub fn compute_motor_force(
    vertical_axis: f32,
    brake: bool,
    orientation: &Orientation,
    motor_power: f32,
) -> Vec<ForceCommand> {
    if vertical_axis == 0.0 || brake {
        return Vec::new();
    }

    let forward = ground_direction(orientation, local_forward());
    let force = forward * (vertical_axis * motor_power);

    WheelRole::REAR
        .iter()
        .map(|&w| ForceCommand::at_origin(BodyTarget::Wheel(w), force))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force_model::types::Vec3;
    use std::f32::consts::PI;

    #[test]
    fn identity_forward_drives_both_rear_wheels() {
        let cmds = compute_motor_force(1.0, false, &Orientation::identity(), 1500.0);
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].target, BodyTarget::Wheel(WheelRole::RL));
        assert_eq!(cmds[1].target, BodyTarget::Wheel(WheelRole::RR));
        for c in &cmds {
            assert!((c.force - Vec3::new(0.0, 0.0, 1500.0)).norm() < 1e-3);
            assert_eq!(c.point, Vec3::zeros());
        }
    }

    #[test]
    fn reverse_flips_direction() {
        let cmds = compute_motor_force(-1.0, false, &Orientation::identity(), 1500.0);
        assert!((cmds[0].force.z + 1500.0).abs() < 1e-3);
    }

    #[test]
    fn idle_or_braking_emits_nothing() {
        let q = Orientation::identity();
        assert!(compute_motor_force(0.0, false, &q, 1500.0).is_empty());
        assert!(compute_motor_force(1.0, true, &q, 1500.0).is_empty());
        assert!(compute_motor_force(-1.0, true, &q, 1500.0).is_empty());
    }

    #[test]
    fn follows_yaw() {
        // 90° about +Y maps +Z onto +X.
        let q = Orientation::from_axis_angle(&Vec3::y_axis(), PI / 2.0);
        let cmds = compute_motor_force(1.0, false, &q, 1000.0);
        assert!((cmds[0].force.x - 1000.0).abs() < 1e-2, "got {:?}", cmds[0].force);
        assert!(cmds[0].force.z.abs() < 1e-2);
    }

    #[test]
    fn pitched_chassis_still_pushes_horizontally() {
        let q = Orientation::from_axis_angle(&Vec3::x_axis(), -0.3);
        let cmds = compute_motor_force(1.0, false, &q, 1000.0);
        assert_eq!(cmds[0].force.y, 0.0);
        assert!(cmds[0].force.z > 0.0);
    }
}

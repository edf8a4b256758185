//! One tick of the force model: intent + config + kinematic state -> force commands.
//!
//! Output order is fixed (drag, motor, brake, steering) so runs are comparable;
//! the physical result does not depend on it. Nothing is kept between calls.

use crate::force_model::brake::compute_brake_forces;
use crate::force_model::drag::compute_drag;
use crate::force_model::motor::compute_motor_force;
use crate::force_model::steering::compute_steering_force;
use crate::force_model::types::{ForceCommand, InputIntent, VehicleState, WheelVelocities};
use crate::vehicle::VehicleConfig;

pub fn tick(
    state: &VehicleState,
    wheel_velocities: &WheelVelocities,
    intent: &InputIntent,
    config: &VehicleConfig,
) -> Vec<ForceCommand> {
    let vertical = intent.vertical_axis();
    let horizontal = intent.horizontal_axis();
    let q = &state.chassis_orientation;

    // 1 drag + 2 motor + 4 brake + 2 steer at most (motor and brake never together)
    let mut out = Vec::with_capacity(7);

    out.push(compute_drag(&state.chassis_velocity, config.drag_coefficient));
    out.extend(compute_motor_force(vertical, intent.brake, q, config.motor_power));
    out.extend(compute_brake_forces(intent.brake, wheel_velocities, config.brake_power));
    out.extend(compute_steering_force(horizontal, q, config.max_steer_angle_deg));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force_model::types::{BodyTarget, Vec3, WheelRole};

    fn rolling_state(vz: f32) -> VehicleState {
        VehicleState {
            chassis_velocity: Vec3::new(0.0, 0.0, vz),
            ..VehicleState::at_rest()
        }
    }

    #[test]
    fn idle_tick_is_drag_only() {
        let cmds = tick(
            &rolling_state(5.0),
            &[Vec3::new(0.0, 0.0, 5.0); 4],
            &InputIntent::default(),
            &VehicleConfig::default(),
        );
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].target, BodyTarget::Chassis);
        assert!(cmds[0].force.z < 0.0);
    }

    #[test]
    fn full_input_order_is_drag_motor_steer() {
        let intent = InputIntent {
            accelerate_forward: true,
            steer_left: true,
            ..Default::default()
        };
        let cfg = VehicleConfig::default();
        let cmds = tick(&rolling_state(1.0), &[Vec3::zeros(); 4], &intent, &cfg);

        let targets: Vec<_> = cmds.iter().map(|c| c.target).collect();
        assert_eq!(
            targets,
            vec![
                BodyTarget::Chassis,
                BodyTarget::Wheel(WheelRole::RL),
                BodyTarget::Wheel(WheelRole::RR),
                BodyTarget::Wheel(WheelRole::FL),
                BodyTarget::Wheel(WheelRole::FR),
            ]
        );
        // left steer pushes toward -X
        assert!(cmds[3].force.x < 0.0);
    }

    #[test]
    fn brake_replaces_motor() {
        let intent = InputIntent {
            accelerate_forward: true,
            brake: true,
            steer_right: true,
            ..Default::default()
        };
        let cmds = tick(
            &rolling_state(3.0),
            &[Vec3::new(0.0, 0.0, 3.0); 4],
            &intent,
            &VehicleConfig::default(),
        );

        // drag + 4 brake + 2 steer
        assert_eq!(cmds.len(), 7);
        for (c, w) in cmds[1..5].iter().zip(WheelRole::ALL) {
            assert_eq!(c.target, BodyTarget::Wheel(w));
            assert!(c.force.z < 0.0, "brake must oppose motion on {w}");
        }
        assert_eq!(cmds[5].target, BodyTarget::Wheel(WheelRole::FL));
    }

    #[test]
    fn opposing_keys_cancel() {
        let intent = InputIntent {
            accelerate_forward: true,
            accelerate_reverse: true,
            steer_left: true,
            steer_right: true,
            brake: false,
        };
        let cmds = tick(
            &VehicleState::at_rest(),
            &[Vec3::zeros(); 4],
            &intent,
            &VehicleConfig::default(),
        );
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn same_inputs_same_output() {
        let intent = InputIntent {
            accelerate_reverse: true,
            steer_right: true,
            ..Default::default()
        };
        let state = rolling_state(-2.0);
        let wheels = [Vec3::new(0.1, 0.0, -2.0); 4];
        let cfg = VehicleConfig::default();
        assert_eq!(
            tick(&state, &wheels, &intent, &cfg),
            tick(&state, &wheels, &intent, &cfg)
        );
    }
}

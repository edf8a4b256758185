// ==============================================================================
// steering.rs — FRONT-WHEEL LATERAL STEERING PROXY
// ------------------------------------------------------------------------------
// Not a tire model. The steer angle is turned straight into a lateral push
// along the chassis right vector (rotation * [1,0,0]) on both front wheels:
//
//     angle = axis * max_steer_deg * π/180
//     F     = right * angle * STEER_FORCE_PER_RADIAN
// ==============================================================================

use crate::force_model::types::{
    BodyTarget, ForceCommand, Orientation, STEER_FORCE_PER_RADIAN, WheelRole, ground_direction,
    local_right,
};

#[inline]
pub fn steer_angle_radians(horizontal_axis: f32, max_steer_angle_deg: f32) -> f32 {
    horizontal_axis * max_steer_angle_deg.to_radians()
}

pub fn compute_steering_force(
    horizontal_axis: f32,
    orientation: &Orientation,
    max_steer_angle_deg: f32,
) -> Vec<ForceCommand> {
    if horizontal_axis == 0.0 {
        return Vec::new();
    }

    let angle = steer_angle_radians(horizontal_axis, max_steer_angle_deg);
    let right = ground_direction(orientation, local_right());
    let force = right * (angle * STEER_FORCE_PER_RADIAN);

    WheelRole::FRONT
        .iter()
        .map(|&w| ForceCommand::at_origin(BodyTarget::Wheel(w), force))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force_model::types::Vec3;

    #[test]
    fn right_steer_at_thirty_degrees() {
        let cmds = compute_steering_force(1.0, &Orientation::identity(), 30.0);
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].target, BodyTarget::Wheel(WheelRole::FL));
        assert_eq!(cmds[1].target, BodyTarget::Wheel(WheelRole::FR));
        assert!((steer_angle_radians(1.0, 30.0) - 0.5236).abs() < 1e-4);
        for c in &cmds {
            assert!((c.force.x - 52.36).abs() < 1e-2, "got {:?}", c.force);
            assert_eq!(c.force.y, 0.0);
            assert!(c.force.z.abs() < 1e-6);
        }
    }

    #[test]
    fn left_and_right_are_negations() {
        let q = Orientation::from_euler_angles(0.1, 1.2, -0.05);
        let r = compute_steering_force(1.0, &q, 25.0);
        let l = compute_steering_force(-1.0, &q, 25.0);
        for (a, b) in r.iter().zip(&l) {
            assert_eq!(a.force, -b.force);
        }
    }

    #[test]
    fn centered_wheel_emits_nothing() {
        assert!(compute_steering_force(0.0, &Orientation::identity(), 30.0).is_empty());
    }

    #[test]
    fn right_follows_yaw() {
        // 180° about +Y: chassis right is world -X.
        let q = Orientation::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI);
        let cmds = compute_steering_force(1.0, &q, 30.0);
        assert!(cmds[0].force.x < -52.0);
    }
}

use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::force_model::WheelRole;

/// Tunable parameters. Applied as-is by the force model; `validate` is for
/// whoever accepts values from outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    #[serde(rename = "motorPower", alias = "motor_power")]
    pub motor_power: f32, // N per rear wheel
    #[serde(rename = "brakePower", alias = "brake_power")]
    pub brake_power: f32, // scaled by BRAKE_SCALE per m/s
    #[serde(rename = "maxSteerAngle", alias = "max_steer_angle_deg")]
    pub max_steer_angle_deg: f32, // degrees
    #[serde(rename = "dragOnGround", alias = "drag_coefficient")]
    pub drag_coefficient: f32, // scaled by DRAG_SCALE
}

pub const DEFAULT_CAR: VehicleConfig = VehicleConfig {
    motor_power: 1500.0,
    brake_power: 3000.0,
    max_steer_angle_deg: 30.0,
    drag_coefficient: 3.0,
};

impl Default for VehicleConfig {
    fn default() -> Self {
        DEFAULT_CAR
    }
}

impl VehicleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, value: f32, reason: &'static str) -> ConfigError {
            ConfigError::InvalidValue { field, value: value.to_string(), reason }
        }

        let fields = [
            ("motor_power", self.motor_power),
            ("brake_power", self.brake_power),
            ("max_steer_angle_deg", self.max_steer_angle_deg),
            ("drag_coefficient", self.drag_coefficient),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(field, value, "must be finite"));
        }

        if self.motor_power <= 0.0 {
            return Err(invalid("motor_power", self.motor_power, "must be > 0"));
        }
        if self.brake_power <= 0.0 {
            return Err(invalid("brake_power", self.brake_power, "must be > 0"));
        }
        if self.max_steer_angle_deg <= 0.0 || self.max_steer_angle_deg > 90.0 {
            return Err(invalid(
                "max_steer_angle_deg",
                self.max_steer_angle_deg,
                "must be in (0, 90]",
            ));
        }
        if self.drag_coefficient < 0.0 {
            return Err(invalid("drag_coefficient", self.drag_coefficient, "must be >= 0"));
        }
        Ok(())
    }

    /// Merge a partial update. The result only replaces `self` if it validates.
    pub fn apply_update(&mut self, update: &SettingsUpdate) -> Result<(), ConfigError> {
        let mut next = *self;
        if let Some(v) = update.motor_power {
            next.motor_power = v;
        }
        if let Some(v) = update.brake_power {
            next.brake_power = v;
        }
        if let Some(v) = update.max_steer_angle {
            next.max_steer_angle_deg = v;
        }
        if let Some(v) = update.drag_on_ground {
            next.drag_coefficient = v;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Partial settings change sent by a client's settings panel. Field names
/// match the ones `VehicleConfig` is sent out with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsUpdate {
    pub motor_power: Option<f32>,
    pub brake_power: Option<f32>,
    pub max_steer_angle: Option<f32>,
    pub drag_on_ground: Option<f32>,
}

// --------------------------------------------------
// Body layout (chassis local space, +Z forward, +X right)
// --------------------------------------------------

pub struct CarLayout {
    pub chassis_mass: f32, // kg
    pub chassis_half_extents: [f32; 3], // [hx, hy, hz] meters
    pub chassis_friction: f32,
    pub wheel_mass: f32, // kg
    pub wheel_radius: f32, // m
    pub wheel_half_width: f32, // m
    pub wheel_friction: f32,
    pub restitution: f32,
    pub wheel_track_half: f32, // |x| of each wheel
    pub wheel_axle_half: f32, // |z| of each axle
    pub wheel_drop: f32, // wheel centers below chassis center
}

pub const REFERENCE_CAR: CarLayout = CarLayout {
    chassis_mass: 1200.0,
    chassis_half_extents: [0.9, 0.4, 1.5],
    chassis_friction: 0.1,
    wheel_mass: 20.0,
    wheel_radius: 0.3,
    wheel_half_width: 0.1,
    wheel_friction: 1.5,
    restitution: 0.1,
    wheel_track_half: 0.8,
    wheel_axle_half: 1.2,
    wheel_drop: 0.4,
};

impl CarLayout {
    /// Wheel attach point in chassis local space.
    pub fn wheel_offset(&self, role: WheelRole) -> Point<Real> {
        let x = match role {
            WheelRole::FL | WheelRole::RL => -self.wheel_track_half,
            WheelRole::FR | WheelRole::RR => self.wheel_track_half,
        };
        let z = if role.is_front() { self.wheel_axle_half } else { -self.wheel_axle_half };
        point![x, -self.wheel_drop, z]
    }

    /// Chassis center height that leaves the wheels just touching y = 0.
    pub fn ride_height(&self) -> f32 {
        self.wheel_drop + self.wheel_radius
    }
}

/// Engine handles of one car. The physics world owns the bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarBodies {
    pub chassis: RigidBodyHandle,
    pub wheels: [RigidBodyHandle; 4], // indexed by WheelRole::index
}

impl CarBodies {
    pub fn wheel(&self, role: WheelRole) -> RigidBodyHandle {
        self.wheels[role.index()]
    }

    pub fn all(&self) -> [RigidBodyHandle; 5] {
        let [fl, fr, rl, rr] = self.wheels;
        [self.chassis, fl, fr, rl, rr]
    }
}

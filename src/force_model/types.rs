//! Core shared types for `force_model` (engine-agnostic).
// force_model/types.rs
use std::fmt;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

pub type Vec3 = Vector3<f32>;

/// Chassis rotation. Assumed unit length; never checked here.
pub type Orientation = UnitQuaternion<f32>;

// ----- fixed model constants (tuned, not physical) -----
pub const DRAG_SCALE: f32 = 0.01;
pub const BRAKE_SCALE: f32 = 0.01;
pub const STEER_FORCE_PER_RADIAN: f32 = 100.0;

/// +Z is forward.
#[inline]
pub fn local_forward() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// +X is right.
#[inline]
pub fn local_right() -> Vec3 {
    Vec3::new(1.0, 0.0, 0.0)
}

/// (-vx, 0, -vz): the horizontal part of `v`, reversed.
#[inline]
pub fn horizontal_opposing(v: &Vec3) -> Vec3 {
    Vec3::new(-v.x, 0.0, -v.z)
}

/// Rotate a local direction into world space and flatten it onto the ground plane.
#[inline]
pub fn ground_direction(orientation: &Orientation, local: Vec3) -> Vec3 {
    let d = orientation * local;
    Vec3::new(d.x, 0.0, d.z)
}

// ============================================
// Wheel identification
// ============================================

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum WheelRole {
    FL,
    FR,
    RL,
    RR,
}

impl WheelRole {
    /// Stable order; also the index into per-wheel arrays.
    pub const ALL: [WheelRole; 4] = [WheelRole::FL, WheelRole::FR, WheelRole::RL, WheelRole::RR];
    pub const FRONT: [WheelRole; 2] = [WheelRole::FL, WheelRole::FR];
    pub const REAR: [WheelRole; 2] = [WheelRole::RL, WheelRole::RR];

    pub fn index(&self) -> usize {
        match self {
            WheelRole::FL => 0,
            WheelRole::FR => 1,
            WheelRole::RL => 2,
            WheelRole::RR => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelRole::FL => "FL",
            WheelRole::FR => "FR",
            WheelRole::RL => "RL",
            WheelRole::RR => "RR",
        }
    }

    pub fn is_front(&self) -> bool {
        matches!(self, WheelRole::FL | WheelRole::FR)
    }

    pub fn is_rear(&self) -> bool {
        matches!(self, WheelRole::RL | WheelRole::RR)
    }
}

impl fmt::Display for WheelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-wheel linear velocities, indexed by `WheelRole::index`.
pub type WheelVelocities = [Vec3; 4];

// ============================================
// ----- inputs / state -----------------------
// ============================================

/// Which control actions are held this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputIntent {
    pub accelerate_forward: bool,
    pub accelerate_reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub brake: bool,
}

impl InputIntent {
    /// -1, 0 or 1. Forward and reverse held together cancel.
    pub fn vertical_axis(&self) -> f32 {
        self.accelerate_forward as i8 as f32 - self.accelerate_reverse as i8 as f32
    }

    /// -1 (left), 0 or 1 (right).
    pub fn horizontal_axis(&self) -> f32 {
        self.steer_right as i8 as f32 - self.steer_left as i8 as f32
    }
}

/// Read-only kinematic snapshot of the chassis for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub chassis_velocity: Vec3, // world frame
    pub chassis_orientation: Orientation,
}

#[cfg(test)]
impl VehicleState {
    pub fn at_rest() -> Self {
        Self {
            chassis_velocity: Vec3::zeros(),
            chassis_orientation: Orientation::identity(),
        }
    }
}

// ============================================
// ----- output -------------------------------
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyTarget {
    Chassis,
    Wheel(WheelRole),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceCommand {
    pub target: BodyTarget,

    /// World-space force (N).
    pub force: Vec3,

    /// Local offset on the target body. Always the body origin here.
    pub point: Vec3,
}

impl ForceCommand {
    pub fn at_origin(target: BodyTarget, force: Vec3) -> Self {
        Self { target, force, point: Vec3::zeros() }
    }
}


// ==============================================================================
// applicator.rs — FORCE COMMANDS -> RAPIER BODIES
// ------------------------------------------------------------------------------
// rapier keeps user forces until they are reset, so every tick starts by
// clearing the car's accumulated forces; afterwards each command is added at
// the world position of its local application point.
// ==============================================================================

use rapier3d::prelude::*;
use tracing::debug;

use crate::force_model::{BodyTarget, ForceCommand};
use crate::vehicle::CarBodies;

pub trait ForceApplicator {
    fn apply(&mut self, cmd: &ForceCommand);

    fn apply_all(&mut self, cmds: &[ForceCommand]) {
        for cmd in cmds {
            self.apply(cmd);
        }
    }
}

pub struct RapierForceApplicator<'a> {
    bodies: &'a mut RigidBodySet,
    car: &'a CarBodies,
}

impl<'a> RapierForceApplicator<'a> {
    /// Clears last tick's forces on every body of `car`.
    pub fn begin_tick(bodies: &'a mut RigidBodySet, car: &'a CarBodies) -> Self {
        for handle in car.all() {
            if let Some(body) = bodies.get_mut(handle) {
                body.reset_forces(true);
            }
        }
        Self { bodies, car }
    }

    fn handle(&self, target: BodyTarget) -> RigidBodyHandle {
        match target {
            BodyTarget::Chassis => self.car.chassis,
            BodyTarget::Wheel(role) => self.car.wheel(role),
        }
    }
}

impl ForceApplicator for RapierForceApplicator<'_> {
    fn apply(&mut self, cmd: &ForceCommand) {
        let handle = self.handle(cmd.target);
        let Some(body) = self.bodies.get_mut(handle) else {
            debug!(?handle, target = ?cmd.target, "force skipped, body gone");
            return;
        };

        let force = vector![cmd.force.x, cmd.force.y, cmd.force.z];
        let at = body.position() * point![cmd.point.x, cmd.point.y, cmd.point.z];
        body.add_force_at_point(force, at, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force_model::{Vec3, WheelRole};

    /// Drops a single free body and returns a "car" whose five handles all point at it.
    fn one_body_car(bodies: &mut RigidBodySet) -> CarBodies {
        let h = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![1.0, 2.0, 3.0])
                .build(),
        );
        CarBodies { chassis: h, wheels: [h; 4] }
    }

    #[test]
    fn forces_accumulate_then_reset_next_tick() {
        let mut bodies = RigidBodySet::new();
        let car = one_body_car(&mut bodies);

        let cmds = [
            ForceCommand::at_origin(BodyTarget::Chassis, Vec3::new(1.0, 0.0, 0.0)),
            ForceCommand::at_origin(BodyTarget::Wheel(WheelRole::RL), Vec3::new(0.0, 0.0, 2.0)),
        ];
        RapierForceApplicator::begin_tick(&mut bodies, &car).apply_all(&cmds);

        let f = bodies[car.chassis].user_force();
        assert_eq!(f, vector![1.0, 0.0, 2.0]);

        RapierForceApplicator::begin_tick(&mut bodies, &car);
        assert_eq!(bodies[car.chassis].user_force(), vector![0.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_body_is_skipped() {
        let mut bodies = RigidBodySet::new();
        let car = CarBodies {
            chassis: RigidBodyHandle::invalid(),
            wheels: [RigidBodyHandle::invalid(); 4],
        };
        let cmd = ForceCommand::at_origin(BodyTarget::Chassis, Vec3::new(5.0, 0.0, 0.0));
        RapierForceApplicator::begin_tick(&mut bodies, &car).apply(&cmd);
        assert_eq!(bodies.len(), 0);
    }
}

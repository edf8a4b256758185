// src/physics.rs

use std::f32::consts::FRAC_PI_2;

use rapier3d::prelude::*;
use rapier3d::prelude::{Group, InteractionGroups};
use tracing::{debug, info};

use nalgebra::Quaternion;

use crate::force_model::{Orientation, Vec3, VehicleState, WheelRole, WheelVelocities};
use crate::vehicle::{CarBodies, CarLayout};

const GROUP_GROUND: Group = Group::from_bits_truncate(0b0001);
const GROUP_CAR: Group = Group::from_bits_truncate(0b0010);

/// Beyond this distance from the origin a body is treated as exploded.
const WORLD_LIMIT: f32 = 1_000.0;

#[inline]
fn to_model(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
fn to_orientation(r: &Rotation<Real>) -> Orientation {
    Orientation::new_unchecked(Quaternion::new(r.w, r.i, r.j, r.k))
}

pub struct PhysicsWorld {
    pub gravity: Vector<Real>, // gravity vector
    pub pipeline: PhysicsPipeline, // physics pipeline
    pub island_manager: IslandManager, // manages islands of bodies
    pub broad_phase: DefaultBroadPhase, // broad-phase collision detection
    pub narrow_phase: NarrowPhase, // collision detection
    pub bodies: RigidBodySet, // for rigid bodies
    pub colliders: ColliderSet, // for collision shapes
    pub joints: ImpulseJointSet, // wheel hinges
    pub multibody_joints: MultibodyJointSet, // for articulated bodies
    pub ccd: CCDSolver, // continuous collision detection
    pub query_pipeline: QueryPipeline, // for raycasting
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let gravity = vector![0.0, -9.81, 0.0];

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Big static ground box; centered at y = -1 so its top face is exactly y = 0.
        let ground_rb = RigidBodyBuilder::fixed()
            .translation(vector![0.0, -1.0, 0.0])
            .build();

        let ground_handle = bodies.insert(ground_rb);

        let ground_collider = ColliderBuilder::cuboid(500.0, 1.0, 500.0)
            .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CAR))
            .friction(0.8)
            .restitution(0.1)
            .build();

        colliders.insert_with_parent(ground_collider, ground_handle, &mut bodies);

        info!(bodies = bodies.len(), colliders = colliders.len(), "ground inserted");

        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Chassis box plus four hinged wheels. `position` is the chassis center.
    pub fn spawn_car(&mut self, layout: &CarLayout, position: [f32; 3]) -> CarBodies {
        let [x, y, z] = position;
        let [hx, hy, hz] = layout.chassis_half_extents;

        let chassis_rb = RigidBodyBuilder::dynamic()
            .translation(vector![x, y, z])
            .ccd_enabled(true)
            .build();
        let chassis = self.bodies.insert(chassis_rb);

        let chassis_collider = ColliderBuilder::cuboid(hx, hy, hz)
            .mass(layout.chassis_mass)
            .friction(layout.chassis_friction)
            .restitution(layout.restitution)
            .collision_groups(InteractionGroups::new(GROUP_CAR, GROUP_GROUND | GROUP_CAR))
            .build();
        self.colliders.insert_with_parent(chassis_collider, chassis, &mut self.bodies);

        let wheels = WheelRole::ALL.map(|role| {
            let offset = layout.wheel_offset(role);

            let wheel_rb = RigidBodyBuilder::dynamic()
                .translation(vector![x + offset.x, y + offset.y, z + offset.z])
                .build();
            let wheel = self.bodies.insert(wheel_rb);

            // Cylinder axis is +Y; lay it along the axle (+X).
            let wheel_collider =
                ColliderBuilder::cylinder(layout.wheel_half_width, layout.wheel_radius)
                .rotation(vector![0.0, 0.0, FRAC_PI_2])
                .mass(layout.wheel_mass)
                .friction(layout.wheel_friction)
                .restitution(layout.restitution)
                .collision_groups(InteractionGroups::new(GROUP_CAR, GROUP_GROUND | GROUP_CAR))
                .build();
            self.colliders.insert_with_parent(wheel_collider, wheel, &mut self.bodies);

            let hinge = RevoluteJointBuilder::new(Vector::x_axis())
                .local_anchor1(offset)
                .local_anchor2(point![0.0, 0.0, 0.0])
                .contacts_enabled(false);
            self.joints.insert(chassis, wheel, hinge, true);

            wheel
        });

        debug!(?chassis, "car spawned at {:?}", position);

        CarBodies { chassis, wheels }
    }

    pub fn remove_car(&mut self, car: &CarBodies) {
        for handle in car.all() {
            self.bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    /// Current chassis velocity + orientation, if the chassis still exists.
    pub fn vehicle_state(&self, car: &CarBodies) -> Option<VehicleState> {
        let body = self.bodies.get(car.chassis)?;
        Some(VehicleState {
            chassis_velocity: to_model(body.linvel()),
            chassis_orientation: to_orientation(body.rotation()),
        })
    }

    pub fn wheel_velocities(&self, car: &CarBodies) -> Option<WheelVelocities> {
        let mut out = [Vec3::zeros(); 4];
        for role in WheelRole::ALL {
            out[role.index()] = to_model(self.bodies.get(car.wheel(role))?.linvel());
        }
        Some(out)
    }

    pub fn step(&mut self, dt: Real) {
        let hooks = ();
        let events = ();

        self.pipeline.step(
            &self.gravity,
            &IntegrationParameters {
                dt,
                ..IntegrationParameters::default()
            },
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &hooks,
            &events,
        );
    }

    /// True once any body of `car` is non-finite or past the world limit.
    pub fn car_exploded(&self, car: &CarBodies) -> bool {
        car.all().iter().any(|&h| {
            self.bodies.get(h).is_some_and(|body| {
                let pos = body.translation();
                pos.iter().any(|c| !c.is_finite() || c.abs() > WORLD_LIMIT)
            })
        })
    }

    /// Put the whole car back together: chassis at `position`, upright, each
    /// wheel at its hinge anchor, everything at rest.
    pub fn reset_car(&mut self, car: &CarBodies, layout: &CarLayout, position: [f32; 3]) {
        let [x, y, z] = position;
        let chassis = vector![x, y, z];

        let mut poses = vec![(car.chassis, chassis)];
        for role in WheelRole::ALL {
            poses.push((car.wheel(role), chassis + layout.wheel_offset(role).coords));
        }

        for (handle, translation) in poses {
            let Some(body) = self.bodies.get_mut(handle) else { continue };
            body.set_translation(translation, true);
            body.set_rotation(Rotation::identity(), true);
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
            body.set_angvel(vector![0.0, 0.0, 0.0], true);
            body.reset_forces(true);
        }
    }
}

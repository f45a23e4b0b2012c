//! Headless reference physics world
//!
//! A minimal rigid-sphere integrator for tests and headless demos: gravity
//! plus accumulated external forces, advanced with semi-implicit Euler at a
//! fixed timestep. Deterministic - no RNG, stable iteration order by
//! handle. Real deployments substitute their own [`PhysicsWorld`] backend;
//! this one exists so the machine can run end to end without a renderer.

use glam::Vec3;

use super::{BodyHandle, BodySample, PhysicsWorld};
use crate::consts::GRAVITY_Y;

/// One simulated sphere body.
#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    position: Vec3,
    velocity: Vec3,
    mass: f32,
    #[allow(dead_code)]
    radius: f32,
    /// Force accumulated since the last step, cleared on step
    force: Vec3,
}

/// Headless physics world. Bodies are kept sorted by handle for
/// deterministic iteration.
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    bodies: Vec<Body>,
    next_handle: u64,
    /// Gravity toggle, on by default (matches the cage sitting in a
    /// gravity field; tests flip it off for isolated checks)
    pub gravity_enabled: bool,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_handle: 1,
            gravity_enabled: true,
        }
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance every body by one fixed timestep.
    ///
    /// Semi-implicit Euler: velocity integrates first so this step's
    /// forces are visible in this step's motion.
    pub fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            let mut accel = body.force / body.mass;
            if self.gravity_enabled {
                accel.y += GRAVITY_Y;
            }
            body.velocity += accel * dt;
            body.position += body.velocity * dt;
            body.force = Vec3::ZERO;
        }
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.iter().find(|b| b.handle == handle)
    }
}

impl PhysicsWorld for HeadlessWorld {
    fn create_body(&mut self, position: Vec3, radius: f32, mass: f32) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.push(Body {
            handle,
            position,
            velocity: Vec3::ZERO,
            mass: mass.max(f32::EPSILON),
            radius,
            force: Vec3::ZERO,
        });
        handle
    }

    fn destroy_body(&mut self, handle: BodyHandle) {
        self.bodies.retain(|b| b.handle != handle);
    }

    fn sample(&self, handle: BodyHandle) -> Option<BodySample> {
        self.body(handle).map(|b| BodySample {
            position: b.position,
            velocity: b.velocity,
        })
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        if let Some(body) = self.body_mut(handle) {
            body.position = position;
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.body_mut(handle) {
            body.velocity = velocity;
        }
    }

    fn apply_force(&mut self, handle: BodyHandle, force: Vec3, _at_point: Vec3) {
        if let Some(body) = self.body_mut(handle) {
            body.force += force;
        }
    }
}

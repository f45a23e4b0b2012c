//! External physics capability contract
//!
//! The machine treats the integrator as an opaque capability: it creates
//! and destroys bodies, pulls position/velocity samples, and issues
//! set-position / set-velocity / apply-force commands. Numerical methods
//! behind those commands are not this crate's concern.
//!
//! Samples are pull-based: the machine reads every body once at the top of
//! each control tick and records the result into the agent registry, which
//! is the single write path for agent state. A callback-driven backend
//! should buffer its latest callback values and return them from
//! [`PhysicsWorld::sample`].

pub mod headless;

pub use headless::HeadlessWorld;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque reference to one body owned by the physics backend.
///
/// Invalid after the body is destroyed; the registry never hands out a
/// handle past its agent's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// One position/velocity observation of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySample {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// The capability surface the machine requires from a physics backend.
pub trait PhysicsWorld {
    /// Create a rigid sphere body. The returned handle is unique among
    /// live bodies.
    fn create_body(&mut self, position: Vec3, radius: f32, mass: f32) -> BodyHandle;

    /// Destroy a body. Subsequent commands on the handle are ignored.
    fn destroy_body(&mut self, handle: BodyHandle);

    /// Latest position/velocity of a body, or `None` for a dead handle.
    fn sample(&self, handle: BodyHandle) -> Option<BodySample>;

    /// Teleport a body, leaving its velocity untouched.
    fn set_position(&mut self, handle: BodyHandle, position: Vec3);

    /// Overwrite a body's velocity.
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3);

    /// Apply a force at a world-space point for the next integration step.
    fn apply_force(&mut self, handle: BodyHandle, force: Vec3, at_point: Vec3);
}

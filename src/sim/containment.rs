//! Spherical containment correction
//!
//! The external integrator knows nothing about the cage, so once per
//! control tick every agent that drifted past the wall is pulled back:
//! position rescaled radially to the wall limit, velocity replaced with an
//! inward pull plus bounded random jitter. A plain elastic reflection lets
//! balls settle into repeating orbits along the boundary; the jitter keeps
//! the cage visibly chaotic.

use glam::Vec3;
use rand::Rng;

use super::registry::{CageParams, Registry};
use crate::consts::{INWARD_PULL, VEL_JITTER_FACTOR};
use crate::physics::PhysicsWorld;
use crate::uniform_vec3;

/// Commands a single out-of-bounds correction resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Decide the correction for one ball, if any.
///
/// Returns `None` when the ball is safely inside, exactly at the center
/// (rescaling would divide by zero; the ball is left for the agitation to
/// move), or has a degenerate position.
pub fn correct<R: Rng>(
    position: Vec3,
    ball_radius: f32,
    cage: &CageParams,
    rng: &mut R,
) -> Option<Correction> {
    let d = position.length();
    if !d.is_finite() || d == 0.0 {
        return None;
    }
    if d <= cage.safe_limit(ball_radius) {
        return None;
    }

    let corrected = position * (cage.wall_limit(ball_radius) / d);
    let jitter = uniform_vec3(rng, cage.radius * VEL_JITTER_FACTOR);
    let velocity = -corrected * INWARD_PULL + jitter;

    Some(Correction {
        position: corrected,
        velocity,
    })
}

/// Run the corrector over every agent, issuing backend commands and
/// updating the agent slots so later readers in the same tick see the
/// corrected state.
pub fn contain_all<W: PhysicsWorld, R: Rng>(registry: &mut Registry, world: &mut W, rng: &mut R) {
    let cage = *registry.cage();
    for agent in registry.agents_mut() {
        if let Some(correction) = correct(agent.position, agent.radius, &cage, rng) {
            log::debug!(
                "containing ball {} at |p|={:.3}",
                agent.id,
                agent.position.length()
            );
            world.set_position(agent.handle, correction.position);
            world.set_velocity(agent.handle, correction.velocity);
            agent.position = correction.position;
            agent.velocity = correction.velocity;
        }
    }
}

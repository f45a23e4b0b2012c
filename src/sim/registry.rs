//! Ball agent registry
//!
//! A fixed-size arena of per-ball state slots, allocated in one shot at
//! configure time. Agent position/velocity is written through exactly one
//! path - [`Registry::record_samples`] - which pulls the physics backend's
//! latest observations at the top of each control tick. Everything else
//! (containment, shuffle, presentation reads) only reads the slots.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::MachineError;
use crate::consts::{BALL_MASS, EPSILON_MARGIN};
use crate::physics::{BodyHandle, PhysicsWorld};

/// Cage geometry, immutable per configuration. Changing it requires
/// reallocating every agent since spawn positions and radii depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CageParams {
    /// Cage radius, centered at the origin
    pub radius: f32,
    /// Containment slack inside the wall
    pub epsilon_margin: f32,
}

impl Default for CageParams {
    fn default() -> Self {
        Self::new(crate::consts::DEFAULT_CAGE_RADIUS)
    }
}

impl CageParams {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            epsilon_margin: EPSILON_MARGIN,
        }
    }

    /// Largest center distance at which a ball needs no correction.
    #[inline]
    pub fn safe_limit(&self, ball_radius: f32) -> f32 {
        self.radius - ball_radius - self.epsilon_margin
    }

    /// Center distance a corrected ball is placed at.
    #[inline]
    pub fn wall_limit(&self, ball_radius: f32) -> f32 {
        self.radius - ball_radius
    }
}

/// One numbered sphere and its control capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallAgent {
    /// 1-based, contiguous, stable for the registry's lifetime
    pub id: u32,
    pub radius: f32,
    /// Latest observed position (see module docs for the write path)
    pub position: Vec3,
    /// Latest observed velocity
    pub velocity: Vec3,
    /// Backend handle; invalid once the registry is released
    pub handle: BodyHandle,
}

/// Arena of ball agents. Owned by one machine instance; never shared.
#[derive(Debug, Default)]
pub struct Registry {
    agents: Vec<BallAgent>,
    cage: CageParams,
    ball_radius: f32,
}

impl Registry {
    /// Create `count` agents with contiguous ids 1..=count, spawning a
    /// backend body for each.
    ///
    /// Spawn positions are scattered in a small box around the cage
    /// center so the integrator immediately separates them. Rejects
    /// non-positive counts and radii, and balls that cannot fit the cage.
    pub fn allocate<W: PhysicsWorld, R: Rng>(
        count: u32,
        ball_radius: f32,
        cage: CageParams,
        world: &mut W,
        rng: &mut R,
    ) -> Result<Self, MachineError> {
        if count == 0 {
            return Err(MachineError::Configuration(
                "ball count must be positive".into(),
            ));
        }
        if !(cage.radius > 0.0) {
            return Err(MachineError::Configuration(format!(
                "cage radius must be positive, got {}",
                cage.radius
            )));
        }
        if !(ball_radius > 0.0) {
            return Err(MachineError::Configuration(format!(
                "ball radius must be positive, got {}",
                ball_radius
            )));
        }
        if ball_radius * 2.0 >= cage.radius {
            return Err(MachineError::Configuration(format!(
                "ball radius {} too large for cage radius {}",
                ball_radius, cage.radius
            )));
        }

        // Spawn box: x,z in [-s, s], y in [0, 2s], a third of the cage
        let s = cage.radius / 3.0;
        let agents = (1..=count)
            .map(|id| {
                let position = Vec3::new(
                    rng.random_range(-s..=s),
                    rng.random_range(0.0..=2.0 * s),
                    rng.random_range(-s..=s),
                );
                let handle = world.create_body(position, ball_radius, BALL_MASS);
                BallAgent {
                    id,
                    radius: ball_radius,
                    position,
                    velocity: Vec3::ZERO,
                    handle,
                }
            })
            .collect();

        log::info!(
            "allocated {} agents (ball r={}, cage r={})",
            count,
            ball_radius,
            cage.radius
        );

        Ok(Self {
            agents,
            cage,
            ball_radius,
        })
    }

    /// Destroy every backend body and invalidate all handles.
    pub fn release<W: PhysicsWorld>(&mut self, world: &mut W) {
        for agent in self.agents.drain(..) {
            world.destroy_body(agent.handle);
        }
        log::info!("registry released");
    }

    /// Pull the backend's latest observation for every agent into its
    /// slot. The single write path for agent position/velocity.
    pub fn record_samples<W: PhysicsWorld>(&mut self, world: &W) {
        for agent in &mut self.agents {
            if let Some(sample) = world.sample(agent.handle) {
                agent.position = sample.position;
                agent.velocity = sample.velocity;
            }
        }
    }

    pub fn agents(&self) -> &[BallAgent] {
        &self.agents
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [BallAgent] {
        &mut self.agents
    }

    pub fn cage(&self) -> &CageParams {
        &self.cage
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_radius
    }

    /// Number of agents (N in winner selection).
    pub fn len(&self) -> u32 {
        self.agents.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

//! Shuffle campaign scheduler
//!
//! A bounded-duration force campaign: intensity follows sin(progress * pi),
//! so agitation ramps up from zero, peaks at the midpoint, and decays back
//! to zero instead of cutting off abruptly. Force ticks run at a bounded
//! rate (one per [`SHUFFLE_TICK_MS`]) rather than on every physics frame,
//! and completion is latched so it is reported exactly once.
//!
//! Progress is wall-clock based. A device outage therefore shortens the
//! agitation the user perceives but never extends the nominal duration.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::registry::Registry;
use crate::clamp_progress;
use crate::consts::{SHUFFLE_FORCE_SCALE, SHUFFLE_TICK_MS};
use crate::physics::PhysicsWorld;
use crate::uniform_vec3;

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleTick {
    /// Not due yet (bounded rate), or already completed earlier
    Waiting,
    /// Forces were applied to every agent
    Forced,
    /// The campaign just finished; reported exactly once
    Completed,
}

/// State of one in-flight shuffle campaign, nested inside
/// `DrawState::Shuffling`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShuffleCampaign {
    start_ms: f64,
    duration_ms: f64,
    /// Next force tick is due at this timestamp
    next_tick_ms: f64,
    /// Completion latch
    completed: bool,
}

impl ShuffleCampaign {
    pub fn begin(now_ms: f64, duration_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            duration_ms,
            next_tick_ms: now_ms,
            completed: false,
        }
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Campaign progress in [0, 1] from absolute elapsed time.
    pub fn progress(&self, now_ms: f64) -> f32 {
        clamp_progress(now_ms - self.start_ms, self.duration_ms)
    }

    /// Force envelope: zero at both ends, peak 1.0 at the midpoint.
    #[inline]
    pub fn intensity(progress: f32) -> f32 {
        (progress * std::f32::consts::PI).sin()
    }

    /// Run one scheduler tick.
    ///
    /// Callers must already have checked that the machine is still
    /// shuffling and the device is active; a pending tick that outlives a
    /// `reset` is dropped at that check, never here.
    pub fn tick<W: PhysicsWorld, R: Rng>(
        &mut self,
        now_ms: f64,
        registry: &Registry,
        world: &mut W,
        rng: &mut R,
    ) -> ShuffleTick {
        if self.completed || now_ms < self.next_tick_ms {
            return ShuffleTick::Waiting;
        }

        let progress = self.progress(now_ms);
        if progress >= 1.0 {
            self.completed = true;
            log::info!("shuffle campaign complete after {:.0} ms", self.duration_ms);
            return ShuffleTick::Completed;
        }

        let k = SHUFFLE_FORCE_SCALE * Self::intensity(progress);
        for agent in registry.agents() {
            let force = uniform_vec3(rng, k);
            world.apply_force(agent.handle, force, agent.position);
        }

        self.next_tick_ms = now_ms + SHUFFLE_TICK_MS;
        ShuffleTick::Forced
    }
}

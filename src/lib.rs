//! Lotto Cage - a physics-driven lottery machine core
//!
//! Core modules:
//! - `sim`: Deterministic draw simulation (registry, containment, shuffle, selection)
//! - `physics`: External physics capability contract + headless reference world
//! - `machine`: The `LottoMachine` facade consumed by a presentation layer
//!
//! The crate owns everything with genuine engineering difficulty - keeping
//! N rigid bodies inside a spherical cage on top of an integrator with no
//! native spherical confinement, running a bounded-duration shuffle campaign,
//! and settling exactly once on a uniformly-drawn winner. Rendering, widgets
//! and theming live outside and only read this crate's state.

pub mod error;
pub mod machine;
pub mod physics;
pub mod sim;

pub use error::MachineError;
pub use machine::LottoMachine;
pub use physics::{BodyHandle, BodySample, PhysicsWorld};
pub use sim::{BallAgent, CageParams, DeviceStatus, DrawPhase, DrawState};

use glam::Vec3;
use rand::Rng;

/// Machine configuration constants
pub mod consts {
    /// Default number of numbered spheres
    pub const DEFAULT_BALL_COUNT: u32 = 30;
    /// Default sphere radius
    pub const DEFAULT_BALL_RADIUS: f32 = 0.3;
    /// Default cage radius
    pub const DEFAULT_CAGE_RADIUS: f32 = 3.0;
    /// Mass of every sphere body
    pub const BALL_MASS: f32 = 1.0;

    /// Containment slack inside the cage wall
    pub const EPSILON_MARGIN: f32 = 0.05;
    /// Inward pull factor on the corrective velocity
    pub const INWARD_PULL: f32 = 0.5;
    /// Corrective velocity jitter, as a fraction of cage radius
    pub const VEL_JITTER_FACTOR: f32 = 0.5;

    /// Default shuffle campaign length (milliseconds)
    pub const DEFAULT_SHUFFLE_DURATION_MS: f64 = 10_000.0;
    /// Delay between shuffle force ticks - bounded rate so the integrator
    /// is not hit on every physics frame
    pub const SHUFFLE_TICK_MS: f64 = 50.0;
    /// Peak magnitude of the per-axis shuffle force
    pub const SHUFFLE_FORCE_SCALE: f32 = 100.0;

    /// Gravity applied by the headless reference world (Y-down)
    pub const GRAVITY_Y: f32 = -9.81;
    /// Fixed timestep of the headless reference world (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
}

/// A vector with each axis drawn uniformly from [-k, k]
#[inline]
pub fn uniform_vec3<R: Rng>(rng: &mut R, k: f32) -> Vec3 {
    if k <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.random_range(-k..=k),
        rng.random_range(-k..=k),
        rng.random_range(-k..=k),
    )
}

/// Clamp a milliseconds interval to [0, 1] progress
#[inline]
pub fn clamp_progress(elapsed_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0) as f32
}

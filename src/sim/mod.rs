//! Deterministic draw simulation
//!
//! All draw logic lives here. This module must stay pure and deterministic:
//! - Caller-supplied clock only
//! - Seeded RNG only
//! - Stable agent order (by id)
//! - No rendering or platform dependencies

pub mod containment;
pub mod device;
pub mod draw;
pub mod registry;
pub mod shuffle;

pub use containment::{Correction, contain_all, correct};
pub use device::{DeviceMonitor, DeviceStatus};
pub use draw::{DrawPhase, DrawState, select_winner};
pub use registry::{BallAgent, CageParams, Registry};
pub use shuffle::{ShuffleCampaign, ShuffleTick};

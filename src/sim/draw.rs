//! Draw lifecycle and winner selection
//!
//! Exactly one state is active at a time: Idle -> Shuffling -> Settled,
//! with Settled -> Shuffling permitted for a re-draw and Idle reachable
//! again through `reset`. The winner is drawn uniformly over all ids and
//! is deliberately independent of the physics outcome - the chaotic cage
//! is spectacle, the fairness guarantee lives here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shuffle::ShuffleCampaign;

/// The machine's draw lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum DrawState {
    /// Initial and re-enterable resting state
    #[default]
    Idle,
    /// A shuffle campaign is in flight
    Shuffling(ShuffleCampaign),
    /// A winner has been drawn; `winner` is in 1..=N
    Settled { winner: u32 },
}

impl DrawState {
    pub fn is_shuffling(&self) -> bool {
        matches!(self, DrawState::Shuffling(_))
    }

    pub fn winner(&self) -> Option<u32> {
        match self {
            DrawState::Settled { winner } => Some(*winner),
            _ => None,
        }
    }
}

/// Presentation-facing snapshot of the draw state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawPhase {
    Idle,
    Shuffling { progress: f32 },
    Settled { winner: u32 },
}

impl DrawState {
    /// Project into the presentation snapshot, resolving shuffle progress
    /// against the given clock.
    pub fn phase(&self, now_ms: f64) -> DrawPhase {
        match self {
            DrawState::Idle => DrawPhase::Idle,
            DrawState::Shuffling(campaign) => DrawPhase::Shuffling {
                progress: campaign.progress(now_ms),
            },
            DrawState::Settled { winner } => DrawPhase::Settled { winner: *winner },
        }
    }
}

/// Draw the winning id, uniform over 1..=ball_count.
pub fn select_winner<R: Rng>(rng: &mut R, ball_count: u32) -> u32 {
    debug_assert!(ball_count > 0);
    rng.random_range(1..=ball_count)
}

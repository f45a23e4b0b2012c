//! Error taxonomy for the machine's fallible surface
//!
//! Only configuration problems are surfaced synchronously. Device loss is
//! not an error at all - it suspends ticking and self-heals on restore.

use thiserror::Error;

/// Errors returned by [`crate::LottoMachine`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// Invalid ball count or radii. Fatal to the configure call only;
    /// any prior configuration stays intact.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `start` was called while a shuffle is already in progress.
    /// Recoverable - the in-progress draw is untouched.
    #[error("a draw is already running")]
    AlreadyRunning,

    /// `start` was called before any successful `configure`.
    #[error("machine is not configured")]
    NotConfigured,

    /// `start` was called while the device is lost. Transient - the
    /// command is dropped, no transition happens; retry after the
    /// restore signal.
    #[error("device is unavailable")]
    DeviceUnavailable,
}

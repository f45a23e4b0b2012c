//! Device recovery monitor
//!
//! Tracks loss/restore signals from the rendering/physics device. While
//! lost, the machine suppresses all physics commands and makes no state
//! transition; shuffle timing is preserved, not reset, so progress picks
//! up from absolute timestamps once the device returns.

use serde::{Deserialize, Serialize};

/// Availability of the external rendering/physics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceStatus {
    #[default]
    Active,
    Lost,
}

/// Observes the device's loss/restore signals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceMonitor {
    status: DeviceStatus,
    /// Total losses observed, for diagnostics
    loss_count: u32,
}

impl DeviceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == DeviceStatus::Active
    }

    pub fn loss_count(&self) -> u32 {
        self.loss_count
    }

    /// Handle the device-lost signal. Idempotent.
    pub fn on_lost(&mut self) {
        if self.status == DeviceStatus::Lost {
            return;
        }
        self.status = DeviceStatus::Lost;
        self.loss_count += 1;
        log::warn!("device lost (count {}), suspending ticking", self.loss_count);
    }

    /// Handle the device-restored signal. Idempotent.
    pub fn on_restored(&mut self) {
        if self.status == DeviceStatus::Active {
            return;
        }
        self.status = DeviceStatus::Active;
        log::info!("device restored, resuming ticking");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_active() {
        let m = DeviceMonitor::new();
        assert!(m.is_active());
        assert_eq!(m.loss_count(), 0);
    }

    #[test]
    fn test_lost_and_restored() {
        let mut m = DeviceMonitor::new();
        m.on_lost();
        assert_eq!(m.status(), DeviceStatus::Lost);
        m.on_restored();
        assert!(m.is_active());
        assert_eq!(m.loss_count(), 1);
    }

    #[test]
    fn test_signals_idempotent() {
        let mut m = DeviceMonitor::new();
        m.on_lost();
        m.on_lost();
        assert_eq!(m.loss_count(), 1);
        m.on_restored();
        m.on_restored();
        assert!(m.is_active());
        assert_eq!(m.loss_count(), 1);
    }
}

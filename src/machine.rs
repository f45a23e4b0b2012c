//! The lottery machine facade
//!
//! Owns the physics backend, the agent registry, the draw state machine
//! and the device monitor, and wires them together under a single-threaded
//! cooperative tick. The presentation layer drives [`LottoMachine::tick`]
//! from its frame or timer source and reads state back; commands flow in
//! through `configure` / `start` / `reset` and the device signals.
//!
//! Ordering within one tick: backend samples are pulled into the registry
//! first, containment runs second, shuffle forces third - so forces
//! applied here are visible to the integrator before its next step.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::DEFAULT_SHUFFLE_DURATION_MS;
use crate::error::MachineError;
use crate::physics::PhysicsWorld;
use crate::sim::{
    BallAgent, CageParams, DeviceMonitor, DeviceStatus, DrawPhase, DrawState, Registry,
    ShuffleCampaign, ShuffleTick, contain_all, select_winner,
};

/// One lottery machine instance. State is process-wide to the instance,
/// never shared across instances.
pub struct LottoMachine<W: PhysicsWorld> {
    world: W,
    registry: Option<Registry>,
    state: DrawState,
    device: DeviceMonitor,
    rng: Pcg32,
    seed: u64,
}

impl<W: PhysicsWorld> LottoMachine<W> {
    /// Wrap a physics backend. The seed drives spawn scatter, containment
    /// jitter, shuffle forces and winner selection.
    pub fn new(world: W, seed: u64) -> Self {
        Self {
            world,
            registry: None,
            state: DrawState::Idle,
            device: DeviceMonitor::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// (Re)initialize the registry with `ball_count` spheres.
    ///
    /// Rejects a zero count, non-positive radii, and balls that cannot
    /// fit (`ball_radius * 2 >= cage_radius`). On rejection any prior
    /// configuration is left fully intact; on success the old agents are
    /// destroyed, fresh ones are spawned and the draw state returns to
    /// Idle.
    pub fn configure(
        &mut self,
        ball_count: u32,
        cage_radius: f32,
        ball_radius: f32,
    ) -> Result<(), MachineError> {
        let cage = CageParams::new(cage_radius);
        // Validation happens before any body is created, so an Err here
        // has touched neither the backend nor the previous registry.
        let fresh = Registry::allocate(ball_count, ball_radius, cage, &mut self.world, &mut self.rng)?;

        if let Some(mut old) = self.registry.replace(fresh) {
            old.release(&mut self.world);
        }
        self.state = DrawState::Idle;
        log::info!(
            "configured: {} balls, cage r={}, ball r={}",
            ball_count,
            cage_radius,
            ball_radius
        );
        Ok(())
    }

    /// Begin a draw with the default 10 s campaign.
    pub fn start(&mut self, now_ms: f64) -> Result<(), MachineError> {
        self.start_with_duration(now_ms, DEFAULT_SHUFFLE_DURATION_MS)
    }

    /// Begin a draw. Errors with [`MachineError::AlreadyRunning`] while a
    /// shuffle is in flight - the in-progress campaign keeps its start
    /// time and duration. Any prior winner is cleared.
    ///
    /// While the device is lost no transition proceeds: the command is
    /// dropped with [`MachineError::DeviceUnavailable`] instead of
    /// starting a campaign whose wall-clock could fully elapse before
    /// the restore signal.
    pub fn start_with_duration(
        &mut self,
        now_ms: f64,
        duration_ms: f64,
    ) -> Result<(), MachineError> {
        if self.registry.is_none() {
            return Err(MachineError::NotConfigured);
        }
        if !self.device.is_active() {
            return Err(MachineError::DeviceUnavailable);
        }
        if self.state.is_shuffling() {
            return Err(MachineError::AlreadyRunning);
        }

        self.state = DrawState::Shuffling(ShuffleCampaign::begin(now_ms, duration_ms));
        log::info!("draw started, duration {:.0} ms", duration_ms);
        Ok(())
    }

    /// Return to Idle from any state. No side effects on agent positions;
    /// a pending shuffle tick is dropped because `tick` re-checks the
    /// state before applying forces.
    pub fn reset(&mut self) {
        self.state = DrawState::Idle;
        log::info!("machine reset");
    }

    /// Presentation snapshot of the draw state.
    pub fn current_state(&self, now_ms: f64) -> DrawPhase {
        self.state.phase(now_ms)
    }

    /// Raw draw state, mostly for persistence and tests.
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// The settled winner, if any.
    pub fn winner(&self) -> Option<u32> {
        self.state.winner()
    }

    /// Read-only agent transforms for rendering. Empty until configured.
    pub fn agents(&self) -> &[BallAgent] {
        self.registry.as_ref().map(Registry::agents).unwrap_or(&[])
    }

    pub fn device_status(&self) -> DeviceStatus {
        self.device.status()
    }

    /// Device-lost signal. Suspends ticking; shuffle timing is preserved.
    pub fn on_device_lost(&mut self) {
        self.device.on_lost();
    }

    /// Device-restored signal. Ticking resumes; shuffle progress picks up
    /// from absolute elapsed time.
    pub fn on_device_restored(&mut self) {
        self.device.on_restored();
    }

    /// Advance the control loop once. Call after the integrator has
    /// advanced its step for this tick.
    ///
    /// While the device is lost this is a no-op: no samples, no
    /// containment, no forces, no settlement. Ticks are skipped, not
    /// queued.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.device.is_active() {
            return;
        }
        let Some(registry) = self.registry.as_mut() else {
            return;
        };

        registry.record_samples(&self.world);
        contain_all(registry, &mut self.world, &mut self.rng);

        let completed = match &mut self.state {
            DrawState::Shuffling(campaign) => matches!(
                campaign.tick(now_ms, registry, &mut self.world, &mut self.rng),
                ShuffleTick::Completed
            ),
            // Not shuffling: nothing scheduled may act (reset safety)
            _ => false,
        };

        if completed {
            let winner = select_winner(&mut self.rng, registry.len());
            log::info!("draw settled, winner {}", winner);
            self.state = DrawState::Settled { winner };
        }
    }
}

impl<W: PhysicsWorld> Drop for LottoMachine<W> {
    fn drop(&mut self) {
        if let Some(mut registry) = self.registry.take() {
            registry.release(&mut self.world);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::physics::HeadlessWorld;

    fn machine(seed: u64) -> LottoMachine<HeadlessWorld> {
        LottoMachine::new(HeadlessWorld::new(), seed)
    }

    /// Step integrator and control loop together at 60 Hz until `until_ms`.
    fn run_until(m: &mut LottoMachine<HeadlessWorld>, from_ms: f64, until_ms: f64) -> f64 {
        let mut now = from_ms;
        while now < until_ms {
            m.world_mut().step(SIM_DT);
            now += f64::from(SIM_DT) * 1000.0;
            m.tick(now);
        }
        now
    }

    #[test]
    fn test_start_requires_configure() {
        let mut m = machine(1);
        assert_eq!(m.start(0.0), Err(MachineError::NotConfigured));
    }

    #[test]
    fn test_configure_rejects_oversized_ball() {
        let mut m = machine(1);
        let r = m.configure(1, 0.5, 1.0);
        assert!(matches!(r, Err(MachineError::Configuration(_))));
        assert!(m.agents().is_empty());
    }

    #[test]
    fn test_failed_reconfigure_keeps_prior_state() {
        let mut m = machine(1);
        m.configure(5, 3.0, 0.3).unwrap();
        assert!(m.configure(0, 3.0, 0.3).is_err());
        assert_eq!(m.agents().len(), 5);
        assert_eq!(m.world().body_count(), 5);
    }

    #[test]
    fn test_reconfigure_replaces_agents() {
        let mut m = machine(1);
        m.configure(5, 3.0, 0.3).unwrap();
        m.configure(8, 3.0, 0.3).unwrap();
        assert_eq!(m.agents().len(), 8);
        // Old bodies destroyed, no leak
        assert_eq!(m.world().body_count(), 8);
    }

    #[test]
    fn test_full_draw_scenario() {
        let mut m = machine(42);
        m.configure(5, 3.0, 0.3).unwrap();
        m.start_with_duration(0.0, 1000.0).unwrap();

        assert!(matches!(
            m.current_state(0.0),
            DrawPhase::Shuffling { progress } if progress == 0.0
        ));

        run_until(&mut m, 0.0, 1100.0);

        match m.current_state(1100.0) {
            DrawPhase::Settled { winner } => assert!((1..=5).contains(&winner)),
            other => panic!("expected Settled, got {:?}", other),
        }
    }

    #[test]
    fn test_start_while_shuffling_rejected() {
        let mut m = machine(2);
        m.configure(5, 3.0, 0.3).unwrap();
        m.start_with_duration(100.0, 2000.0).unwrap();

        let before = *m.state();
        assert_eq!(m.start(500.0), Err(MachineError::AlreadyRunning));
        // In-flight campaign untouched
        assert_eq!(*m.state(), before);
    }

    #[test]
    fn test_reset_then_fresh_start() {
        let mut m = machine(3);
        m.configure(5, 3.0, 0.3).unwrap();
        m.start_with_duration(0.0, 500.0).unwrap();
        run_until(&mut m, 0.0, 600.0);
        assert!(m.winner().is_some());

        m.reset();
        assert_eq!(m.current_state(600.0), DrawPhase::Idle);
        assert_eq!(m.winner(), None);

        m.start_with_duration(700.0, 500.0).unwrap();
        assert!(matches!(
            m.current_state(700.0),
            DrawPhase::Shuffling { progress } if progress == 0.0
        ));
    }

    #[test]
    fn test_redraw_from_settled() {
        let mut m = machine(4);
        m.configure(5, 3.0, 0.3).unwrap();
        m.start_with_duration(0.0, 200.0).unwrap();
        run_until(&mut m, 0.0, 300.0);
        assert!(m.winner().is_some());

        // Settled -> Shuffling without an intervening reset
        m.start_with_duration(300.0, 200.0).unwrap();
        assert!(m.state().is_shuffling());
        assert_eq!(m.winner(), None);
    }

    #[test]
    fn test_device_loss_suspends_settlement() {
        let mut m = machine(5);
        m.configure(5, 3.0, 0.3).unwrap();
        m.start_with_duration(0.0, 500.0).unwrap();

        let now = run_until(&mut m, 0.0, 250.0);
        m.on_device_lost();

        // Wall clock runs far past the duration while lost; no transition
        // may proceed
        let now = run_until(&mut m, now, 2000.0);
        assert!(m.state().is_shuffling());
        assert_eq!(m.device_status(), DeviceStatus::Lost);

        // Restore: elapsed time already exceeds the duration, so the next
        // scheduler tick completes and settles
        m.on_device_restored();
        run_until(&mut m, now, 2100.0);
        assert!(m.winner().is_some());
    }

    #[test]
    fn test_start_while_device_lost_rejected() {
        let mut m = machine(9);
        m.configure(5, 3.0, 0.3).unwrap();
        m.on_device_lost();

        assert_eq!(
            m.start_with_duration(0.0, 1000.0),
            Err(MachineError::DeviceUnavailable)
        );
        assert_eq!(m.current_state(0.0), DrawPhase::Idle);

        // A campaign started mid-outage could fully elapse on the wall
        // clock before restore; dropping the command means the draw that
        // does run gets its whole agitation window
        m.on_device_restored();
        m.start_with_duration(2000.0, 1000.0).unwrap();
        assert!(matches!(
            m.current_state(2000.0),
            DrawPhase::Shuffling { progress } if progress == 0.0
        ));
    }

    #[test]
    fn test_device_loss_preserves_campaign_timing() {
        let mut m = machine(6);
        m.configure(5, 3.0, 0.3).unwrap();
        m.start_with_duration(0.0, 1000.0).unwrap();

        let before = *m.state();
        m.on_device_lost();
        run_until(&mut m, 0.0, 400.0);
        assert_eq!(*m.state(), before, "lost ticks must not mutate the campaign");
        m.on_device_restored();
    }

    #[test]
    fn test_containment_holds_through_agitation() {
        let mut m = machine(7);
        m.configure(10, 3.0, 0.3).unwrap();
        m.start_with_duration(0.0, 2000.0).unwrap();

        let cage = CageParams::new(3.0);
        let limit = cage.wall_limit(0.3);
        let mut now = 0.0;
        while now < 2000.0 {
            m.world_mut().step(SIM_DT);
            now += f64::from(SIM_DT) * 1000.0;
            m.tick(now);
            for agent in m.agents() {
                assert!(
                    agent.position.length() <= limit + 1e-3,
                    "ball {} escaped to |p|={} at t={}",
                    agent.id,
                    agent.position.length(),
                    now
                );
            }
        }
    }

    #[test]
    fn test_determinism_same_seed_same_winner() {
        let run = |seed: u64| {
            let mut m = machine(seed);
            m.configure(30, 3.0, 0.3).unwrap();
            m.start_with_duration(0.0, 1000.0).unwrap();
            run_until(&mut m, 0.0, 1100.0);
            let positions: Vec<_> = m.agents().iter().map(|a| a.position).collect();
            (m.winner().unwrap(), positions)
        };

        let (w1, p1) = run(123);
        let (w2, p2) = run(123);
        assert_eq!(w1, w2);
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut m = machine(8);
        m.configure(5, 3.0, 0.3).unwrap();
        m.start_with_duration(0.0, 1000.0).unwrap();
        run_until(&mut m, 0.0, 300.0);

        let json = serde_json::to_string(m.state()).unwrap();
        let restored: DrawState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, *m.state());
    }
}

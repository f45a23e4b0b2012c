//! Headless demo draw
//!
//! Runs one full draw against the reference world and prints the winner.
//! Useful for eyeballing log output (`RUST_LOG=debug`) without a renderer.

use std::time::{SystemTime, UNIX_EPOCH};

use lotto_cage::LottoMachine;
use lotto_cage::consts::{
    DEFAULT_BALL_COUNT, DEFAULT_BALL_RADIUS, DEFAULT_CAGE_RADIUS, SIM_DT,
};
use lotto_cage::physics::HeadlessWorld;
use lotto_cage::sim::DrawPhase;

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("demo draw, seed {}", seed);

    let mut machine = LottoMachine::new(HeadlessWorld::new(), seed);
    machine
        .configure(DEFAULT_BALL_COUNT, DEFAULT_CAGE_RADIUS, DEFAULT_BALL_RADIUS)
        .expect("default configuration is valid");
    machine
        .start_with_duration(0.0, 3000.0)
        .expect("machine is idle");

    let mut now_ms = 0.0_f64;
    let mut last_report = -1_i32;
    loop {
        machine.world_mut().step(SIM_DT);
        now_ms += f64::from(SIM_DT) * 1000.0;
        machine.tick(now_ms);

        match machine.current_state(now_ms) {
            DrawPhase::Shuffling { progress } => {
                let decile = (progress * 10.0) as i32;
                if decile > last_report {
                    last_report = decile;
                    println!("shuffling... {:>3.0}%", progress * 100.0);
                }
            }
            DrawPhase::Settled { winner } => {
                println!("winner: {}", winner);
                break;
            }
            DrawPhase::Idle => unreachable!("draw was started"),
        }
    }
}

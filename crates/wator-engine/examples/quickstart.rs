//! Wator quickstart: build a world, step it, and watch the populations.
//!
//! Demonstrates:
//!   1. Building a WatorConfig and WatorWorld
//!   2. Stepping synchronously and reading step metrics
//!   3. Handing the world to a WorldRunner and consuming snapshots
//!
//! Run with:
//!   cargo run --example quickstart

use wator_engine::{RunnerConfig, WatorConfig, WatorWorld, WorldRunner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = WatorConfig {
        width: 120,
        height: 80,
        initial_prey_count: 2_000,
        initial_predator_count: 400,
        seed: 42,
        ..WatorConfig::default()
    };
    let mut world = WatorWorld::new(config)?;
    println!(
        "world {}x{} on {} workers, {} partitions per step",
        world.width(),
        world.height(),
        world.parallelism(),
        world.partition_count()
    );

    // ─── Synchronous stepping ───────────────────────────────────

    for _ in 0..10 {
        let report = world.execute_step()?;
        let m = &report.metrics;
        println!(
            "step {:>3}: prey {:>5} predators {:>5} | born {}/{} eaten {} starved {} | {} us",
            report.step,
            m.population.prey,
            m.population.predators,
            m.prey_born,
            m.predators_born,
            m.prey_eaten,
            m.predators_starved,
            m.total_us
        );
    }

    // ─── Background runner ──────────────────────────────────────

    let runner = WorldRunner::spawn(
        world,
        RunnerConfig {
            max_steps: Some(200),
            snapshot_every: 20,
            channel_capacity: 16,
        },
    )?;
    for snap in runner.snapshots().iter().take(10) {
        let pop = snap.population();
        println!(
            "snapshot at step {:>3}: prey {:>5} predators {:>5}",
            snap.step(),
            pop.prey,
            pop.predators
        );
    }
    let (world, summary) = runner.join()?;
    println!(
        "ran {} steps in the background, ended at step {}, {} frames dropped",
        summary.steps,
        world.step_id(),
        summary.dropped_snapshots
    );
    if let Some(err) = summary.error {
        println!("run ended early: {err}");
    }
    Ok(())
}

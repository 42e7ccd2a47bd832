//! Engine and physics presets for tests and benches.

use xbar_core::constants::ELECTRON_VOLT;
use xbar_engine::{CrossbarEngine, EngineConfig, PhysicsParams};

/// Seed used by fixtures unless a test picks its own.
pub const FIXTURE_SEED: u64 = 42;

/// Physics in which self-heating is visible in `f64`.
///
/// The default activation energy underflows the Arrhenius factor at room
/// temperature. 0.1 eV gives a factor of about 0.02 at 300 K, and a large
/// heating coefficient makes each call move temperatures by millikelvin.
pub fn heating_physics() -> PhysicsParams {
    PhysicsParams {
        activation_energy: 0.1 * ELECTRON_VOLT,
        heating_coefficient: 1e6,
        ..PhysicsParams::default()
    }
}

/// [`heating_physics`] saturating at `ceiling` Kelvin.
pub fn ceiling_physics(ceiling: f64) -> PhysicsParams {
    PhysicsParams {
        thermal_ceiling: Some(ceiling),
        ..heating_physics()
    }
}

/// Default-physics engine with a fixed seed.
pub fn seeded_engine(size: usize) -> CrossbarEngine {
    engine_with(EngineConfig::new(size).with_seed(FIXTURE_SEED))
}

/// Heating-physics engine with a fixed seed and worker count.
pub fn heating_engine(size: usize, workers: usize) -> CrossbarEngine {
    engine_with(
        EngineConfig::new(size)
            .with_seed(FIXTURE_SEED)
            .with_workers(workers)
            .with_physics(heating_physics()),
    )
}

/// Build an engine, panicking with the config on failure.
#[track_caller]
pub fn engine_with(config: EngineConfig) -> CrossbarEngine {
    match CrossbarEngine::new(config.clone()) {
        Ok(engine) => engine,
        Err(e) => panic!("fixture engine {config:?} failed: {e}"),
    }
}

/// A deterministic ramp of voltages in `[-1, 1]`.
pub fn ramp_voltages(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| -1.0 + 2.0 * i as f64 / (size - 1) as f64)
        .collect()
}

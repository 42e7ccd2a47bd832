//! Crossbar stress test.
//!
//! Builds one engine, runs the benchmark harness, prints throughput, thermal
//! telemetry, and an energy comparison. `RUST_LOG` controls engine logging.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xbar_bench::EnergyComparison;
use xbar_engine::{CrossbarEngine, EngineConfig, PhysicsParams};

#[derive(Parser)]
#[command(name = "stress_test")]
#[command(about = "Benchmark a simulated memristor crossbar")]
struct Cli {
    /// Crossbar edge length
    #[arg(short, long, default_value = "1024")]
    size: usize,

    /// Propagation calls to time
    #[arg(short, long, default_value = "10")]
    iterations: u32,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Drift RNG seed (default: random)
    #[arg(long)]
    seed: Option<u64>,

    /// Drive voltage on every column
    #[arg(long, default_value = "0.5")]
    voltage: f64,

    /// Saturate cell temperatures at this many Kelvin
    #[arg(long)]
    ceiling: Option<f64>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = EngineConfig::new(cli.size)
        .with_benchmark_voltage(cli.voltage)
        .with_physics(PhysicsParams {
            thermal_ceiling: cli.ceiling,
            ..PhysicsParams::default()
        });
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }

    let mut engine = match CrossbarEngine::new(config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("failed to build engine: {e}");
            std::process::exit(2);
        }
    };
    info!(seed = engine.seed(), workers = engine.workers(), "starting stress test");

    let report = match engine.benchmark(cli.iterations) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("benchmark failed: {e}");
            std::process::exit(1);
        }
    };
    let thermal = engine.telemetry();

    println!("=== xbar stress test ===");
    println!("  {report}");
    println!(
        "  temperature: min {:.6} K, max {:.6} K, mean {:.6} K ({} at ceiling)",
        thermal.min_temperature,
        thermal.max_temperature,
        thermal.mean_temperature,
        thermal.cells_at_ceiling,
    );
    println!("  energy: {}", EnergyComparison::from_report(&report));
}

//! kanerva-sdm: Sparse Distributed Memory speed test.
//!
//! Writes a batch of random (address, memory) pairs into a freshly built
//! SDM, reads every address back, and reports timing and recall quality.

use anyhow::Context;
use clap::Parser;
use kanerva_sdm::config;
use kanerva_sdm::runtime::speed_test::{self, SpeedTestConfig};
use kanerva_sdm::SdmConfig;
use tracing_subscriber::EnvFilter;

/// Sparse Distributed Memory speed test.
#[derive(Parser, Debug)]
#[command(
    name = "kanerva-sdm",
    about = "Kanerva SDM write/read microbenchmark",
    version
)]
struct Cli {
    /// Address dimension (N).
    #[arg(short = 'n', long, default_value_t = config::DEFAULT_ADDRESS_DIM)]
    address_dim: usize,

    /// Memory dimension (U).
    #[arg(short = 'u', long, default_value_t = config::DEFAULT_MEMORY_DIM)]
    memory_dim: usize,

    /// Number of hard locations (M).
    #[arg(short = 'm', long, default_value_t = config::DEFAULT_NUM_LOCATIONS)]
    locations: usize,

    /// Activation threshold, inclusive Hamming radius (H).
    #[arg(short = 't', long, default_value_t = config::DEFAULT_ACTIVATION_THRESHOLD)]
    threshold: usize,

    /// Seed for the hard-location addresses.
    #[arg(short, long, default_value_t = config::DEFAULT_SEED)]
    seed: u64,

    /// Number of patterns to write and read back.
    #[arg(short = 'k', long, default_value_t = config::DEFAULT_NUM_MEMORIES)]
    memories: usize,

    /// Seed for the generated test patterns.
    #[arg(long, default_value_t = config::DEFAULT_SEED)]
    data_seed: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!("kanerva-sdm v{}", env!("CARGO_PKG_VERSION"));

    let test = SpeedTestConfig {
        sdm: SdmConfig::new(cli.address_dim, cli.memory_dim, cli.locations, cli.threshold)
            .with_seed(cli.seed),
        num_memories: cli.memories,
        data_seed: cli.data_seed,
    };

    tracing::info!(
        "Config: N={}, U={}, M={}, H={}, seed={}",
        test.sdm.address_dimension,
        test.sdm.memory_dimension,
        test.sdm.num_locations,
        test.sdm.activation_threshold,
        test.sdm.seed,
    );
    tracing::info!("Writing and reading {} memories...", test.num_memories);

    let report = speed_test::run(&test).context("speed test failed")?;

    tracing::info!("Elapsed time: {:.5}s", report.total_time_ms() / 1000.0);
    tracing::info!("  Write: {:.1} ms", report.write_time_ms);
    tracing::info!("  Read:  {:.1} ms", report.read_time_ms);
    tracing::info!("  Throughput: {:.0} ops/s", report.ops_per_second());
    tracing::info!("  Bit accuracy: {:.2}%", report.bit_accuracy * 100.0);
    tracing::info!("  Mean bit errors: {:.3}", report.mean_bit_errors);
    tracing::info!(
        "  Exact recalls: {}/{} ({:.1}%)",
        report.exact_recalls,
        report.num_memories,
        report.exact_recall_rate() * 100.0,
    );

    Ok(())
}

//! LFSR Randomness Battery CLI
//!
//! Generates an LFSR cycle and runs the monobit, block frequency and
//! serial tests on it, or on a bit file or the ChaCha20 reference source.

use clap::{Args, Parser, Subcommand};
use lfsr_battery::{
    analysis::{Battery, BatteryReport, SerialMode, Significance},
    config::{ConfigError, FileConfig},
    BitSequence, RandomnessError, ReferenceSource,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lfsr-battery")]
#[command(about = "LFSR bit generator and NIST SP 800-22 frequency/serial test battery")]
#[command(version = lfsr_battery::VERSION)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one full LFSR cycle as a 0/1 string
    Generate {
        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Run the test battery and print one verdict per test.
    /// Exits with status 1 if any test falls below the significance level.
    Test {
        #[command(flatten)]
        generator: GeneratorArgs,

        /// Test a file of 0/1 characters instead of the LFSR (whitespace ignored)
        #[arg(long, conflicts_with = "reference")]
        input: Option<PathBuf>,

        /// Test this many bits of the ChaCha20 reference source instead of the LFSR
        #[arg(long)]
        reference: Option<usize>,

        /// Seed for the reference source
        #[arg(long, default_value = "0")]
        reference_seed: u64,

        /// Block size M for the block frequency test
        #[arg(long)]
        block_size: Option<usize>,

        /// Pattern length m for the serial test
        #[arg(long)]
        pattern_length: Option<u32>,

        /// Serial p-value to report: first or both (minimum of p1 and p2)
        #[arg(long)]
        mode: Option<SerialMode>,

        /// Significance level
        #[arg(long)]
        alpha: Option<f64>,
    },
}

/// Generator overrides on top of the configuration file.
#[derive(Args)]
struct GeneratorArgs {
    /// Register seed (decimal, 0b binary or 0x hex)
    #[arg(long, value_parser = parse_seed)]
    seed: Option<u64>,

    /// Comma-separated 1-indexed tap positions
    #[arg(long, value_delimiter = ',')]
    taps: Option<Vec<u32>>,

    /// Register width in bits
    #[arg(long)]
    nbits: Option<u32>,
}

impl GeneratorArgs {
    fn apply(self, config: &mut FileConfig) {
        if let Some(seed) = self.seed {
            config.generator.seed = seed;
        }
        if let Some(taps) = self.taps {
            config.generator.taps = taps;
        }
        if let Some(nbits) = self.nbits {
            config.generator.nbits = nbits;
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Randomness(#[from] RandomnessError),
    #[error("failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.replace('_', "");
    let parsed = if let Some(bin) = s.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else if let Some(hex) = s.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid seed {s:?}: {e}"))
}

/// A valid, non-empty `RUST_LOG` replaces the `--verbose` level entirely.
fn log_filter(rust_log: Option<String>, verbose: bool) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok(), cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether every test passed (always true for `generate`).
fn run(cli: Cli) -> Result<bool, CliError> {
    let mut config = match cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            FileConfig::from_file(path)?
        }
        None => FileConfig::default(),
    };

    match cli.command {
        Commands::Generate { generator } => {
            generator.apply(&mut config);
            let lfsr = config.generator.build()?;
            let bits = lfsr.generate()?;

            info!(
                "LFSR seed={:#b} taps={:?} nbits={}: period {}",
                lfsr.seed(),
                lfsr.taps(),
                lfsr.nbits(),
                bits.len()
            );
            println!("{}", bits);
            Ok(true)
        }
        Commands::Test {
            generator,
            input,
            reference,
            reference_seed,
            block_size,
            pattern_length,
            mode,
            alpha,
        } => {
            generator.apply(&mut config);
            if let Some(block_size) = block_size {
                config.battery.block_size = block_size;
            }
            if let Some(pattern_length) = pattern_length {
                config.battery.pattern_length = pattern_length;
            }
            if let Some(mode) = mode {
                config.battery.serial_mode = mode;
            }
            if let Some(alpha) = alpha {
                config.battery.significance = Significance::new(alpha)?;
            }

            let bits = if let Some(path) = input {
                read_bits(path)?
            } else if let Some(len) = reference {
                info!("Testing {} bits of the ChaCha20 reference source", len);
                ReferenceSource::from_seed(reference_seed).bits(len)
            } else {
                let lfsr = config.generator.build()?;
                let bits = lfsr.generate()?;
                info!(
                    "Testing LFSR cycle: seed={:#b} taps={:?} nbits={} period={}",
                    lfsr.seed(),
                    lfsr.taps(),
                    lfsr.nbits(),
                    bits.len()
                );
                bits
            };

            let battery = Battery::new(config.battery)?;
            debug!("Battery configuration: {:?}", battery.config());
            let report = battery.run(&bits)?;
            print_report(&report);
            Ok(report.all_passed())
        }
    }
}

fn read_bits(path: PathBuf) -> Result<BitSequence, CliError> {
    let content = std::fs::read_to_string(&path).map_err(|source| CliError::Input {
        path: path.clone(),
        source,
    })?;
    let digits: String = content.split_whitespace().collect();
    let bits: BitSequence = digits.parse()?;
    info!("Read {} bits from {}", bits.len(), path.display());
    Ok(bits)
}

fn print_report(report: &BatteryReport) {
    println!(
        "{} bits, significance level {}",
        report.sequence_len,
        report.significance.alpha()
    );
    for outcome in &report.outcomes {
        println!(
            "  {:<16} p = {:.6}  {}",
            outcome.kind.to_string(),
            outcome.p_value,
            if outcome.passed { "PASS" } else { "FAIL" }
        );
    }
    if report.all_passed() {
        println!("Consistent with randomness at this significance level.");
    } else {
        println!("Not random: {} test(s) failed.", report.violations().len());
    }
}

//! CLI for qkd-bb84: run a simulated BB84 key exchange.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use qkd_bb84::{KeyExchange, KeyOutcome, ProtocolConfig, ResendStrategy, cipher, exchange_key};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "qkd-bb84")]
#[command(about = "Simulate a BB84 key exchange with an optional intercept-resend eavesdropper")]
#[command(version)]
struct Cli {
    /// JSON configuration file. Flags override values read from it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of qubits Alice sends per attempt
    #[arg(long)]
    qubits: Option<usize>,

    /// Run without an eavesdropper on the channel
    #[arg(long)]
    no_eve: bool,

    /// Probability that Eve intercepts each qubit
    #[arg(long)]
    intercept: Option<f64>,

    /// Per-qubit bit-flip probability of the channel
    #[arg(long)]
    noise: Option<f64>,

    /// QBER above which an attempt is discarded
    #[arg(long)]
    threshold: Option<f64>,

    /// Maximum number of attempts
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Eve forwards the bit she measured instead of a random one
    #[arg(long)]
    faithful_resend: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write the accepted key as a string of '0'/'1' to this file
    #[arg(long)]
    key_out: Option<PathBuf>,

    /// Write per-attempt logs as JSON to this file
    #[arg(long)]
    log_json: Option<PathBuf>,

    /// Encrypt and decrypt this message with the accepted key
    #[arg(long)]
    message: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ProtocolConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ProtocolConfig::from_json(&fs::read_to_string(path)?)?,
        None => ProtocolConfig::default(),
    };

    if let Some(n) = cli.qubits {
        config.qubit_count = n;
    }
    if cli.no_eve {
        config.eve_present = false;
    }
    if let Some(p) = cli.intercept {
        config.intercept_probability = p;
    }
    if let Some(p) = cli.noise {
        config.noise_probability = p;
    }
    if let Some(t) = cli.threshold {
        config.qber_threshold = t;
    }
    if let Some(a) = cli.max_attempts {
        config.max_attempts = a;
    }
    if cli.faithful_resend {
        config.resend = ResendStrategy::MeasuredBit;
    }

    config.validate()?;
    Ok(config)
}

/// Returns whether a key was established.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    log::debug!("configuration: {config:?}");

    let exchange = match cli.seed {
        Some(seed) => exchange_key(&config, &mut StdRng::seed_from_u64(seed))?,
        None => exchange_key(&config, &mut rand::rng())?,
    };

    for attempt in &exchange.attempts {
        println!(
            "attempt {:>2}: sifted {:>4}/{:<4} QBER {:>6.2}% eve detected: {}",
            attempt.attempt,
            attempt.sifted_length,
            attempt.qubit_count,
            attempt.qber * 100.0,
            attempt.eve_detected
        );
    }

    if let Some(path) = &cli.log_json {
        write_attempt_logs(path, &exchange)?;
    }

    let key = match &exchange.outcome {
        KeyOutcome::Established(key) => key,
        KeyOutcome::NoKeyEstablished => {
            println!(
                "no key established after {} attempt(s)",
                exchange.attempt_count()
            );
            return Ok(false);
        }
    };

    println!(
        "key established after {} attempt(s): {} ({} bits)",
        exchange.attempt_count(),
        key,
        key.len()
    );

    if let Some(path) = &cli.key_out {
        fs::write(path, key.to_string())?;
        println!("key saved to {}", path.display());
    }

    if let Some(message) = &cli.message {
        let encrypted = cipher::encrypt_str(message, key.bits())?;
        let decrypted = cipher::decrypt_to_string(&encrypted, key.bits())?;
        println!("encrypted: {encrypted:?}");
        println!("decrypted: {decrypted}");
    }

    Ok(true)
}

fn write_attempt_logs(
    path: &Path,
    exchange: &KeyExchange,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&exchange.attempts)?;
    fs::write(path, json)?;
    Ok(())
}

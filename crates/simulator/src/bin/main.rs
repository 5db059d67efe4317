//! strandsim CLI
//!
//! Validates an experiment from field assignments and runs it on the
//! synthetic kernel.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strandsim_config::{validate, ConfigurationObject};
use strandsim_kernel::{RunReport, Session};
use strandsim_simulator::{SyntheticKernel, SyntheticKernelConfig};
use strandsim_types::{RawFields, RawValue};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strandsim")]
#[command(about = "Configure and run nucleic-acid folding kinetics experiments")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print every field
    Check {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Validate, then run every trajectory on the synthetic kernel
    Run {
        #[command(flatten)]
        fields: FieldArgs,

        /// Drive the kernel as an iterator instead of by callback
        #[arg(long)]
        pull: bool,

        /// Mean synthetic first-passage time in seconds
        #[arg(long, default_value = "0.1")]
        mean_completion_time: f64,

        /// Probability of ending in the first stop condition
        #[arg(long, default_value = "0.8")]
        success_probability: f64,

        /// Attempted moves per simulated second
        #[arg(long, default_value = "1e6")]
        moves_per_second: f64,

        /// Fraction of attempted moves that are rejected
        #[arg(long, default_value = "0.25")]
        rejection_ratio: f64,

        /// Seed used when the experiment sets no initial_seed
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Worker threads (0 = one per core)
        #[arg(long, default_value = "0")]
        threads: usize,

        /// Print the full result set as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// JSON file with field assignments
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Field assignment as NAME=VALUE; VALUE is read as JSON when it parses
    #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, RawValue)>,
}

impl FieldArgs {
    fn load(self) -> Result<RawFields, Box<dyn std::error::Error>> {
        let mut raw = match &self.file {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => RawFields::new(),
        };
        for (name, value) in self.set {
            raw.set(name, value);
        }
        Ok(raw)
    }
}

fn parse_assignment(s: &str) -> Result<(String, RawValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=VALUE, got: {}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing field name in: {}", s));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| RawValue::from(value));
    Ok((name.to_string(), value))
}

fn validated(raw: &RawFields) -> ConfigurationObject {
    match validate(raw) {
        Ok(config) => config,
        Err(report) => {
            eprintln!("{}", report);
            std::process::exit(2);
        }
    }
}

fn print_summary(report: &RunReport) {
    let results = report.results();

    println!(
        "{} ({}): {}/{} trajectories recorded in {:?}",
        results.experiment_tag(),
        results.config().short(),
        results.len(),
        results.requested(),
        report.elapsed()
    );

    if let Some(fraction) = results.completion_fraction() {
        println!("  completion: {:.1}%", fraction * 100.0);
    }
    if let Some(mean) = results.mean_completion_time() {
        println!("  mean completion time: {:.6e} s", mean);
    }

    println!("  termination reasons:");
    for (reason, count) in results.completion_reason_histogram() {
        println!("    {:<16} {}", reason, count);
    }

    let tags = results.stop_tag_histogram();
    if !tags.is_empty() {
        println!("  stop conditions:");
        for (tag, count) in &tags {
            let mfpt = results.mean_first_passage_time(tag).unwrap_or(f64::NAN);
            match results.first_step_rate(tag) {
                Some(rate) => println!(
                    "    {:<16} {:>6}  mfpt {:.6e} s  k1 {:.6e} /M/s",
                    tag, count, mfpt, rate
                ),
                None => println!("    {:<16} {:>6}  mfpt {:.6e} s", tag, count, mfpt),
            }
        }
    }

    for error in report.malformed() {
        println!("  malformed: {}", error);
    }
    if let Some(error) = report.kernel_error() {
        println!("  kernel error: {}", error);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { fields } => {
            let config = validated(&fields.load()?);
            println!("fingerprint {}", config.fingerprint());
            for (field, value) in config.fields() {
                println!("{:<24} {}", field, serde_json::to_string(&value)?);
            }
        }

        Commands::Run {
            fields,
            pull,
            mean_completion_time,
            success_probability,
            moves_per_second,
            rejection_ratio,
            seed,
            threads,
            json,
        } => {
            let session = Session::new(validated(&fields.load()?));
            let kernel = SyntheticKernel::new(
                SyntheticKernelConfig::new(mean_completion_time)
                    .with_success_probability(success_probability)
                    .with_moves_per_second(moves_per_second)
                    .with_rejection_ratio(rejection_ratio)
                    .with_seed(seed)
                    .with_threads(threads),
            );

            let report = if pull {
                session.run_pull(&kernel)
            } else {
                session.run_push(&kernel)
            };

            if json {
                let results = report.into_results();
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_summary(&report);
            }
        }
    }

    Ok(())
}

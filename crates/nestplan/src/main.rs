use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, bail};
use nestplan::{
    MonteCarloReport, OutputFormat, Scenario, init_logging, run_monte_carlo, write_output,
};
use nestplan_core::model::{MonteCarloConfig, MonteCarloProgress};
use nestplan_core::simulation::simulate_lifecycle;
use rand::Rng;

#[derive(Parser, Debug)]
#[command(name = "nestplan")]
#[command(about = "Retirement savings simulator: accumulation then drawdown")]
struct Args {
    /// Path to the data directory (default: ~/.nestplan/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a scenario file filled with the default assumptions
    Init {
        #[arg(default_value = "scenario.yaml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Run one seeded accumulation and drawdown and print every yearly record
    Run {
        scenario: PathBuf,
        /// Seed for the run; falls back to the scenario's Monte Carlo seed
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run many independent trials and print percentile statistics
    MonteCarlo {
        scenario: PathBuf,
        /// Overrides the scenario's iteration count
        #[arg(short = 'n', long)]
        iterations: Option<usize>,
        /// Master seed; overrides the scenario's seed
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".nestplan")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    let _guard = init_logging(&data_dir, &args.log_level)?;
    let today = jiff::Zoned::now().date();

    match args.command {
        Command::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Scenario::default().save(&path)?;
            eprintln!("Wrote {}", path.display());
        }
        Command::Run {
            scenario,
            seed,
            format,
            output,
        } => {
            let scenario = Scenario::load(&scenario)?;
            let params = scenario.to_parameters(today)?;
            let seed = seed
                .or(scenario.monte_carlo.seed)
                .unwrap_or_else(|| rand::rng().random());

            tracing::info!(seed, "running single lifecycle");
            let result = simulate_lifecycle(&params, seed)?;
            write_output(&result, format, output.as_deref())?;
        }
        Command::MonteCarlo {
            scenario,
            iterations,
            seed,
            format,
            output,
        } => {
            let scenario = Scenario::load(&scenario)?;
            let params = scenario.to_parameters(today)?;
            let config = MonteCarloConfig {
                iterations: iterations.unwrap_or(scenario.monte_carlo.iterations),
                seed: seed.or(scenario.monte_carlo.seed),
            };

            tracing::info!(iterations = config.iterations, seed = ?config.seed, "running Monte Carlo");
            let progress = MonteCarloProgress::new();
            let interrupt = progress.clone();
            ctrlc::set_handler(move || interrupt.cancel())
                .wrap_err("Failed to install Ctrl-C handler")?;

            let total = config.iterations;
            let Some(result) = run_monte_carlo(params, config, &progress, |done| {
                eprint!("\r{done}/{total} trials");
            })?
            else {
                eprintln!("\nCancelled");
                return Ok(());
            };
            eprintln!();

            let report = MonteCarloReport::from_result(&result);
            tracing::info!(
                master_seed = report.master_seed,
                depletion_probability = report.depletion_probability,
                "Monte Carlo finished"
            );
            write_output(&report, format, output.as_deref())?;
        }
    }

    Ok(())
}

//! Classic Filter Fuzz CLI
//!
//! Generates random classic packet-filter programs for seeding fuzzing
//! corpora and for inspecting what the generator produces.

mod config;
mod output;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use filter_gen::{ActivePlatform, FilterPlatform, GeneratorConfig, ProgramGenerator};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::output::Format;

#[derive(Parser)]
#[command(name = "filterfuzz")]
#[command(version)]
#[command(about = "Random classic packet-filter program generator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (derived from the system clock if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of programs to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Output format [default: asm, or raw with --output]
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Write each program to <DIR>/prog-<i>.bin instead of stdout
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load(path)?,
        None => GeneratorConfig::default(),
    };
    let seed = cli.seed.unwrap_or_else(clock_seed);
    let format = output::resolve(cli.format, cli.output.is_some())?;

    if cli.verbose {
        // stdout may carry raw program bytes
        eprintln!("{}", "filterfuzz".cyan().bold());
        eprintln!("  {} {}", "Platform:".cyan(), ActivePlatform::NAME);
        eprintln!("  {} {seed}", "Seed:".cyan());
        eprintln!("  {} {config:?}", "Odds:".cyan());
        eprintln!();
    }
    info!("generating {} programs with seed {seed}", cli.count);

    if let Some(dir) = &cli.output {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let mut generator = ProgramGenerator::new(SmallRng::seed_from_u64(seed)).with_config(config);
    let stdout = io::stdout();
    let mut written = 0;

    for i in 0..cli.count {
        let program = match generator.generate() {
            Ok(program) => program,
            Err(err) => {
                warn!("program {i}: {err}");
                eprintln!("{} program {i}: {err}", "skipped".yellow());
                continue;
            }
        };

        match &cli.output {
            Some(dir) => {
                let path = dir.join(format!("prog-{i}.bin"));
                fs::write(&path, output::render(&program, format))
                    .with_context(|| format!("Failed to write program: {}", path.display()))?;
            }
            None => {
                let mut out = stdout.lock();
                if format == Format::Asm && cli.count > 1 {
                    writeln!(out, "; program {i}, {} instructions", program.len())?;
                }
                out.write_all(&output::render(&program, format))?;
            }
        }
        written += 1;
    }

    if cli.verbose {
        eprintln!(
            "{} {written}/{} programs",
            "Generated".green().bold(),
            cli.count
        );
    }

    Ok(())
}

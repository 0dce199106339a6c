//! Multi-core simulator CLI.
//!
//! This binary loads an executable image into a fresh machine and either runs every
//! hart headless, forever, in fixed batches, or drops into the interactive debug
//! console (`-d`). Fatal conditions (allocation failure, unreadable image, a trap
//! during headless execution) are reported on stderr and exit with status 1.

use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcsim_core::common::SimError;
use mcsim_core::{Config, FetchHart, Scheduler};

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    version,
    about = "Multi-core RISC-V functional simulator",
    long_about = "Load an image and run it on N harts sharing one physical memory.\n\nExamples:\n  sim program.elf\n  sim -p 4 -m 128 program.elf\n  sim -d program.elf        (interactive debug console)"
)]
struct Cli {
    /// Start the interactive debug console instead of running headless.
    #[arg(short, long)]
    debug: bool,

    /// Number of harts.
    #[arg(short, long)]
    procs: Option<usize>,

    /// Physical memory size in MiB.
    #[arg(short, long)]
    memory: Option<usize>,

    /// JSON configuration file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Executable image (ELF or raw binary).
    image: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Builds the configuration from file and flags.
fn build_config(cli: &Cli) -> Result<Config, SimError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if cli.debug {
        config.general.interactive = true;
    }
    if let Some(procs) = cli.procs {
        config.system.core_count = procs;
    }
    if let Some(mib) = cli.memory {
        config.system.memory_size = mib.checked_mul(1024 * 1024).ok_or_else(|| {
            SimError::InvalidConfig(format!("memory size of {mib} MiB overflows"))
        })?;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let config = build_config(cli)?;
    let mut sched = Scheduler::from_config(&config, FetchHart::new)?;
    let _entry = sched.load_image(&cli.image)?;
    match sched.run(config.general.interactive)? {}
}

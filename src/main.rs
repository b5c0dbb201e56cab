use std::env;
use std::io::{self, BufWriter};
use std::process;

use anyhow::Result;
use log::{debug, info, LevelFilter};

use nontrivial_param::{analyze, init_logging, AnalysisConfig, DwarfProvider, PKG_NAME, VERSION};

/// nontrivial-param - report by-value class/struct parameters from debug info
fn main() {
    // Initialize logging
    init_logging(LevelFilter::Warn);
    debug!("{} {}", PKG_NAME, VERSION);

    // Exactly one argument: the binary to analyze
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        process::exit(1);
    }

    if let Err(e) = run(&args[1]) {
        eprintln!("{}: {:#}", program_name(&args[0]), e);
        process::exit(1);
    }
}

/// Analyze one binary, writing diagnostics to stderr
fn run(path: &str) -> Result<()> {
    debug!("Loading debug info from {}", path);
    let provider = DwarfProvider::open(path)?;

    let stderr = io::stderr();
    let summary = analyze(&provider, &AnalysisConfig::default(), BufWriter::new(stderr.lock()))?;
    info!("{}: {}", path, summary);

    Ok(())
}

/// Basename of argv[0], for error messages
fn program_name(argv0: &str) -> &str {
    argv0.rsplit('/').next().unwrap_or(argv0)
}

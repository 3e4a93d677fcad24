use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use transitcover::cli::{Cli, Commands};
use transitcover::commands::compute;

/// Map `-v` occurrences to a default level; `RUST_LOG` still takes precedence.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    match &cli.command {
        Commands::Compute(args) => compute::run(&cli, args),
    }
}

use clap::Parser;
use colored::Colorize;
use depflow_core::cli::{self, Cli};
use depflow_core::error::FlowError;
use depflow_core::exit::FlowExit;
use tracing_subscriber::EnvFilter;

fn main() -> FlowExit {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli::execute(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            e.downcast_ref::<FlowError>()
                .map_or(FlowExit::Error, FlowExit::for_error)
        }
    }
}

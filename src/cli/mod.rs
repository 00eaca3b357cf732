// src/cli/mod.rs
//! Command-line front end.

pub mod args;

pub use args::Cli;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::{FlowConfig, OutputFormat};
use crate::exit::FlowExit;
use crate::filter::Filter;
use crate::pipeline::{Pipeline, TracingObserver};
use crate::reporting;
use crate::sink;

/// Runs one analysis as described by the command line.
///
/// # Errors
/// Returns error if the configuration or the filter list cannot be loaded.
/// Fatal run failures are reported and mapped to an exit code instead.
pub fn execute(cli: &Cli) -> Result<FlowExit> {
    let config = load_config(cli)?;
    let filter = Filter::from_file(&cli.filter)
        .with_context(|| format!("reading filter list {}", cli.filter.display()))?;
    if filter.is_empty() {
        tracing::warn!("filter list {} is empty", cli.filter.display());
    }

    let pipeline = Pipeline::from_config(&config)?;
    let destination = config
        .output
        .destination
        .clone()
        .unwrap_or_else(|| default_destination(config.output.format));
    let mut sink = sink::for_format(config.output.format, &destination);

    match pipeline.run_observed(&cli.root, &filter, sink.as_mut(), &mut TracingObserver) {
        Ok(summary) => {
            reporting::print_summary(&summary, &destination);
            Ok(FlowExit::Success)
        }
        Err(e) => {
            reporting::print_fatal(&e);
            Ok(FlowExit::from(&e))
        }
    }
}

/// Loads `depflow.toml` from the project root and applies command-line overrides.
///
/// # Errors
/// Returns error if the file is malformed or the result does not validate.
pub fn load_config(cli: &Cli) -> Result<FlowConfig> {
    let mut config = if cli.root.is_dir() {
        FlowConfig::load(&cli.root)
            .with_context(|| format!("loading configuration from {}", cli.root.display()))?
    } else {
        FlowConfig::new()
    };
    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut FlowConfig, cli: &Cli) {
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    if let Some(output) = &cli.output {
        config.output.destination = Some(output.clone());
    }
    if let Some(scope) = cli.scope {
        config.resolution.scope = scope.into();
    }
    if let Some(roots) = cli.roots {
        config.roots.strategy = roots.into();
    }
    if let Some(jobs) = cli.jobs {
        config.run.parallelism = jobs;
    }
    if cli.no_jdk {
        config.resolution.jdk_builtins = false;
    }
    config
        .resolution
        .external_library_paths
        .extend(cli.libs.iter().cloned());
}

fn default_destination(format: OutputFormat) -> PathBuf {
    match format {
        OutputFormat::Csv => PathBuf::from("depflow-metrics.csv"),
        OutputFormat::JsonLines => PathBuf::from("depflow-metrics.jsonl"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolutionScope;
    use clap::Parser;

    #[test]
    fn test_overrides_win_over_file() {
        let cli = Cli::parse_from([
            "depflow",
            "/does/not/exist",
            "--filter",
            "changed.txt",
            "--format",
            "jsonl",
            "--lib",
            "a.jar",
            "--lib",
            "b.jar",
            "--scope",
            "project",
            "-j",
            "4",
            "-vv",
        ]);
        let config = load_config(&cli).expect("config");

        assert_eq!(cli.verbose, 2);
        assert_eq!(config.output.format, OutputFormat::JsonLines);
        assert_eq!(config.resolution.scope, ResolutionScope::Project);
        assert_eq!(config.resolution.external_library_paths.len(), 2);
        assert_eq!(config.run.parallelism, 4);
        assert_eq!(
            default_destination(config.output.format),
            PathBuf::from("depflow-metrics.jsonl")
        );
    }
}

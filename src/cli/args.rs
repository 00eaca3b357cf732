// src/cli/args.rs
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{OutputFormat, RootStrategy};
use crate::resolve::ResolutionScope;

#[derive(Parser, Debug)]
#[command(
    name = "depflow",
    version,
    about = "Dependency-aware structural metrics for Java projects"
)]
pub struct Cli {
    /// Project root directory
    pub root: PathBuf,

    /// File listing the absolute paths to analyse, one per line
    #[arg(long, short, value_name = "FILE")]
    pub filter: PathBuf,

    /// Where to write the metrics
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// External library: a directory, `.jar` or `.zip` (repeatable)
    #[arg(long = "lib", value_name = "PATH")]
    pub libs: Vec<PathBuf>,

    /// Which project files the resolution index covers
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,

    /// How source roots are detected
    #[arg(long, value_enum)]
    pub roots: Option<RootsArg>,

    /// Units parsed and computed concurrently
    #[arg(long, short)]
    pub jobs: Option<usize>,

    /// Do not register the built-in JDK type catalogue
    #[arg(long)]
    pub no_jdk: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Jsonl,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Jsonl => Self::JsonLines,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeArg {
    Filter,
    Project,
}

impl From<ScopeArg> for ResolutionScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Filter => Self::Filter,
            ScopeArg::Project => Self::Project,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootsArg {
    Package,
    Markers,
}

impl From<RootsArg> for RootStrategy {
    fn from(arg: RootsArg) -> Self {
        match arg {
            RootsArg::Package => Self::Package,
            RootsArg::Markers => Self::Markers,
        }
    }
}

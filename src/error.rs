// src/error.rs
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid project root: {} (must be an existing directory)", path.display())]
    InvalidRoot { path: PathBuf },

    #[error("filter path is not absolute: {}", path.display())]
    InvalidFilterPath { path: PathBuf },

    #[error("I/O error: {source} (path: {})", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("parse failure in {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("result sink failure: {0}")]
    Sink(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unit {} was parsed against a different resolution context", path.display())]
    ContextMismatch { path: PathBuf },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;

impl FlowError {
    /// Wraps an I/O error with the path it happened on.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// Run-level failures abort the whole run; everything else is per unit.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoot { .. } | Self::Sink(_) | Self::Config(_) | Self::Regex(_)
        )
    }
}

// Allow `?` on std::io::Error by converting to FlowError::Io with unknown path.
impl From<std::io::Error> for FlowError {
    fn from(source: std::io::Error) -> Self {
        FlowError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

/// Pipeline stage in which a fatal error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Collecting,
    Parsing,
    Computing,
    Finalizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Collecting => "collecting",
            Self::Parsing => "parsing",
            Self::Computing => "computing",
            Self::Finalizing => "finalizing",
        };
        f.write_str(label)
    }
}

/// A fatal run error together with the stage it aborted.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: FlowError,
}

impl PipelineError {
    #[must_use]
    pub fn new(stage: Stage, source: FlowError) -> Self {
        Self { stage, source }
    }

    /// Adapter for `map_err` that tags an error with the given stage.
    pub fn at(stage: Stage) -> impl Fn(FlowError) -> Self {
        move |source| Self::new(stage, source)
    }
}

// src/exit.rs
//! Standardized process exit codes for `depflow`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

use crate::error::{FlowError, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FlowExit {
    /// Run completed; per-file failures are reported, not fatal.
    Success = 0,
    /// Generic error (e.g. IO).
    Error = 1,
    /// Invalid project root, filter list or configuration.
    InvalidInput = 2,
    /// The result sink could not be opened, written or closed.
    SinkFailure = 3,
}

impl FlowExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn for_error(error: &FlowError) -> Self {
        match error {
            FlowError::InvalidRoot { .. }
            | FlowError::InvalidFilterPath { .. }
            | FlowError::Config(_)
            | FlowError::Regex(_) => Self::InvalidInput,
            FlowError::Sink(_) => Self::SinkFailure,
            _ => Self::Error,
        }
    }
}

impl Termination for FlowExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<&PipelineError> for FlowExit {
    fn from(err: &PipelineError) -> Self {
        Self::for_error(&err.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use std::path::PathBuf;

    #[test]
    fn test_exit_mapping() {
        let invalid = PipelineError::new(
            Stage::Collecting,
            FlowError::InvalidRoot {
                path: PathBuf::from("/nope"),
            },
        );
        assert_eq!(FlowExit::from(&invalid), FlowExit::InvalidInput);

        let sink = PipelineError::new(Stage::Finalizing, FlowError::Sink("disk full".into()));
        assert_eq!(FlowExit::from(&sink).code(), 3);
    }
}

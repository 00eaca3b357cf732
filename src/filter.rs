// src/filter.rs
//! The externally supplied, ordered list of files to analyse.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    paths: Vec<PathBuf>,
}

impl Filter {
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads one path per line; blank lines and `#` comments are ignored.
    ///
    /// # Errors
    /// Returns error if the list file cannot be read.
    pub fn from_file(list: &Path) -> Result<Self> {
        let content = fs::read_to_string(list).map_err(|e| FlowError::io(e, list))?;
        Ok(Self::parse(&content))
    }

    #[must_use]
    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Entries that pass the absolute-path check.
    pub fn absolute_paths(&self) -> impl Iterator<Item = &Path> {
        self.paths
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| p.is_absolute())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

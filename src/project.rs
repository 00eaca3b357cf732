// src/project.rs
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::discovery::{self, PackageLayoutDetector, RootDetector};
use crate::error::{FlowError, Result};

/// The discovered source roots of one project run.
///
/// Never empty, and every root existed as a directory when it was collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectModel {
    root: PathBuf,
    source_roots: Vec<PathBuf>,
    archives: Vec<PathBuf>,
}

impl ProjectModel {
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    /// Library archives found inside the project tree.
    #[must_use]
    pub fn archives(&self) -> &[PathBuf] {
        &self.archives
    }
}

/// Walks a project directory and builds its [`ProjectModel`].
pub struct SourceRootCollector {
    detector: Box<dyn RootDetector>,
    collect_archives: bool,
    exclude: Vec<Regex>,
}

impl Default for SourceRootCollector {
    fn default() -> Self {
        Self::new(Box::new(PackageLayoutDetector::default()))
    }
}

impl SourceRootCollector {
    #[must_use]
    pub fn new(detector: Box<dyn RootDetector>) -> Self {
        Self {
            detector,
            collect_archives: true,
            exclude: Vec::new(),
        }
    }

    #[must_use]
    pub fn collect_archives(mut self, enabled: bool) -> Self {
        self.collect_archives = enabled;
        self
    }

    #[must_use]
    pub fn exclude(mut self, patterns: Vec<Regex>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Discovers the source roots beneath `root`.
    ///
    /// Falls back to `root` itself when the detector finds nothing.
    ///
    /// # Errors
    /// Returns `InvalidRoot` if `root` does not exist or is not a directory.
    pub fn collect(&self, root: &Path) -> Result<ProjectModel> {
        if !root.is_dir() {
            return Err(FlowError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        let root = std::path::absolute(root).map_err(|e| FlowError::io(e, root))?;

        let mut source_roots: Vec<PathBuf> = self
            .detector
            .detect(&root)
            .into_iter()
            .filter(|r| r.is_dir())
            .collect();
        source_roots.sort();
        source_roots.dedup();

        if source_roots.is_empty() {
            tracing::warn!(
                "{} detector found no source roots under {}; using the project root",
                self.detector.name(),
                root.display()
            );
            source_roots.push(root.clone());
        }

        let archives = if self.collect_archives {
            discovery::find_archives(&root, &self.exclude)
        } else {
            Vec::new()
        };

        tracing::info!(
            "collected {} source root(s) and {} archive(s) under {}",
            source_roots.len(),
            archives.len(),
            root.display()
        );

        Ok(ProjectModel {
            root,
            source_roots,
            archives,
        })
    }
}

/// Collects with the default package-layout strategy.
///
/// # Errors
/// Returns `InvalidRoot` if `root` does not exist or is not a directory.
pub fn collect(root: &Path) -> Result<ProjectModel> {
    SourceRootCollector::default().collect(root)
}

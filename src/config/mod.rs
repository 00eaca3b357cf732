// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::types::{
    FlowConfig, OutputConfig, OutputFormat, ResolutionConfig, RootStrategy, RootsConfig, RunConfig,
};

use regex::Regex;
use std::path::{Path, PathBuf};

use crate::discovery::{BuildMarkerDetector, PackageLayoutDetector, RootDetector};
use crate::error::Result;
use crate::project::SourceRootCollector;
use crate::resolve::ContextConfig;

impl FlowConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `depflow.toml` from `root`, or defaults when it is absent.
    ///
    /// # Errors
    /// Returns error if the file exists but is unreadable or malformed.
    pub fn load(root: &Path) -> Result<Self> {
        io::load_toml_config(root)
    }

    /// Parses configuration text.
    ///
    /// # Errors
    /// Returns error if the TOML is malformed.
    pub fn parse_toml(content: &str) -> Result<Self> {
        io::parse_toml(content)
    }

    /// Resolution settings together with the root exclude patterns.
    ///
    /// # Errors
    /// Returns error if an exclude pattern is not a valid regex.
    pub fn context_config(&self) -> Result<ContextConfig> {
        Ok(ContextConfig {
            exclude: self.roots.exclude_patterns()?,
            ..self.resolution.to_context_config()
        })
    }

    /// Anchors relative paths at `base`, the directory the file was loaded from.
    pub fn rebase(&mut self, base: &Path) {
        if let Some(roots) = &mut self.resolution.source_roots {
            roots.iter_mut().for_each(|p| rebase_path(base, p));
        }
        for path in &mut self.resolution.external_library_paths {
            rebase_path(base, path);
        }
        if let Some(destination) = &mut self.output.destination {
            rebase_path(base, destination);
        }
    }

    /// Validates configuration.
    ///
    /// # Errors
    /// Returns error if an exclude pattern is not a valid regex.
    pub fn validate(&self) -> Result<()> {
        self.roots.exclude_patterns()?;
        Ok(())
    }
}

impl RootsConfig {
    /// Compiles the exclude patterns.
    ///
    /// # Errors
    /// Returns error if a pattern is not a valid regex.
    pub fn exclude_patterns(&self) -> Result<Vec<Regex>> {
        self.exclude
            .iter()
            .map(|p| Regex::new(p).map_err(Into::into))
            .collect()
    }

    /// Builds the configured root detection strategy.
    ///
    /// # Errors
    /// Returns error if an exclude pattern is not a valid regex.
    pub fn to_detector(&self) -> Result<Box<dyn RootDetector>> {
        let exclude = self.exclude_patterns()?;
        let detector: Box<dyn RootDetector> = match self.strategy {
            RootStrategy::Package => Box::new(PackageLayoutDetector::new(exclude)),
            RootStrategy::Markers => Box::new(BuildMarkerDetector::new(
                self.markers.clone(),
                self.source_dirs.clone(),
                exclude,
            )),
        };
        Ok(detector)
    }

    /// Builds the source-root collector for this configuration.
    ///
    /// # Errors
    /// Returns error if an exclude pattern is not a valid regex.
    pub fn to_collector(&self) -> Result<SourceRootCollector> {
        Ok(SourceRootCollector::new(self.to_detector()?)
            .collect_archives(self.collect_archives)
            .exclude(self.exclude_patterns()?))
    }
}

impl ResolutionConfig {
    /// Converts to the resolution context's config format, without excludes.
    #[must_use]
    pub fn to_context_config(&self) -> ContextConfig {
        ContextConfig {
            source_roots: self.source_roots.clone(),
            external_library_paths: self.external_library_paths.clone(),
            cache_enabled: self.cache_enabled,
            jdk_builtins: self.jdk_builtins,
            scope: self.scope,
            exclude: Vec::new(),
        }
    }
}

fn rebase_path(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        let joined = base.join(&*path);
        *path = std::path::absolute(&joined).unwrap_or(joined);
    }
}

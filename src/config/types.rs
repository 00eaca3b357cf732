use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolve::ResolutionScope;

/// Contents of `depflow.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub roots: RootsConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootStrategy {
    /// A root is wherever a file's directory matches its package path.
    #[default]
    Package,
    /// Build-tool markers (`pom.xml`, `build.gradle`) plus conventional source dirs.
    Markers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootsConfig {
    #[serde(default)]
    pub strategy: RootStrategy,
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
    #[serde(default = "default_source_dirs")]
    pub source_dirs: Vec<String>,
    /// Regexes matched against `/`-separated paths; matching directories are not walked.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Register `.jar` archives found in the project tree as external libraries.
    #[serde(default = "default_true")]
    pub collect_archives: bool,
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            strategy: RootStrategy::default(),
            markers: default_markers(),
            source_dirs: default_source_dirs(),
            exclude: Vec::new(),
            collect_archives: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub scope: ResolutionScope,
    /// Subset of discovered roots to register. Unset means all of them.
    #[serde(default)]
    pub source_roots: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub external_library_paths: Vec<PathBuf>,
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    #[serde(default = "default_true")]
    pub jdk_builtins: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            scope: ResolutionScope::default(),
            source_roots: None,
            external_library_paths: Vec::new(),
            cache_enabled: true,
            jdk_builtins: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "csv")]
    Csv,
    #[serde(rename = "jsonl")]
    JsonLines,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Units parsed and computed concurrently; 1 keeps strict per-unit streaming.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_parallelism() -> usize {
    1
}

fn default_markers() -> Vec<String> {
    vec!["pom.xml".into(), "build.gradle".into(), "build.gradle.kts".into()]
}

fn default_source_dirs() -> Vec<String> {
    vec!["src/main/java".into(), "src/test/java".into()]
}

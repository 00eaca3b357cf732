// src/discovery.rs
//! Source-root detection strategies.

use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::constants::should_prune;
use crate::graph::{self, imports};
use crate::lang::Lang;

/// Pluggable policy deciding which directories are source roots.
pub trait RootDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the source roots found beneath `project_root`.
    fn detect(&self, project_root: &Path) -> Vec<PathBuf>;
}

/// Finds roots from package declarations: a file `R/a/b/X.java` declaring
/// `package a.b;` makes `R` a source root.
#[derive(Debug, Default)]
pub struct PackageLayoutDetector {
    exclude: Vec<Regex>,
}

impl PackageLayoutDetector {
    #[must_use]
    pub fn new(exclude: Vec<Regex>) -> Self {
        Self { exclude }
    }
}

impl RootDetector for PackageLayoutDetector {
    fn name(&self) -> &'static str {
        "package"
    }

    fn detect(&self, project_root: &Path) -> Vec<PathBuf> {
        let mut roots: BTreeSet<PathBuf> = BTreeSet::new();
        let mut walker = walker(project_root).into_iter();
        let mut errors = 0;

        while let Some(item) = walker.next() {
            let entry = match item {
                Ok(entry) => entry,
                Err(_) => {
                    errors += 1;
                    continue;
                }
            };
            let path = entry.path();

            if entry.file_type().is_dir() {
                if is_pruned(&entry, &self.exclude) || under_any(path, &roots) {
                    walker.skip_current_dir();
                }
                continue;
            }

            if Lang::from_path(path).is_none() || under_any(path, &roots) {
                continue;
            }

            if let Some(root) = root_of_file(path) {
                tracing::debug!("source root {} (from {})", root.display(), path.display());
                roots.insert(root);
            }
        }

        report_walk_errors(errors);
        roots.into_iter().collect()
    }
}

/// Finds roots from build-tool markers: every directory containing one of
/// `markers` contributes those of `source_dirs` that exist beneath it.
#[derive(Debug)]
pub struct BuildMarkerDetector {
    markers: Vec<String>,
    source_dirs: Vec<String>,
    exclude: Vec<Regex>,
}

impl BuildMarkerDetector {
    #[must_use]
    pub fn new(markers: Vec<String>, source_dirs: Vec<String>, exclude: Vec<Regex>) -> Self {
        Self {
            markers,
            source_dirs,
            exclude,
        }
    }
}

impl RootDetector for BuildMarkerDetector {
    fn name(&self) -> &'static str {
        "markers"
    }

    fn detect(&self, project_root: &Path) -> Vec<PathBuf> {
        let mut roots: BTreeSet<PathBuf> = BTreeSet::new();
        let mut errors = 0;

        let walker = walker(project_root)
            .into_iter()
            .filter_entry(|e| !is_pruned(e, &self.exclude));

        for item in walker {
            let Ok(entry) = item else {
                errors += 1;
                continue;
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let dir = entry.path();
            if !self.markers.iter().any(|m| dir.join(m).is_file()) {
                continue;
            }
            for source_dir in &self.source_dirs {
                let candidate = dir.join(source_dir);
                if candidate.is_dir() {
                    roots.insert(candidate);
                }
            }
        }

        report_walk_errors(errors);
        roots.into_iter().collect()
    }
}

/// Finds `.jar` archives beneath the project root.
#[must_use]
pub fn find_archives(project_root: &Path, exclude: &[Regex]) -> Vec<PathBuf> {
    let mut archives: Vec<PathBuf> = walker(project_root)
        .into_iter()
        .filter_entry(|e| !is_pruned(e, exclude))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "jar"))
        .map(DirEntry::into_path)
        .collect();
    archives.sort();
    archives
}

/// Lists the Java sources beneath `root` in a stable order, skipping excluded directories.
#[must_use]
pub fn java_files_under(root: &Path, exclude: &[Regex]) -> Vec<PathBuf> {
    walker(root)
        .into_iter()
        .filter_entry(|e| !is_pruned(e, exclude))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && Lang::from_path(e.path()).is_some())
        .map(DirEntry::into_path)
        .collect()
}

fn walker(root: &Path) -> WalkDir {
    WalkDir::new(root).follow_links(false).sort_by_file_name()
}

/// The walk root itself is never pruned, even when its name looks hidden.
fn is_pruned(entry: &DirEntry, exclude: &[Regex]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    if should_prune(&entry.file_name().to_string_lossy()) {
        return true;
    }
    let normalized = normalize_path(entry.path());
    exclude.iter().any(|re| re.is_match(&normalized))
}

fn under_any(path: &Path, roots: &BTreeSet<PathBuf>) -> bool {
    roots.iter().any(|r| path.starts_with(r))
}

/// Strips the package path off the file's directory.
fn root_of_file(path: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(path).ok()?;
    let tree = graph::parse_tree(Lang::Java, &content)?;
    let mut dir = path.parent()?;

    let Some(package) = imports::package(&tree, &content) else {
        return Some(dir.to_path_buf());
    };

    for segment in package.rsplit('.') {
        if dir.file_name()? != segment {
            tracing::debug!(
                "{} declares package {package} but does not live in a matching directory",
                path.display()
            );
            return None;
        }
        dir = dir.parent()?;
    }

    Some(dir.to_path_buf())
}

/// Normalizes a path to use forward slashes (cross-platform pattern matching).
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn report_walk_errors(count: usize) {
    if count > 0 {
        tracing::warn!("encountered {count} errors during file walk");
    }
}

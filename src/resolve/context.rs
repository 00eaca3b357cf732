// src/resolve/context.rs
//! The project-wide resolution context shared by every unit of a run.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;

use super::index::{DeclId, Declaration, FileId, Library, SymbolTable};
use super::scope::{Resolution, Resolver};
use super::{jdk, library};
use crate::discovery;
use crate::filter::Filter;
use crate::graph::coupling::compute_coupling;
use crate::graph::{self, Coupling, UnitSyntax};
use crate::lang::Lang;
use crate::project::ProjectModel;

/// Which project files the context indexes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionScope {
    /// Only filter entries lying under a registered root.
    #[default]
    Filter,
    /// Every source file under the registered roots.
    Project,
}

#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Roots to register; `None` registers every root of the model.
    pub source_roots: Option<Vec<PathBuf>>,
    pub external_library_paths: Vec<PathBuf>,
    pub cache_enabled: bool,
    pub jdk_builtins: bool,
    pub scope: ResolutionScope,
    /// Directories matching these are not indexed in project scope.
    pub exclude: Vec<Regex>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            source_roots: None,
            external_library_paths: Vec::new(),
            cache_enabled: true,
            jdk_builtins: true,
            scope: ResolutionScope::default(),
            exclude: Vec::new(),
        }
    }
}

/// Process-unique identity of a context, stamped on every unit parsed against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// File-level dependency edges and per-declaration referrers.
#[derive(Debug, Default)]
struct EdgeIndex {
    forward: HashMap<FileId, BTreeSet<FileId>>,
    reverse: HashMap<FileId, BTreeSet<FileId>>,
    referrers: HashMap<DeclId, BTreeSet<FileId>>,
    coupling: HashMap<FileId, Coupling>,
}

pub struct ResolutionContext {
    id: ContextId,
    lang: Lang,
    roots: Vec<PathBuf>,
    symbols: SymbolTable,
    edges: EdgeIndex,
    skipped_libraries: Vec<PathBuf>,
    cache: Option<RwLock<HashMap<String, Option<DeclId>>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ResolutionContext {
    /// Builds the context for one run.
    ///
    /// Never fails: unreadable files and library paths are logged and skipped.
    #[must_use]
    pub fn build(model: &ProjectModel, config: &ContextConfig, filter: &Filter) -> Self {
        let roots = registered_roots(model, config);
        let mut ctx = Self {
            id: ContextId(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed)),
            lang: Lang::Java,
            roots,
            symbols: SymbolTable::default(),
            edges: EdgeIndex::default(),
            skipped_libraries: Vec::new(),
            cache: config.cache_enabled.then(|| RwLock::new(HashMap::new())),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        };

        let files = ctx.files_in_scope(config, filter);
        let summaries = ctx.index_declarations(&files);
        ctx.register_libraries(model, config);
        ctx.index_edges(&summaries);

        tracing::info!(
            "resolution context: {} root(s), {} indexed file(s), {} librar(ies), {} skipped",
            ctx.roots.len(),
            ctx.symbols.file_count(),
            ctx.symbols.libraries().count(),
            ctx.skipped_libraries.len()
        );
        ctx
    }

    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Library paths that could not be loaded.
    #[must_use]
    pub fn skipped_libraries(&self) -> &[PathBuf] {
        &self.skipped_libraries
    }

    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.symbols.libraries()
    }

    #[must_use]
    pub fn indexed_files(&self) -> usize {
        self.symbols.file_count()
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Looks a fully qualified name up: project first, then libraries in order.
    #[must_use]
    pub fn lookup(&self, fqn: &str) -> Option<DeclId> {
        let Some(cache) = &self.cache else {
            return self.symbols.lookup(fqn);
        };

        if let Some(hit) = cache.read().ok().and_then(|c| c.get(fqn).copied()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let found = self.symbols.lookup(fqn);
        if let Ok(mut c) = cache.write() {
            c.insert(fqn.to_string(), found);
        }
        found
    }

    #[must_use]
    pub fn declaration(&self, id: DeclId) -> &Declaration {
        self.symbols.get(id)
    }

    #[must_use]
    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.symbols.file_id(path)
    }

    #[must_use]
    pub fn file_path(&self, id: FileId) -> &Path {
        self.symbols.file_path(id)
    }

    #[must_use]
    pub fn is_project_package(&self, package: &str) -> bool {
        self.symbols.is_project_package(package)
    }

    /// Resolver for a unit; `path` ties the unit to its indexed file, if any.
    #[must_use]
    pub fn resolver<'a>(&'a self, syntax: &'a UnitSyntax, path: &Path) -> Resolver<'a> {
        Resolver::new(self, syntax, self.file_id(path))
    }

    /// Indexed files the given file depends on.
    pub fn dependencies(&self, file: FileId) -> impl Iterator<Item = FileId> + '_ {
        self.edges.forward.get(&file).into_iter().flatten().copied()
    }

    /// Indexed files depending on the given file.
    pub fn dependents(&self, file: FileId) -> impl Iterator<Item = FileId> + '_ {
        self.edges.reverse.get(&file).into_iter().flatten().copied()
    }

    /// Number of distinct other files referencing a declaration.
    #[must_use]
    pub fn referrer_count(&self, decl: DeclId) -> usize {
        self.edges.referrers.get(&decl).map_or(0, BTreeSet::len)
    }

    /// Afferent/efferent coupling of an indexed file.
    #[must_use]
    pub fn coupling(&self, file: FileId) -> Coupling {
        self.edges.coupling.get(&file).copied().unwrap_or_default()
    }

    fn files_in_scope(&self, config: &ContextConfig, filter: &Filter) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = match config.scope {
            ResolutionScope::Project => self
                .roots
                .iter()
                .flat_map(|root| discovery::java_files_under(root, &config.exclude))
                .collect(),
            ResolutionScope::Filter => filter
                .absolute_paths()
                .filter(|p| Lang::from_path(p) == Some(self.lang))
                .filter(|p| self.roots.iter().any(|r| p.starts_with(r)))
                .map(Path::to_path_buf)
                .collect(),
        };
        files.sort();
        files.dedup();
        files
    }

    /// First pass: declarations and packages of every file in scope.
    fn index_declarations(&mut self, files: &[PathBuf]) -> Vec<(FileId, UnitSyntax)> {
        let mut summaries = Vec::with_capacity(files.len());

        for path in files {
            let Some(syntax) = read_syntax(self.lang, path) else {
                continue;
            };
            let file = self.symbols.add_file(path);
            if let Some(pkg) = &syntax.package {
                self.symbols.add_package(pkg);
            }
            for def in &syntax.declarations {
                self.symbols
                    .declare_project(syntax.qualify(def), def.kind, file);
            }
            summaries.push((file, syntax));
        }

        summaries
    }

    fn register_libraries(&mut self, model: &ProjectModel, config: &ContextConfig) {
        let paths = model.archives().iter().chain(&config.external_library_paths);

        for path in paths {
            match library::load(path) {
                Ok(names) => {
                    tracing::debug!("library {} provides {} types", path.display(), names.len());
                    self.symbols.add_library(path.display().to_string(), names);
                }
                Err(e) => {
                    tracing::warn!("skipping library {}: {e}", path.display());
                    self.skipped_libraries.push(path.clone());
                }
            }
        }

        if config.jdk_builtins {
            self.symbols
                .add_library(jdk::LIBRARY_NAME.to_string(), jdk::catalogue());
        }
    }

    /// Second pass: resolve every indexed file's references into edges.
    fn index_edges(&mut self, summaries: &[(FileId, UnitSyntax)]) {
        let mut edges = EdgeIndex::default();

        for (file, syntax) in summaries {
            let resolver = Resolver::new(self, syntax, Some(*file));
            for (_, resolution) in resolver.resolve_all() {
                let Resolution::Internal(decl) = resolution else {
                    continue;
                };
                let Some(target) = self.declaration(decl).file() else {
                    continue;
                };
                edges.forward.entry(*file).or_default().insert(target);
                edges.reverse.entry(target).or_default().insert(*file);
                edges.referrers.entry(decl).or_default().insert(*file);
            }
        }

        edges.coupling = compute_coupling(
            edges
                .forward
                .iter()
                .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to))),
        );
        self.edges = edges;
    }
}

fn registered_roots(model: &ProjectModel, config: &ContextConfig) -> Vec<PathBuf> {
    let Some(requested) = &config.source_roots else {
        return model.source_roots().to_vec();
    };

    let mut roots = Vec::new();
    for root in requested {
        if root.is_dir() {
            roots.push(root.clone());
        } else {
            tracing::warn!("ignoring source root {}: not a directory", root.display());
        }
    }
    roots.sort();
    roots.dedup();
    roots
}

fn read_syntax(lang: Lang, path: &Path) -> Option<UnitSyntax> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("not indexing {}: {e}", path.display());
            return None;
        }
    };
    let tree = graph::parse_tree(lang, &content)?;
    Some(graph::extract(&tree, &content))
}

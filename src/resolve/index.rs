// src/resolve/index.rs
//! Declaration arena and the project / library name tables over it.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::graph::DefKind;

/// Stable identity of a declaration within one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

/// Stable identity of an indexed project file within one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Project { file: FileId },
    Library { library: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub fqn: String,
    pub kind: Option<DefKind>,
    pub origin: Origin,
}

impl Declaration {
    #[must_use]
    pub fn file(&self) -> Option<FileId> {
        match self.origin {
            Origin::Project { file } => Some(file),
            Origin::Library { .. } => None,
        }
    }
}

/// A named set of externally provided declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    decls: Vec<Declaration>,
    project: HashMap<String, DeclId>,
    libraries: Vec<(Library, HashMap<String, DeclId>)>,
    files: Vec<PathBuf>,
    file_ids: HashMap<PathBuf, FileId>,
    packages: HashSet<String>,
}

impl SymbolTable {
    pub fn add_file(&mut self, path: &Path) -> FileId {
        if let Some(id) = self.file_ids.get(path) {
            return *id;
        }
        let id = FileId(index_u32(self.files.len()));
        self.files.push(path.to_path_buf());
        self.file_ids.insert(path.to_path_buf(), id);
        id
    }

    pub fn add_package(&mut self, package: &str) {
        self.packages.insert(package.to_string());
    }

    /// Registers a project declaration. The first file to declare a name wins.
    pub fn declare_project(&mut self, fqn: String, kind: DefKind, file: FileId) -> DeclId {
        if let Some(existing) = self.project.get(&fqn) {
            tracing::warn!(
                "duplicate declaration of {fqn} in {}; keeping the first one",
                self.file_path(file).display()
            );
            return *existing;
        }
        let id = self.push(Declaration {
            fqn: fqn.clone(),
            kind: Some(kind),
            origin: Origin::Project { file },
        });
        self.project.insert(fqn, id);
        id
    }

    /// Registers a library and all the type names it provides.
    pub fn add_library(&mut self, name: String, names: Vec<String>) -> usize {
        let library = self.libraries.len();
        let mut table = HashMap::with_capacity(names.len());
        for fqn in names {
            if table.contains_key(&fqn) {
                continue;
            }
            let id = self.push(Declaration {
                fqn: fqn.clone(),
                kind: None,
                origin: Origin::Library { library },
            });
            table.insert(fqn, id);
        }
        let size = table.len();
        self.libraries.push((Library { name, size }, table));
        library
    }

    #[must_use]
    pub fn lookup_project(&self, fqn: &str) -> Option<DeclId> {
        self.project.get(fqn).copied()
    }

    /// Looks `fqn` up in libraries in registration order.
    #[must_use]
    pub fn lookup_library(&self, fqn: &str) -> Option<DeclId> {
        self.libraries
            .iter()
            .find_map(|(_, table)| table.get(fqn).copied())
    }

    #[must_use]
    pub fn lookup(&self, fqn: &str) -> Option<DeclId> {
        self.lookup_project(fqn).or_else(|| self.lookup_library(fqn))
    }

    /// # Panics
    /// Never for ids handed out by this table.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }

    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn file_path(&self, id: FileId) -> &Path {
        &self.files[id.0 as usize]
    }

    #[must_use]
    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.file_ids.get(path).copied()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_project_package(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.iter().map(|(lib, _)| lib)
    }

    fn push(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(index_u32(self.decls.len()));
        self.decls.push(decl);
        id
    }
}

#[allow(clippy::cast_possible_truncation)]
fn index_u32(len: usize) -> u32 {
    len as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_shadows_library() {
        let mut table = SymbolTable::default();
        let file = table.add_file(Path::new("/p/src/a/T.java"));
        let lib = table.add_library("dep.jar".into(), vec!["a.T".into(), "b.U".into()]);
        let own = table.declare_project("a.T".into(), DefKind::Class, file);

        assert_eq!(table.lookup("a.T"), Some(own));
        assert_eq!(table.get(own).file(), Some(file));

        let u = table.lookup("b.U").expect("library type");
        assert_eq!(table.get(u).origin, Origin::Library { library: lib });
        assert_eq!(table.lookup("c.V"), None);
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut table = SymbolTable::default();
        let f1 = table.add_file(Path::new("/one/T.java"));
        let f2 = table.add_file(Path::new("/two/T.java"));
        let first = table.declare_project("T".into(), DefKind::Class, f1);
        let second = table.declare_project("T".into(), DefKind::Class, f2);
        assert_eq!(first, second);
        assert_eq!(table.get(first).file(), Some(f1));
    }

    #[test]
    fn test_files_are_interned() {
        let mut table = SymbolTable::default();
        let a = table.add_file(Path::new("/a.java"));
        assert_eq!(table.add_file(Path::new("/a.java")), a);
        assert_eq!(table.file_count(), 1);
        assert_eq!(table.file_path(a), Path::new("/a.java"));
    }
}

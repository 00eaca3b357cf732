use std::path::Path;
use tree_sitter::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Java,
}

#[derive(Debug, Clone, Copy)]
pub enum QueryKind {
    Package,
    Imports,
}

impl Lang {
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_ext)
    }

    #[must_use]
    pub fn grammar(self) -> Language {
        match self {
            Self::Java => tree_sitter_java::language(),
        }
    }

    // Indexing is safe: lang_idx and query_idx are bounded by enum variant count
    // which matches the QUERIES array dimensions exactly
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn query(self, kind: QueryKind) -> &'static str {
        let lang_idx = self as usize;
        let query_idx = kind as usize;
        QUERIES[lang_idx][query_idx]
    }

    #[must_use]
    pub fn q_package(self) -> &'static str {
        self.query(QueryKind::Package)
    }

    #[must_use]
    pub fn q_imports(self) -> &'static str {
        self.query(QueryKind::Imports)
    }
}

// [Java] x [Package, Imports]
const QUERIES: [[&str; 2]; 1] = [
    // Java
    [
        r"
            (package_declaration (scoped_identifier) @package)
            (package_declaration (identifier) @package)
        ", // Package
        "(import_declaration) @import", // Imports
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ext() {
        assert_eq!(Lang::from_ext("java"), Some(Lang::Java));
        assert_eq!(Lang::from_ext("rs"), None);
    }

    #[test]
    fn test_queries_compile() {
        let grammar = Lang::Java.grammar();
        assert!(tree_sitter::Query::new(grammar, Lang::Java.q_package()).is_ok());
        assert!(tree_sitter::Query::new(grammar, Lang::Java.q_imports()).is_ok());
    }
}

// src/graph/mod.rs
//! Syntax-level extraction of the facts cross-file resolution needs:
//! package, imports, declared types and type references.

pub mod coupling;
pub mod defs;
pub mod imports;
pub mod refs;

pub use coupling::Coupling;
pub use defs::{DefKind, Definition};
pub use imports::Import;
pub use refs::TypeRef;

use crate::lang::Lang;
use tree_sitter::{Node, Parser, Tree};

/// Everything extracted from one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSyntax {
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub declarations: Vec<Definition>,
    pub references: Vec<TypeRef>,
}

impl UnitSyntax {
    /// Fully qualified name of a declaration of this unit.
    #[must_use]
    pub fn qualify(&self, def: &Definition) -> String {
        match &self.package {
            Some(pkg) => format!("{pkg}.{}", def.qualified),
            None => def.qualified.clone(),
        }
    }

    /// Finds a declaration of this unit by simple name.
    #[must_use]
    pub fn declared(&self, name: &str) -> Option<&Definition> {
        self.declarations.iter().find(|d| d.name == name)
    }
}

/// Extracts the unit facts from an already parsed tree.
#[must_use]
pub fn extract(tree: &Tree, source: &str) -> UnitSyntax {
    UnitSyntax {
        package: imports::package(tree, source),
        imports: imports::extract(tree, source),
        declarations: defs::extract(tree, source),
        references: refs::extract(tree, source),
    }
}

/// Parses source text with the grammar of `lang`.
#[must_use]
pub fn parse_tree(lang: Lang, source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    parser.set_language(lang.grammar()).ok()?;
    parser.parse(source, None)
}

/// Pre-order walk over the named nodes below (and including) `root`.
pub fn visit_named<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_named() {
            visit(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_unit_syntax() {
        let code = r"
            package p;
            import q.Dep;
            public class A { Dep dep; static class In {} }
        ";
        let tree = parse_tree(Lang::Java, code).expect("tree");
        let syntax = extract(&tree, code);

        assert_eq!(syntax.package.as_deref(), Some("p"));
        assert_eq!(syntax.imports.len(), 1);
        assert_eq!(syntax.declarations.len(), 2);
        assert!(syntax.references.iter().any(|r| r.name == "Dep"));

        let inner = syntax.declared("In").expect("In");
        assert_eq!(syntax.qualify(inner), "p.A.In");
    }

    #[test]
    fn test_default_package_qualify() {
        let code = "class Solo {}";
        let tree = parse_tree(Lang::Java, code).expect("tree");
        let syntax = extract(&tree, code);
        let solo = syntax.declared("Solo").expect("Solo");
        assert_eq!(syntax.qualify(solo), "Solo");
    }
}

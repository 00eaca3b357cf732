use std::collections::HashMap;
use std::sync::LazyLock;
use tree_sitter::{Node, Tree};

use crate::graph::visit_named;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Definition {
    /// Simple name, e.g. `Inner`.
    pub name: String,
    /// Name relative to the package, e.g. `Outer.Inner`.
    pub qualified: String,
    pub kind: DefKind,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum DefKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

static KIND_MAP: LazyLock<HashMap<&'static str, DefKind>> = LazyLock::new(|| {
    HashMap::from([
        ("class_declaration", DefKind::Class),
        ("interface_declaration", DefKind::Interface),
        ("enum_declaration", DefKind::Enum),
        ("record_declaration", DefKind::Record),
        ("annotation_type_declaration", DefKind::Annotation),
    ])
});

/// Returns the declaration kind of a node, if it declares a type.
#[must_use]
pub fn kind_of(node: Node<'_>) -> Option<DefKind> {
    KIND_MAP.get(node.kind()).copied()
}

/// Extracts every type declaration in the tree, nested ones included.
#[must_use]
pub fn extract(tree: &Tree, source: &str) -> Vec<Definition> {
    let mut defs = Vec::new();
    visit_named(tree.root_node(), |node| {
        if let Some(def) = build_def(node, source) {
            defs.push(def);
        }
    });
    defs
}

fn build_def(node: Node<'_>, source: &str) -> Option<Definition> {
    let kind = kind_of(node)?;
    let name = declared_name(node, source)?;

    let mut segments = vec![name.to_string()];
    let mut parent = node.parent();
    while let Some(p) = parent {
        if kind_of(p).is_some() {
            if let Some(outer) = declared_name(p, source) {
                segments.push(outer.to_string());
            }
        }
        parent = p.parent();
    }
    segments.reverse();

    Some(Definition {
        name: name.to_string(),
        qualified: segments.join("."),
        kind,
        line: node.start_position().row + 1,
    })
}

fn declared_name<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    node.child_by_field_name("name")?
        .utf8_text(source.as_bytes())
        .ok()
}

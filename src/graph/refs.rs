// src/graph/refs.rs
//! Type reference extraction.
//!
//! Collects the names of types a unit mentions: declared types of fields,
//! parameters and locals, supertypes, generic arguments, annotations,
//! instantiations, and the receivers of static-looking member accesses.

use tree_sitter::{Node, Tree};

use crate::graph::visit_named;

/// A textual reference to a type, possibly dotted (`Map.Entry`, `java.util.List`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub line: usize,
}

/// Extracts type references in source order.
#[must_use]
pub fn extract(tree: &Tree, source: &str) -> Vec<TypeRef> {
    let mut refs = Vec::new();

    visit_named(tree.root_node(), |node| {
        let Some(name) = reference_name(node, source) else {
            return;
        };
        let head = name.split('.').next().unwrap_or(&name);
        if head == "var" || is_type_parameter(node, head, source) {
            return;
        }
        refs.push(TypeRef {
            name,
            line: node.start_position().row + 1,
        });
    });

    refs
}

fn reference_name(node: Node<'_>, source: &str) -> Option<String> {
    let parent_kind = node.parent().map(|p| p.kind()).unwrap_or_default();

    match node.kind() {
        "type_identifier"
            if !matches!(parent_kind, "scoped_type_identifier" | "type_parameter") =>
        {
            text(node, source)
        }
        "scoped_type_identifier" if parent_kind != "scoped_type_identifier" => text(node, source),
        "marker_annotation" | "annotation" => node
            .child_by_field_name("name")
            .and_then(|n| text(n, source)),
        "method_invocation" | "field_access" => node
            .child_by_field_name("object")
            .filter(|n| n.kind() == "identifier")
            .and_then(|n| text(n, source))
            .filter(|name| looks_like_type(name)),
        _ => None,
    }
}

/// Whether `name` is a type parameter of a class, interface, record, method
/// or constructor enclosing `node`.
fn is_type_parameter(node: Node<'_>, name: &str, source: &str) -> bool {
    let mut scope = node.parent();
    while let Some(current) = scope {
        let mut cursor = current.walk();
        let declares = current
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "type_parameters")
            .any(|params| declares_parameter(params, name, source));
        if declares {
            return true;
        }
        scope = current.parent();
    }
    false
}

fn declares_parameter(params: Node<'_>, name: &str, source: &str) -> bool {
    let mut cursor = params.walk();
    let found = params
        .named_children(&mut cursor)
        .filter(|p| p.kind() == "type_parameter")
        .any(|param| {
            let mut inner = param.walk();
            let declared = param
                .named_children(&mut inner)
                .find(|c| matches!(c.kind(), "type_identifier" | "identifier"))
                .and_then(|c| text(c, source));
            declared.as_deref() == Some(name)
        });
    found
}

/// `Collections`, `System` yes; `LOGGER`, `count` no.
fn looks_like_type(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase) && name.chars().any(char::is_lowercase)
}

fn text(node: Node<'_>, source: &str) -> Option<String> {
    node.utf8_text(source.as_bytes())
        .ok()
        .map(|t| t.chars().filter(|c| !c.is_whitespace()).collect())
}

// src/graph/imports.rs
use crate::lang::Lang;
use tree_sitter::{Query, QueryCursor, Tree};

/// One `import` declaration of a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    /// Dotted path without the trailing `.*`.
    pub path: String,
    pub on_demand: bool,
    pub is_static: bool,
    pub line: usize,
}

impl Import {
    /// Simple name bound by a single-type import (`a.b.C` binds `C`).
    #[must_use]
    pub fn bound_name(&self) -> Option<&str> {
        if self.on_demand || self.is_static {
            return None;
        }
        self.path.rsplit('.').next()
    }

    /// Type a static import pulls members from.
    ///
    /// `import static a.b.C.m;` yields `a.b.C`; `import static a.b.C.*;` yields `a.b.C`.
    #[must_use]
    pub fn static_owner(&self) -> Option<&str> {
        if !self.is_static {
            return None;
        }
        if self.on_demand {
            return Some(&self.path);
        }
        self.path.rsplit_once('.').map(|(owner, _)| owner)
    }
}

/// Extracts the package name declared by the unit, if any.
#[must_use]
pub fn package(tree: &Tree, source: &str) -> Option<String> {
    let query = compile_query(Lang::Java, Lang::Java.q_package())?;
    let mut cursor = QueryCursor::new();
    let matches = cursor.matches(&query, tree.root_node(), source.as_bytes());

    for m in matches {
        for capture in m.captures {
            if let Ok(text) = capture.node.utf8_text(source.as_bytes()) {
                return Some(strip_whitespace(text));
            }
        }
    }
    None
}

/// Extracts every import declaration in source order.
#[must_use]
pub fn extract(tree: &Tree, source: &str) -> Vec<Import> {
    let Some(query) = compile_query(Lang::Java, Lang::Java.q_imports()) else {
        return Vec::new();
    };

    let mut cursor = QueryCursor::new();
    let matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
    let mut imports = Vec::new();

    for m in matches {
        for capture in m.captures {
            let line = capture.node.start_position().row + 1;
            if let Some(import) = capture
                .node
                .utf8_text(source.as_bytes())
                .ok()
                .and_then(|text| parse_import(text, line))
            {
                imports.push(import);
            }
        }
    }

    imports
}

fn parse_import(text: &str, line: usize) -> Option<Import> {
    let body = text.trim().strip_prefix("import")?;
    let body = body.trim().trim_end_matches(';').trim();

    let (is_static, body) = match body.strip_prefix("static") {
        Some(rest) if rest.starts_with(char::is_whitespace) => (true, rest.trim()),
        _ => (false, body),
    };

    let cleaned = strip_whitespace(body);
    let (path, on_demand) = match cleaned.strip_suffix(".*") {
        Some(p) => (p.to_string(), true),
        None => (cleaned, false),
    };

    if path.is_empty() {
        return None;
    }

    Some(Import {
        path,
        on_demand,
        is_static,
        line,
    })
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn compile_query(lang: Lang, pattern: &str) -> Option<Query> {
    match Query::new(lang.grammar(), pattern) {
        Ok(q) => Some(q),
        Err(e) => {
            tracing::error!("invalid {lang:?} query: {e}");
            None
        }
    }
}

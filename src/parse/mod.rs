// src/parse/mod.rs
//! Parsed compilation units and the failures parsing can produce.

pub mod selective;

pub use selective::{admit, parse_filtered, Admission, ParseReport, SelectiveParser};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

use crate::error::FlowError;
use crate::graph::{self, UnitSyntax};
use crate::lang::Lang;
use crate::resolve::{ContextId, ResolutionContext};

/// One successfully parsed file, bound to the context it was parsed against.
#[derive(Debug)]
pub struct SourceUnit {
    path: PathBuf,
    source: String,
    tree: Tree,
    syntax: UnitSyntax,
    context: ContextId,
}

impl SourceUnit {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[must_use]
    pub fn syntax(&self) -> &UnitSyntax {
        &self.syntax
    }

    #[must_use]
    pub fn context_id(&self) -> ContextId {
        self.context
    }
}

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("could not read file: {0}")]
    Io(#[source] io::Error),

    #[error("syntax error near line {line}")]
    Syntax { line: usize },

    #[error("not a supported source file")]
    Unsupported,
}

impl ParseFailure {
    /// Converts into the crate error for the given file.
    #[must_use]
    pub fn into_error(self, path: &Path) -> FlowError {
        match self {
            Self::Io(source) => FlowError::io(source, path),
            other => FlowError::Parse {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }
}

/// One entry of the parsed sequence.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub outcome: Result<SourceUnit, ParseFailure>,
}

impl ParsedFile {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Parses already-read source text against `ctx`.
///
/// # Errors
/// Returns `Unsupported` for files outside the context's language and
/// `Syntax` when the tree contains errors.
pub fn parse_source(
    path: &Path,
    source: String,
    ctx: &ResolutionContext,
) -> Result<SourceUnit, ParseFailure> {
    let lang = ctx.lang();
    if Lang::from_path(path) != Some(lang) {
        return Err(ParseFailure::Unsupported);
    }

    let mut parser = Parser::new();
    parser
        .set_language(lang.grammar())
        .map_err(|_| ParseFailure::Unsupported)?;
    let tree = parser
        .parse(&source, None)
        .ok_or(ParseFailure::Syntax { line: 1 })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseFailure::Syntax {
            line: first_error_line(root),
        });
    }

    let syntax = graph::extract(&tree, &source);
    Ok(SourceUnit {
        path: path.to_path_buf(),
        source,
        tree,
        syntax,
        context: ctx.id(),
    })
}

fn first_error_line(root: Node<'_>) -> usize {
    let mut node = root;
    loop {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        let mut cursor = node.walk();
        let next = node.children(&mut cursor).find(|c| c.has_error());
        match next {
            Some(child) => node = child,
            None => return node.start_position().row + 1,
        }
    }
}

// src/parse/selective.rs
//! Lazy, filter-ordered parsing of a subset of project files.

use std::fs;
use std::path::{Path, PathBuf};

use super::{parse_source, ParseFailure, ParsedFile, SourceUnit};
use crate::error::FlowError;
use crate::filter::Filter;
use crate::resolve::ResolutionContext;

/// Diagnostics of a selective parse, including entries the sequence omits.
#[derive(Debug, Default)]
pub struct ParseReport {
    /// `InvalidFilterPath` for each relative entry, warned about and excluded.
    pub invalid_paths: Vec<FlowError>,
    /// Files that could not be read; they never appear in the parsed sequence.
    pub unreadable: Vec<(PathBuf, ParseFailure)>,
    /// Absolute entries a read was attempted for.
    pub attempted: usize,
    pub parsed: usize,
    /// Unreadable plus syntactically invalid or unsupported files.
    pub failed: usize,
}

impl ParseReport {
    pub fn note_invalid(&mut self, path: &Path) {
        let err = FlowError::InvalidFilterPath {
            path: path.to_path_buf(),
        };
        tracing::warn!("skipping filter entry: {err}");
        self.invalid_paths.push(err);
    }

    pub fn note_unreadable(&mut self, path: &Path, failure: ParseFailure) {
        tracing::warn!("cannot read {}: {failure}", path.display());
        self.attempted += 1;
        self.failed += 1;
        self.unreadable.push((path.to_path_buf(), failure));
    }

    pub fn note_parsed(&mut self, path: &Path, outcome: Result<(), &ParseFailure>) {
        self.attempted += 1;
        match outcome {
            Ok(()) => {
                tracing::debug!("parsed {}", path.display());
                self.parsed += 1;
            }
            Err(failure) => {
                tracing::warn!("failed to parse {}: {failure}", path.display());
                self.failed += 1;
            }
        }
    }
}

/// What became of one filter entry.
#[derive(Debug)]
pub enum Admission {
    Invalid,
    Unreadable(ParseFailure),
    Parsed(Result<SourceUnit, ParseFailure>),
}

/// Reads and parses a single filter entry. Does not touch any report.
#[must_use]
pub fn admit(path: &Path, ctx: &ResolutionContext) -> Admission {
    if !path.is_absolute() {
        return Admission::Invalid;
    }
    match fs::read_to_string(path) {
        Ok(source) => Admission::Parsed(parse_source(path, source, ctx)),
        Err(e) => Admission::Unreadable(ParseFailure::Io(e)),
    }
}

/// Iterator over the filter entries, parsed one at a time on demand.
pub struct SelectiveParser<'a> {
    entries: std::slice::Iter<'a, PathBuf>,
    ctx: &'a ResolutionContext,
    report: ParseReport,
}

impl<'a> SelectiveParser<'a> {
    #[must_use]
    pub fn new(filter: &'a Filter, ctx: &'a ResolutionContext) -> Self {
        Self {
            entries: filter.paths().iter(),
            ctx,
            report: ParseReport::default(),
        }
    }

    /// Diagnostics for the entries consumed so far.
    #[must_use]
    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    #[must_use]
    pub fn into_report(self) -> ParseReport {
        self.report
    }
}

impl Iterator for SelectiveParser<'_> {
    type Item = ParsedFile;

    fn next(&mut self) -> Option<ParsedFile> {
        for path in self.entries.by_ref() {
            match admit(path, self.ctx) {
                Admission::Invalid => self.report.note_invalid(path),
                Admission::Unreadable(failure) => self.report.note_unreadable(path, failure),
                Admission::Parsed(outcome) => {
                    self.report
                        .note_parsed(path, outcome.as_ref().map(|_| ()));
                    return Some(ParsedFile {
                        path: path.clone(),
                        outcome,
                    });
                }
            }
        }
        None
    }
}

/// Parses every filter entry eagerly.
#[must_use]
pub fn parse_filtered(filter: &Filter, ctx: &ResolutionContext) -> (Vec<ParsedFile>, ParseReport) {
    let mut parser = SelectiveParser::new(filter, ctx);
    let files: Vec<ParsedFile> = parser.by_ref().collect();
    (files, parser.into_report())
}

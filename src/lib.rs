// src/lib.rs
//! Dependency-aware structural metrics for Java projects.
//!
//! A run collects the project's source roots once, builds one shared
//! [`resolve::ResolutionContext`], then parses the filtered files one at a
//! time and streams each unit's metrics to a [`sink::ResultSink`].

pub mod cli;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod filter;
pub mod graph;
pub mod lang;
pub mod metrics;
pub mod parse;
pub mod pipeline;
pub mod project;
pub mod reporting;
pub mod resolve;
pub mod sink;

pub use error::{FlowError, PipelineError, Stage};
pub use filter::Filter;
pub use pipeline::{Pipeline, RunSummary};

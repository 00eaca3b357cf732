// src/pipeline/mod.rs
//! Run orchestration: collect, build the context, then parse, compute and
//! emit one unit at a time.

pub mod observer;

pub use observer::{NoopObserver, PipelineObserver, TracingObserver};

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::config::FlowConfig;
use crate::error::{PipelineError, Result, Stage};
use crate::filter::Filter;
use crate::metrics::{Metric, MetricGenerator};
use crate::parse::{admit, Admission, ParseFailure, ParseReport, SelectiveParser};
use crate::project::SourceRootCollector;
use crate::resolve::{CacheStats, ContextConfig, ResolutionContext};
use crate::sink::{HeaderSchema, ResultSink, SinkGuard};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub parsed: usize,
    /// Unreadable, unparsable and uncomputable files.
    pub failed: usize,
    /// Relative filter entries.
    pub skipped: usize,
    pub metrics: usize,
    pub source_roots: usize,
    pub skipped_libraries: Vec<PathBuf>,
    /// File and error message of every unit that produced no metrics.
    pub failures: Vec<(PathBuf, String)>,
    pub cache: CacheStats,
}

impl RunSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    fn absorb(&mut self, report: ParseReport) {
        self.failures.extend(
            report
                .unreadable
                .into_iter()
                .map(|(path, failure)| failure_entry(&path, failure)),
        );
        self.attempted = report.attempted;
        self.parsed = report.parsed;
        self.failed += report.failed;
        self.skipped = report.invalid_paths.len();
    }
}

pub struct Pipeline {
    collector: SourceRootCollector,
    context: ContextConfig,
    generator: MetricGenerator,
    schema: HeaderSchema,
    parallelism: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collector: SourceRootCollector::default(),
            context: ContextConfig::default(),
            generator: MetricGenerator::default(),
            schema: HeaderSchema::dependency(),
            parallelism: 1,
        }
    }

    /// Builds a pipeline from loaded configuration.
    ///
    /// # Errors
    /// Returns error if the configuration holds an invalid exclude pattern.
    pub fn from_config(config: &FlowConfig) -> Result<Self> {
        Ok(Self::new()
            .with_collector(config.roots.to_collector()?)
            .with_context_config(config.context_config()?)
            .with_parallelism(config.run.parallelism))
    }

    #[must_use]
    pub fn with_collector(mut self, collector: SourceRootCollector) -> Self {
        self.collector = collector;
        self
    }

    #[must_use]
    pub fn with_context_config(mut self, config: ContextConfig) -> Self {
        self.context = config;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: MetricGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Units parsed and computed concurrently; values below 2 run sequentially.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Runs the pipeline once over `filter`.
    ///
    /// # Errors
    /// Returns the stage and cause of a fatal failure: an invalid root or a
    /// failing sink. Per-file failures only show up in the summary.
    pub fn run(
        &self,
        root: &Path,
        filter: &Filter,
        sink: &mut dyn ResultSink,
    ) -> std::result::Result<RunSummary, PipelineError> {
        self.run_observed(root, filter, sink, &mut NoopObserver)
    }

    /// Like [`Pipeline::run`], reporting progress to `observer`.
    ///
    /// # Errors
    /// See [`Pipeline::run`].
    pub fn run_observed(
        &self,
        root: &Path,
        filter: &Filter,
        sink: &mut dyn ResultSink,
        observer: &mut dyn PipelineObserver,
    ) -> std::result::Result<RunSummary, PipelineError> {
        let mut stages = StageTracker::default();

        stages.advance(Stage::Collecting, observer);
        let model = self
            .collector
            .collect(root)
            .map_err(PipelineError::at(Stage::Collecting))?;
        let ctx = ResolutionContext::build(&model, &self.context, filter);

        stages.advance(Stage::Parsing, observer);
        let mut guard =
            SinkGuard::open(sink, &self.schema).map_err(PipelineError::at(Stage::Parsing))?;

        let mut run = Run {
            ctx: &ctx,
            generator: &self.generator,
            guard: &mut guard,
            observer,
            stages: &mut stages,
            summary: RunSummary {
                source_roots: model.source_roots().len(),
                skipped_libraries: ctx.skipped_libraries().to_vec(),
                ..RunSummary::default()
            },
        };
        let report = if self.parallelism > 1 {
            run.stream_parallel(filter, self.parallelism)?
        } else {
            run.stream_sequential(filter)?
        };
        let mut summary = std::mem::take(&mut run.summary);
        run.stages.advance(Stage::Finalizing, run.observer);
        guard.close().map_err(PipelineError::at(Stage::Finalizing))?;

        summary.absorb(report);
        summary.cache = ctx.cache_stats();

        tracing::info!(
            "run finished: {} attempted, {} parsed, {} failed, {} skipped, {} metric(s)",
            summary.attempted,
            summary.parsed,
            summary.failed,
            summary.skipped,
            summary.metrics
        );
        Ok(summary)
    }
}

/// Summary line for a file that produced no metrics.
fn failure_entry(path: &Path, failure: ParseFailure) -> (PathBuf, String) {
    (path.to_path_buf(), failure.into_error(path).to_string())
}

/// Enters each stage at most once, in order.
#[derive(Default)]
struct StageTracker {
    current: Option<Stage>,
}

impl StageTracker {
    fn advance(&mut self, stage: Stage, observer: &mut dyn PipelineObserver) {
        if self.current.is_some_and(|c| c >= stage) {
            return;
        }
        self.current = Some(stage);
        observer.on_stage(stage);
    }
}

/// Result of one filter entry in parallel mode; holds no syntax tree.
enum UnitOutcome {
    Invalid,
    Unreadable(ParseFailure),
    Rejected(ParseFailure),
    Computed(Result<Vec<Metric>>),
}

/// State of one run while units stream through it.
struct Run<'r, 'g> {
    ctx: &'r ResolutionContext,
    generator: &'r MetricGenerator,
    guard: &'r mut SinkGuard<'g>,
    observer: &'r mut dyn PipelineObserver,
    stages: &'r mut StageTracker,
    summary: RunSummary,
}

impl Run<'_, '_> {
    /// Parses, computes and emits each unit before touching the next one.
    fn stream_sequential(
        &mut self,
        filter: &Filter,
    ) -> std::result::Result<ParseReport, PipelineError> {
        let mut parser = SelectiveParser::new(filter, self.ctx);

        for file in parser.by_ref() {
            self.observer.on_unit_parsed(&file.path, file.is_ok());
            let unit = match file.outcome {
                Ok(unit) => unit,
                Err(failure) => {
                    self.summary.failures.push(failure_entry(&file.path, failure));
                    continue;
                }
            };
            self.stages.advance(Stage::Computing, self.observer);
            let computed = self.generator.compute(&unit, self.ctx);
            drop(unit);
            self.settle(&file.path, computed)?;
        }

        Ok(parser.into_report())
    }

    /// Parses and computes `chunk` units at a time with rayon, emitting each
    /// chunk in filter order from the calling thread.
    fn stream_parallel(
        &mut self,
        filter: &Filter,
        chunk: usize,
    ) -> std::result::Result<ParseReport, PipelineError> {
        let mut report = ParseReport::default();
        let (ctx, generator) = (self.ctx, self.generator);

        for paths in filter.paths().chunks(chunk) {
            let outcomes: Vec<UnitOutcome> = paths
                .par_iter()
                .map(|path| match admit(path, ctx) {
                    Admission::Invalid => UnitOutcome::Invalid,
                    Admission::Unreadable(failure) => UnitOutcome::Unreadable(failure),
                    Admission::Parsed(Err(failure)) => UnitOutcome::Rejected(failure),
                    Admission::Parsed(Ok(unit)) => {
                        UnitOutcome::Computed(generator.compute(&unit, ctx))
                    }
                })
                .collect();

            for (path, outcome) in paths.iter().zip(outcomes) {
                match outcome {
                    UnitOutcome::Invalid => report.note_invalid(path),
                    UnitOutcome::Unreadable(failure) => report.note_unreadable(path, failure),
                    UnitOutcome::Rejected(failure) => {
                        report.note_parsed(path, Err(&failure));
                        self.observer.on_unit_parsed(path, false);
                        self.summary.failures.push(failure_entry(path, failure));
                    }
                    UnitOutcome::Computed(computed) => {
                        report.note_parsed(path, Ok(()));
                        self.observer.on_unit_parsed(path, true);
                        self.stages.advance(Stage::Computing, self.observer);
                        self.settle(path, computed)?;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Emits a unit's metrics, or records why it has none.
    fn settle(
        &mut self,
        path: &Path,
        computed: Result<Vec<Metric>>,
    ) -> std::result::Result<(), PipelineError> {
        match computed {
            Ok(metrics) => {
                self.guard
                    .write(&metrics)
                    .map_err(PipelineError::at(Stage::Computing))?;
                self.summary.metrics += metrics.len();
                self.observer.on_batch_emitted(path, metrics.len());
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(PipelineError::new(Stage::Computing, e)),
            Err(e) => {
                tracing::warn!("no metrics for {}: {e}", path.display());
                self.summary.failed += 1;
                self.summary.failures.push((path.to_path_buf(), e.to_string()));
                Ok(())
            }
        }
    }
}

// src/pipeline/observer.rs
use std::path::Path;

use crate::error::Stage;

/// Hooks into a run. Every method defaults to doing nothing.
pub trait PipelineObserver {
    /// Called once when the run enters a stage.
    fn on_stage(&mut self, _stage: Stage) {}

    /// Called after a filter entry was read and parsed, successfully or not.
    fn on_unit_parsed(&mut self, _path: &Path, _ok: bool) {}

    /// Called after a unit's metrics were handed to the sink.
    fn on_batch_emitted(&mut self, _path: &Path, _metrics: usize) {}
}

pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Forwards stage transitions to `tracing`.
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage(&mut self, stage: Stage) {
        tracing::info!("entering {stage} stage");
    }

    fn on_batch_emitted(&mut self, path: &Path, metrics: usize) {
        tracing::debug!("emitted {metrics} metric(s) for {}", path.display());
    }
}

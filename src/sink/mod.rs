// src/sink/mod.rs
//! Destinations for streamed metric batches.

pub mod csv;
pub mod jsonl;

pub use self::csv::CsvSink;
pub use self::jsonl::JsonLinesSink;

use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::metrics::{Metric, ResolutionBreakdown};

/// Column layout of a run's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSchema {
    columns: Vec<&'static str>,
}

impl HeaderSchema {
    /// Columns of a dependency-metric run.
    #[must_use]
    pub fn dependency() -> Self {
        Self {
            columns: vec![
                "unit",
                "metric",
                "value",
                "internal",
                "external",
                "unresolved_project",
                "unresolved_library",
            ],
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Renders a metric as one row of this schema.
    ///
    /// Breakdown columns stay empty for metrics without a breakdown.
    #[must_use]
    pub fn row(&self, metric: &Metric) -> Vec<String> {
        let count = |pick: fn(ResolutionBreakdown) -> usize| {
            metric.breakdown.map(|b| pick(b).to_string()).unwrap_or_default()
        };

        self.columns
            .iter()
            .map(|column| match *column {
                "unit" => metric.unit.display().to_string(),
                "metric" => metric.label(),
                "value" => metric.value.to_string(),
                "internal" => count(|b| b.internal),
                "external" => count(|b| b.external),
                "unresolved_project" => count(|b| b.unresolved_project),
                "unresolved_library" => count(|b| b.unresolved_library),
                _ => String::new(),
            })
            .collect()
    }
}

/// Streaming result destination: opened once, appended to, closed once.
pub trait ResultSink {
    /// # Errors
    /// Returns `Sink` if the destination cannot be prepared.
    fn open(&mut self, schema: &HeaderSchema) -> Result<()>;

    /// Appends one batch.
    ///
    /// # Errors
    /// Returns `Sink` if the batch cannot be written.
    fn write(&mut self, batch: &[Metric]) -> Result<()>;

    /// Flushes and releases the destination. Calling it again is a no-op.
    ///
    /// # Errors
    /// Returns `Sink` if buffered output cannot be flushed.
    fn close(&mut self) -> Result<()>;
}

/// Builds the sink for an output format.
#[must_use]
pub fn for_format(format: OutputFormat, destination: impl Into<PathBuf>) -> Box<dyn ResultSink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(destination)),
        OutputFormat::JsonLines => Box::new(JsonLinesSink::new(destination)),
    }
}

/// Scoped handle on an open sink that closes it exactly once, on every exit path.
pub struct SinkGuard<'a> {
    sink: &'a mut dyn ResultSink,
    closed: bool,
}

impl<'a> SinkGuard<'a> {
    /// Opens `sink` with `schema`.
    ///
    /// # Errors
    /// Returns the sink's open error; the sink is then closed before returning.
    pub fn open(sink: &'a mut dyn ResultSink, schema: &HeaderSchema) -> Result<Self> {
        let guard = Self {
            sink,
            closed: false,
        };
        guard.sink.open(schema)?;
        Ok(guard)
    }

    /// # Errors
    /// Returns the sink's write error.
    pub fn write(&mut self, batch: &[Metric]) -> Result<()> {
        self.sink.write(batch)
    }

    /// Closes the sink and reports the outcome.
    ///
    /// # Errors
    /// Returns the sink's close error.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.sink.close()
    }
}

impl Drop for SinkGuard<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.sink.close() {
            tracing::warn!("closing result sink after an aborted run failed: {e}");
        }
    }
}

/// In-memory sink, handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub header: Option<HeaderSchema>,
    pub metrics: Vec<Metric>,
    pub batches: usize,
    pub closes: usize,
}

impl ResultSink for MemorySink {
    fn open(&mut self, schema: &HeaderSchema) -> Result<()> {
        self.header = Some(schema.clone());
        Ok(())
    }

    fn write(&mut self, batch: &[Metric]) -> Result<()> {
        self.batches += 1;
        self.metrics.extend_from_slice(batch);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use std::path::Path;

    #[test]
    fn test_row_rendering() {
        let schema = HeaderSchema::dependency();
        let plain = Metric::count(Path::new("/p/A.java"), "imports", 2);
        assert_eq!(schema.row(&plain), vec!["/p/A.java", "imports", "2", "", "", "", ""]);

        let with_breakdown = Metric::count(Path::new("/p/A.java"), "fan-out", 3).with_breakdown(
            ResolutionBreakdown {
                internal: 1,
                external: 2,
                unresolved_project: 0,
                unresolved_library: 4,
            },
        );
        assert_eq!(
            schema.row(&with_breakdown),
            vec!["/p/A.java", "fan-out", "3", "1", "2", "0", "4"]
        );
    }

    #[test]
    fn test_guard_closes_once_on_drop() {
        let mut sink = MemorySink::default();
        {
            let mut guard = SinkGuard::open(&mut sink, &HeaderSchema::dependency()).expect("open");
            guard.write(&[]).expect("write");
        }
        assert_eq!(sink.closes, 1);
    }

    #[test]
    fn test_guard_explicit_close_is_not_repeated() {
        let mut sink = MemorySink::default();
        let guard = SinkGuard::open(&mut sink, &HeaderSchema::dependency()).expect("open");
        guard.close().expect("close");
        assert_eq!(sink.closes, 1);
    }

    struct FailingOpen {
        closes: usize,
    }

    impl ResultSink for FailingOpen {
        fn open(&mut self, _: &HeaderSchema) -> Result<()> {
            Err(FlowError::Sink("read-only destination".into()))
        }
        fn write(&mut self, _: &[Metric]) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            self.closes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_failed_open_still_closes() {
        let mut sink = FailingOpen { closes: 0 };
        assert!(SinkGuard::open(&mut sink, &HeaderSchema::dependency()).is_err());
        assert_eq!(sink.closes, 1);
    }
}

// src/sink/jsonl.rs
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{HeaderSchema, ResultSink};
use crate::error::{FlowError, Result};
use crate::metrics::{Metric, MetricValue, ResolutionBreakdown};

/// Writes one JSON object per metric, one per line.
pub struct JsonLinesSink {
    destination: PathBuf,
    out: Option<BufWriter<File>>,
}

#[derive(Serialize)]
struct Record<'a> {
    unit: &'a Path,
    metric: String,
    value: &'a MetricValue,
    #[serde(flatten)]
    breakdown: Option<ResolutionBreakdown>,
}

impl JsonLinesSink {
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            out: None,
        }
    }

    fn sink_error(&self, e: impl std::fmt::Display) -> FlowError {
        FlowError::Sink(format!("{}: {e}", self.destination.display()))
    }
}

impl ResultSink for JsonLinesSink {
    fn open(&mut self, _schema: &HeaderSchema) -> Result<()> {
        let file = File::create(&self.destination).map_err(|e| self.sink_error(e))?;
        self.out = Some(BufWriter::new(file));
        Ok(())
    }

    fn write(&mut self, batch: &[Metric]) -> Result<()> {
        let Some(out) = self.out.as_mut() else {
            return Err(FlowError::Sink("jsonl sink is not open".into()));
        };
        for metric in batch {
            let record = Record {
                unit: &metric.unit,
                metric: metric.label(),
                value: &metric.value,
                breakdown: metric.breakdown,
            };
            let written = serde_json::to_writer(&mut *out, &record)
                .map_err(std::io::Error::from)
                .and_then(|()| out.write_all(b"\n"));
            if let Err(e) = written {
                return Err(FlowError::Sink(format!("{}: {e}", self.destination.display())));
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut out) = self.out.take() else {
            return Ok(());
        };
        out.flush().map_err(|e| self.sink_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_one_object_per_line() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("metrics.jsonl");
        let mut sink = JsonLinesSink::new(&out);

        sink.open(&HeaderSchema::dependency()).expect("open");
        sink.write(&[
            Metric::count(Path::new("/p/A.java"), "fan-in", 1).with_subject("T"),
            Metric::count(Path::new("/p/B.java"), "unresolved-dependency-count", 0)
                .with_breakdown(ResolutionBreakdown::default()),
        ])
        .expect("write");
        sink.close().expect("close");

        let text = fs::read_to_string(&out).expect("read");
        let rows: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).expect("json line"))
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["metric"], "fan-in(T)");
        assert_eq!(rows[0]["value"], 1);
        assert!(rows[0].get("internal").is_none());
        assert_eq!(rows[1]["unresolved_project"], 0);
    }
}

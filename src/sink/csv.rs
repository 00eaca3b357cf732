// src/sink/csv.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::{HeaderSchema, ResultSink};
use crate::error::{FlowError, Result};
use crate::metrics::Metric;

/// Writes one RFC 4180 row per metric.
pub struct CsvSink {
    destination: PathBuf,
    schema: Option<HeaderSchema>,
    out: Option<BufWriter<File>>,
}

impl CsvSink {
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            schema: None,
            out: None,
        }
    }

    fn write_row<S: AsRef<str>>(out: &mut BufWriter<File>, cells: &[S]) -> std::io::Result<()> {
        let line = cells
            .iter()
            .map(|c| quote(c.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        out.write_all(line.as_bytes())?;
        out.write_all(b"\r\n")
    }

    fn sink_error(&self, e: &std::io::Error) -> FlowError {
        FlowError::Sink(format!("{}: {e}", self.destination.display()))
    }
}

impl ResultSink for CsvSink {
    fn open(&mut self, schema: &HeaderSchema) -> Result<()> {
        let file = File::create(&self.destination).map_err(|e| self.sink_error(&e))?;
        let mut out = BufWriter::new(file);
        Self::write_row(&mut out, schema.columns()).map_err(|e| self.sink_error(&e))?;
        self.schema = Some(schema.clone());
        self.out = Some(out);
        Ok(())
    }

    fn write(&mut self, batch: &[Metric]) -> Result<()> {
        let (Some(schema), Some(out)) = (&self.schema, self.out.as_mut()) else {
            return Err(FlowError::Sink("csv sink is not open".into()));
        };
        for metric in batch {
            if let Err(e) = Self::write_row(out, &schema.row(metric)) {
                return Err(FlowError::Sink(format!("{}: {e}", self.destination.display())));
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut out) = self.out.take() else {
            return Ok(());
        };
        out.flush().map_err(|e| self.sink_error(&e))
    }
}

/// Quotes a field when it holds a separator, quote or line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// src/reporting.rs
//! Console summary of a finished run.

use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

use crate::error::PipelineError;
use crate::pipeline::RunSummary;

/// Prints the run summary to stdout.
pub fn print_summary(summary: &RunSummary, destination: &Path) {
    print!("{}", format_summary(summary, destination));
}

/// Prints a fatal run error to stderr.
pub fn print_fatal(err: &PipelineError) {
    eprintln!("{} {err}", "error:".red().bold());
}

#[must_use]
pub fn format_summary(summary: &RunSummary, destination: &Path) -> String {
    let mut out = String::new();

    for (_, reason) in &summary.failures {
        let _ = writeln!(out, "{} {reason}", "failed".red());
    }
    for lib in &summary.skipped_libraries {
        let _ = writeln!(out, "{} library {}", "skipped".yellow(), lib.display());
    }

    let status = if summary.is_clean() {
        "ok".green().bold()
    } else {
        "done".yellow().bold()
    };
    let _ = writeln!(
        out,
        "{status} {} attempted, {} parsed, {} failed, {} skipped",
        summary.attempted, summary.parsed, summary.failed, summary.skipped
    );
    let _ = writeln!(
        out,
        "   {} {} to {} ({} {})",
        summary.metrics,
        pluralize("metric", summary.metrics),
        destination.display(),
        summary.source_roots,
        pluralize("source root", summary.source_roots)
    );
    if summary.cache.hits + summary.cache.misses > 0 {
        let _ = writeln!(
            out,
            "   {}",
            format!(
                "lookup cache: {} hits, {} misses",
                summary.cache.hits, summary.cache.misses
            )
            .dimmed()
        );
    }
    out
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_summary() {
        colored::control::set_override(false);
        let summary = RunSummary {
            attempted: 2,
            parsed: 1,
            failed: 1,
            metrics: 9,
            source_roots: 1,
            failures: vec![(
                PathBuf::from("/p/Bad.java"),
                "parse failure in /p/Bad.java: syntax error near line 3".into(),
            )],
            ..RunSummary::default()
        };
        let text = format_summary(&summary, Path::new("out.csv"));

        assert!(text.contains("failed parse failure in /p/Bad.java: syntax error near line 3"));
        assert!(text.contains("done 2 attempted, 1 parsed, 1 failed, 0 skipped"));
        assert!(text.contains("9 metrics to out.csv (1 source root)"));
        assert!(!text.contains("lookup cache"));
    }
}

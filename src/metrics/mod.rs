// src/metrics/mod.rs
//! Metric values and the ordered pipeline of metric units that produces them.

pub mod dependency;
pub mod local;

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};
use crate::parse::SourceUnit;
use crate::resolve::{Missing, Resolution, ResolutionContext};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(usize),
    Ratio(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Ratio(r) => write!(f, "{r:.3}"),
        }
    }
}

/// How the references behind a dependency metric resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionBreakdown {
    pub internal: usize,
    pub external: usize,
    pub unresolved_project: usize,
    pub unresolved_library: usize,
}

impl ResolutionBreakdown {
    /// Counts one outcome; local references are not dependencies and are ignored.
    pub fn record(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Local => {}
            Resolution::Internal(_) => self.internal += 1,
            Resolution::External(_) => self.external += 1,
            Resolution::Unresolved(Missing::Project) => self.unresolved_project += 1,
            Resolution::Unresolved(Missing::Library) => self.unresolved_library += 1,
        }
    }

    #[must_use]
    pub fn resolved(&self) -> usize {
        self.internal + self.external
    }

    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.unresolved_project + self.unresolved_library
    }
}

impl FromIterator<Resolution> for ResolutionBreakdown {
    fn from_iter<I: IntoIterator<Item = Resolution>>(iter: I) -> Self {
        let mut breakdown = Self::default();
        for resolution in iter {
            breakdown.record(resolution);
        }
        breakdown
    }
}

/// One measured value for one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub unit: PathBuf,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub value: MetricValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ResolutionBreakdown>,
}

impl Metric {
    #[must_use]
    pub fn new(unit: &Path, name: &'static str, value: MetricValue) -> Self {
        Self {
            unit: unit.to_path_buf(),
            name,
            subject: None,
            value,
            breakdown: None,
        }
    }

    #[must_use]
    pub fn count(unit: &Path, name: &'static str, n: usize) -> Self {
        Self::new(unit, name, MetricValue::Count(n))
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn with_breakdown(mut self, breakdown: ResolutionBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    /// `name` or `name(subject)`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.subject {
            Some(subject) => format!("{}({subject})", self.name),
            None => self.name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitScope {
    /// Computable from the unit's own syntax.
    Local,
    /// Follows resolved references across units.
    DependencyResolving,
}

/// A single, independently configured metric computation.
pub trait MetricUnit: Send + Sync {
    fn name(&self) -> &'static str;
    fn scope(&self) -> UnitScope;
    fn compute(&self, unit: &SourceUnit, ctx: &ResolutionContext) -> Vec<Metric>;
}

/// Ordered list of metric units; outputs are concatenated in unit order.
pub struct MetricGenerator {
    units: Vec<Box<dyn MetricUnit>>,
}

impl Default for MetricGenerator {
    fn default() -> Self {
        Self::builder()
            .with_local_metrics()
            .with_dependency_resolution()
            .build()
    }
}

impl MetricGenerator {
    #[must_use]
    pub fn builder() -> MetricGeneratorBuilder {
        MetricGeneratorBuilder::default()
    }

    /// Names of the configured units, in order.
    pub fn unit_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.units.iter().map(|u| u.name())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Runs every unit over `unit` and concatenates their metrics.
    ///
    /// # Errors
    /// Returns `ContextMismatch` if `unit` was parsed against another context.
    pub fn compute(&self, unit: &SourceUnit, ctx: &ResolutionContext) -> Result<Vec<Metric>> {
        if unit.context_id() != ctx.id() {
            return Err(FlowError::ContextMismatch {
                path: unit.path().to_path_buf(),
            });
        }

        let mut metrics = Vec::new();
        for metric_unit in &self.units {
            metrics.extend(metric_unit.compute(unit, ctx));
        }
        tracing::debug!("{} metric(s) for {}", metrics.len(), unit.path().display());
        Ok(metrics)
    }
}

#[derive(Default)]
pub struct MetricGeneratorBuilder {
    units: Vec<Box<dyn MetricUnit>>,
}

impl MetricGeneratorBuilder {
    #[must_use]
    pub fn with_local_metrics(mut self) -> Self {
        self.units.push(Box::new(local::DeclaredTypes));
        self.units.push(Box::new(local::ImportCount));
        self
    }

    #[must_use]
    pub fn with_dependency_resolution(mut self) -> Self {
        self.units.push(Box::new(dependency::FanOut));
        self.units.push(Box::new(dependency::UnresolvedDependencies));
        self.units.push(Box::new(dependency::FanIn));
        self.units.push(Box::new(dependency::FileCoupling));
        self.units.push(Box::new(dependency::Reachability));
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: Box<dyn MetricUnit>) -> Self {
        self.units.push(unit);
        self
    }

    #[must_use]
    pub fn build(self) -> MetricGenerator {
        MetricGenerator { units: self.units }
    }
}

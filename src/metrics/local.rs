// src/metrics/local.rs
//! Metrics computable from a unit's own syntax.

use super::{Metric, MetricUnit, UnitScope};
use crate::parse::SourceUnit;
use crate::resolve::ResolutionContext;

/// Number of type declarations, nested ones included.
pub struct DeclaredTypes;

impl MetricUnit for DeclaredTypes {
    fn name(&self) -> &'static str {
        "declared-types"
    }

    fn scope(&self) -> UnitScope {
        UnitScope::Local
    }

    fn compute(&self, unit: &SourceUnit, _ctx: &ResolutionContext) -> Vec<Metric> {
        vec![Metric::count(
            unit.path(),
            self.name(),
            unit.syntax().declarations.len(),
        )]
    }
}

/// Number of import declarations.
pub struct ImportCount;

impl MetricUnit for ImportCount {
    fn name(&self) -> &'static str {
        "imports"
    }

    fn scope(&self) -> UnitScope {
        UnitScope::Local
    }

    fn compute(&self, unit: &SourceUnit, _ctx: &ResolutionContext) -> Vec<Metric> {
        vec![Metric::count(
            unit.path(),
            self.name(),
            unit.syntax().imports.len(),
        )]
    }
}

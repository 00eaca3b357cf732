// src/metrics/dependency.rs
//! Metrics that follow resolved references across units.

use std::collections::{BTreeSet, HashMap, VecDeque};

use super::{Metric, MetricUnit, MetricValue, ResolutionBreakdown, UnitScope};
use crate::graph::Coupling;
use crate::parse::SourceUnit;
use crate::resolve::{FileId, Resolution, ResolutionContext};

fn resolutions(unit: &SourceUnit, ctx: &ResolutionContext) -> Vec<(String, Resolution)> {
    ctx.resolver(unit.syntax(), unit.path()).resolve_all()
}

/// Indexed files the unit's internal references land in.
fn internal_targets(unit: &SourceUnit, ctx: &ResolutionContext) -> BTreeSet<FileId> {
    let own = ctx.file_id(unit.path());
    resolutions(unit, ctx)
        .into_iter()
        .filter_map(|(_, r)| match r {
            Resolution::Internal(id) => ctx.declaration(id).file(),
            _ => None,
        })
        .filter(|f| Some(*f) != own)
        .collect()
}

/// Distinct declarations the unit depends on.
pub struct FanOut;

impl MetricUnit for FanOut {
    fn name(&self) -> &'static str {
        "fan-out"
    }

    fn scope(&self) -> UnitScope {
        UnitScope::DependencyResolving
    }

    fn compute(&self, unit: &SourceUnit, ctx: &ResolutionContext) -> Vec<Metric> {
        let resolved = resolutions(unit, ctx);
        let breakdown: ResolutionBreakdown = resolved.iter().map(|(_, r)| *r).collect();
        let targets: BTreeSet<_> = resolved.iter().filter_map(|(_, r)| r.decl()).collect();

        vec![Metric::count(unit.path(), self.name(), targets.len()).with_breakdown(breakdown)]
    }
}

/// Distinct dependencies that could not be resolved.
pub struct UnresolvedDependencies;

impl MetricUnit for UnresolvedDependencies {
    fn name(&self) -> &'static str {
        "unresolved-dependency-count"
    }

    fn scope(&self) -> UnitScope {
        UnitScope::DependencyResolving
    }

    fn compute(&self, unit: &SourceUnit, ctx: &ResolutionContext) -> Vec<Metric> {
        let resolved = resolutions(unit, ctx);
        for (name, _) in resolved.iter().filter(|(_, r)| r.is_unresolved()) {
            tracing::debug!("{}: unresolved reference {name}", unit.path().display());
        }
        let breakdown: ResolutionBreakdown = resolved.into_iter().map(|(_, r)| r).collect();

        vec![Metric::count(unit.path(), self.name(), breakdown.unresolved())
            .with_breakdown(breakdown)]
    }
}

/// For every type the unit declares, the number of other files referencing it.
pub struct FanIn;

impl MetricUnit for FanIn {
    fn name(&self) -> &'static str {
        "fan-in"
    }

    fn scope(&self) -> UnitScope {
        UnitScope::DependencyResolving
    }

    fn compute(&self, unit: &SourceUnit, ctx: &ResolutionContext) -> Vec<Metric> {
        let syntax = unit.syntax();
        let own = ctx.file_id(unit.path());

        syntax
            .declarations
            .iter()
            .map(|def| {
                let referrers = ctx
                    .lookup(&syntax.qualify(def))
                    .filter(|id| own.is_some() && ctx.declaration(*id).file() == own)
                    .map_or(0, |id| ctx.referrer_count(id));
                Metric::count(unit.path(), self.name(), referrers).with_subject(&def.qualified)
            })
            .collect()
    }
}

/// File-level afferent and efferent coupling plus instability.
pub struct FileCoupling;

impl MetricUnit for FileCoupling {
    fn name(&self) -> &'static str {
        "coupling"
    }

    fn scope(&self) -> UnitScope {
        UnitScope::DependencyResolving
    }

    fn compute(&self, unit: &SourceUnit, ctx: &ResolutionContext) -> Vec<Metric> {
        let coupling = match ctx.file_id(unit.path()) {
            Some(file) => ctx.coupling(file),
            None => Coupling::new(0, internal_targets(unit, ctx).len()),
        };
        let path = unit.path();

        vec![
            Metric::count(path, "afferent-coupling", coupling.afferent()),
            Metric::count(path, "efferent-coupling", coupling.efferent()),
            Metric::new(path, "instability", MetricValue::Ratio(coupling.instability())),
        ]
    }
}

/// Longest dependency chain and number of files reachable over internal edges.
pub struct Reachability;

impl MetricUnit for Reachability {
    fn name(&self) -> &'static str {
        "reachability"
    }

    fn scope(&self) -> UnitScope {
        UnitScope::DependencyResolving
    }

    fn compute(&self, unit: &SourceUnit, ctx: &ResolutionContext) -> Vec<Metric> {
        let own = ctx.file_id(unit.path());
        let start: Vec<FileId> = match own {
            Some(file) => ctx.dependencies(file).collect(),
            None => internal_targets(unit, ctx).into_iter().collect(),
        };
        let (depth, reachable) = bfs(ctx, own, start);
        let path = unit.path();

        vec![
            Metric::count(path, "dependency-depth", depth),
            Metric::count(path, "transitive-dependencies", reachable),
        ]
    }
}

/// Breadth-first walk from the unit's direct dependencies (distance 1).
fn bfs(ctx: &ResolutionContext, own: Option<FileId>, start: Vec<FileId>) -> (usize, usize) {
    let mut distance: HashMap<FileId, usize> = HashMap::new();
    let mut queue = VecDeque::new();

    for file in start {
        if Some(file) != own && distance.insert(file, 1).is_none() {
            queue.push_back(file);
        }
    }

    let mut depth = 0;
    while let Some(file) = queue.pop_front() {
        let d = distance.get(&file).copied().unwrap_or(0);
        depth = depth.max(d);
        for next in ctx.dependencies(file) {
            if Some(next) == own || distance.contains_key(&next) {
                continue;
            }
            distance.insert(next, d + 1);
            queue.push_back(next);
        }
    }

    (depth, distance.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::parse::parse_source;
    use crate::project::SourceRootCollector;
    use crate::resolve::{ContextConfig, ResolutionScope};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        ctx: ResolutionContext,
        files: Vec<PathBuf>,
    }

    fn fixture(sources: &[(&str, &str)]) -> Fixture {
        let dir = TempDir::new().expect("tempdir");
        let mut files = Vec::new();
        for (rel, content) in sources {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, content).expect("write");
            files.push(path);
        }
        let model = SourceRootCollector::default()
            .collect(dir.path())
            .expect("model");
        let config = ContextConfig {
            scope: ResolutionScope::Project,
            ..ContextConfig::default()
        };
        let ctx = ResolutionContext::build(&model, &config, &Filter::default());
        Fixture {
            _dir: dir,
            ctx,
            files,
        }
    }

    fn unit(fx: &Fixture, idx: usize) -> SourceUnit {
        let path = &fx.files[idx];
        let source = fs::read_to_string(path).expect("read");
        parse_source(path, source, &fx.ctx).expect("parses")
    }

    fn value(metrics: &[Metric], label: &str) -> MetricValue {
        metrics
            .iter()
            .find(|m| m.label() == label)
            .map(|m| m.value.clone())
            .unwrap_or_else(|| panic!("no metric {label}"))
    }

    #[test]
    fn test_fan_out_breakdown() {
        let fx = fixture(&[
            ("src/p/T.java", "package p;\npublic class T {}"),
            (
                "src/p/U.java",
                "package p;\nimport java.util.List;\nimport org.gone.Thing;\nclass U { T t; List<String> l; Thing x; Missing m; }",
            ),
        ]);
        let u = unit(&fx, 1);
        let metrics = FanOut.compute(&u, &fx.ctx);
        let breakdown = metrics[0].breakdown.expect("breakdown");

        assert_eq!(breakdown.internal, 1);
        assert_eq!(breakdown.external, 2);
        assert_eq!(breakdown.unresolved_library, 1);
        assert_eq!(breakdown.unresolved_project, 1);
        assert_eq!(metrics[0].value, MetricValue::Count(3));

        let unresolved = UnresolvedDependencies.compute(&u, &fx.ctx);
        assert_eq!(unresolved[0].value, MetricValue::Count(2));
    }

    #[test]
    fn test_spellings_of_one_type_count_once() {
        let fx = fixture(&[
            ("src/q/X.java", "package q;\npublic class X { public static void m() {} }"),
            (
                "src/p/U.java",
                "package p;\nimport q.X;\nimport static q.X.m;\nclass U { X a; q.X b; }",
            ),
            ("src/p/V.java", "package p;\nclass V { Gone a; p.Gone b; }"),
        ]);
        let u = unit(&fx, 1);
        let metrics = FanOut.compute(&u, &fx.ctx);
        let breakdown = metrics[0].breakdown.expect("breakdown");

        assert_eq!(metrics[0].value, MetricValue::Count(1));
        assert_eq!(breakdown.internal, 1);
        assert_eq!(
            MetricValue::Count(breakdown.internal + breakdown.external),
            metrics[0].value
        );

        let v = unit(&fx, 2);
        let unresolved = UnresolvedDependencies.compute(&v, &fx.ctx);
        assert_eq!(unresolved[0].value, MetricValue::Count(1));
        assert_eq!(unresolved[0].breakdown.map(|b| b.unresolved_project), Some(1));
    }

    #[test]
    fn test_fan_in_and_coupling() {
        let fx = fixture(&[
            ("src/p/T.java", "package p;\npublic class T { T self; }"),
            ("src/p/A.java", "package p;\nclass A { T t; }"),
            ("src/p/B.java", "package p;\nclass B { T t; A a; }"),
        ]);
        let t = unit(&fx, 0);
        let fan_in = FanIn.compute(&t, &fx.ctx);
        assert_eq!(value(&fan_in, "fan-in(T)"), MetricValue::Count(2));

        let coupling = FileCoupling.compute(&t, &fx.ctx);
        assert_eq!(value(&coupling, "afferent-coupling"), MetricValue::Count(2));
        assert_eq!(value(&coupling, "efferent-coupling"), MetricValue::Count(0));
        assert_eq!(value(&coupling, "instability"), MetricValue::Ratio(0.0));
    }

    #[test]
    fn test_reachability_handles_cycles() {
        let fx = fixture(&[
            ("src/p/A.java", "package p;\nclass A { B b; }"),
            ("src/p/B.java", "package p;\nclass B { C c; }"),
            ("src/p/C.java", "package p;\nclass C { A a; }"),
        ]);
        let a = unit(&fx, 0);
        let metrics = Reachability.compute(&a, &fx.ctx);
        assert_eq!(value(&metrics, "dependency-depth"), MetricValue::Count(2));
        assert_eq!(value(&metrics, "transitive-dependencies"), MetricValue::Count(2));
    }

    #[test]
    fn test_unindexed_unit_still_measured() {
        let fx = fixture(&[("src/p/T.java", "package p;\npublic class T {}")]);
        let stray = parse_source(
            Path::new("/elsewhere/p/S.java"),
            "package p;\nclass S { T t; }".into(),
            &fx.ctx,
        )
        .expect("parses");

        let coupling = FileCoupling.compute(&stray, &fx.ctx);
        assert_eq!(value(&coupling, "efferent-coupling"), MetricValue::Count(1));
        let reach = Reachability.compute(&stray, &fx.ctx);
        assert_eq!(value(&reach, "transitive-dependencies"), MetricValue::Count(1));
    }
}

// src/resolve/scope.rs
//! Name resolution inside one compilation unit.

use std::collections::HashSet;

use super::context::ResolutionContext;
use super::index::{DeclId, FileId};
use crate::graph::UnitSyntax;

/// Where an unresolved reference was expected to be declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Missing {
    /// Looks like a project type that is not visible to the context.
    Project,
    /// Looks like a type from a library that was not supplied.
    Library,
}

/// Outcome of resolving one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Declared by the referencing unit itself; not a dependency.
    Local,
    Internal(DeclId),
    External(DeclId),
    Unresolved(Missing),
}

impl Resolution {
    #[must_use]
    pub fn decl(self) -> Option<DeclId> {
        match self {
            Self::Internal(id) | Self::External(id) => Some(id),
            Self::Local | Self::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub fn is_unresolved(self) -> bool {
        matches!(self, Self::Unresolved(_))
    }
}

#[derive(PartialEq, Eq, Hash)]
enum Identity {
    Decl(DeclId),
    Expected(String),
}

/// Resolves the references of one unit against a shared context.
pub struct Resolver<'a> {
    ctx: &'a ResolutionContext,
    syntax: &'a UnitSyntax,
    file: Option<FileId>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(ctx: &'a ResolutionContext, syntax: &'a UnitSyntax, file: Option<FileId>) -> Self {
        Self { ctx, syntax, file }
    }

    /// Resolves every distinct dependency of the unit, in first-seen order.
    ///
    /// Covers type references and the owner types of static imports. Names
    /// denoting the same declaration (`X`, `q.X`, `import static q.X.m`) count
    /// once; unresolved names are merged by the qualified name they were
    /// expected under. Local references are dropped.
    #[must_use]
    pub fn resolve_all(&self) -> Vec<(String, Resolution)> {
        let mut seen_names = HashSet::new();
        let mut seen = HashSet::new();
        let static_owners = self
            .syntax
            .imports
            .iter()
            .filter_map(|i| i.static_owner());
        let names = self
            .syntax
            .references
            .iter()
            .map(|r| r.name.as_str())
            .chain(static_owners);

        let mut out = Vec::new();
        for name in names.filter(|name| seen_names.insert(*name)) {
            let resolution = self.resolve(name);
            let identity = match resolution {
                Resolution::Local => continue,
                Resolution::Internal(id) | Resolution::External(id) => Identity::Decl(id),
                Resolution::Unresolved(_) => Identity::Expected(self.expected_name(name)),
            };
            if seen.insert(identity) {
                out.push((name.to_string(), resolution));
            }
        }
        out
    }

    /// Qualified name an unresolved reference was written against.
    fn expected_name(&self, name: &str) -> String {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        if starts_lowercase(head) && rest.is_some() {
            return name.to_string();
        }

        let imports = &self.syntax.imports;
        let base = imports
            .iter()
            .find(|i| i.bound_name() == Some(head))
            .map(|i| i.path.clone())
            .or_else(|| {
                imports
                    .iter()
                    .filter_map(|i| i.static_owner())
                    .find(|owner| last_segment(owner) == head)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| match &self.syntax.package {
                Some(pkg) => format!("{pkg}.{head}"),
                None => head.to_string(),
            });

        match rest {
            Some(rest) => format!("{base}.{rest}"),
            None => base,
        }
    }

    /// Resolves a single, possibly dotted, type name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Resolution {
        let segments: Vec<&str> = name.split('.').collect();
        let Some((&head, tail)) = segments.split_first() else {
            return Resolution::Unresolved(Missing::Project);
        };

        if self.syntax.declared(head).is_some() {
            return Resolution::Local;
        }

        if starts_lowercase(head) && !tail.is_empty() {
            return self.resolve_qualified(&segments);
        }

        for candidate in self.candidates(head) {
            if let Some(id) = self.lookup_with_tail(&candidate, tail) {
                return self.classify(id);
            }
        }

        Resolution::Unresolved(self.missing_for_simple(head))
    }

    /// `a.b.C.D`: tries the full name, then drops trailing segments.
    fn resolve_qualified(&self, segments: &[&str]) -> Resolution {
        for len in (2..=segments.len()).rev() {
            let candidate = segments.get(..len).unwrap_or_default().join(".");
            if let Some(id) = self.ctx.lookup(&candidate) {
                return self.classify(id);
            }
        }
        Resolution::Unresolved(self.missing_for_qualified(&segments.join(".")))
    }

    /// Qualified names `head` may stand for, in precedence order.
    fn candidates(&self, head: &str) -> Vec<String> {
        let imports = &self.syntax.imports;
        let mut out = Vec::new();

        out.extend(
            imports
                .iter()
                .filter(|i| i.bound_name() == Some(head))
                .map(|i| i.path.clone()),
        );
        out.extend(
            imports
                .iter()
                .filter_map(|i| i.static_owner())
                .filter(|owner| last_segment(owner) == head)
                .map(str::to_string),
        );
        out.push(match &self.syntax.package {
            Some(pkg) => format!("{pkg}.{head}"),
            None => head.to_string(),
        });
        out.extend(
            imports
                .iter()
                .filter(|i| i.on_demand)
                .map(|i| format!("{}.{head}", i.path)),
        );
        out.push(format!("java.lang.{head}"));
        out
    }

    /// Looks up `base` and then the longest nested name under it.
    fn lookup_with_tail(&self, base: &str, tail: &[&str]) -> Option<DeclId> {
        let base_id = self.ctx.lookup(base)?;
        for len in (1..=tail.len()).rev() {
            let nested = format!("{base}.{}", tail.get(..len).unwrap_or_default().join("."));
            if let Some(id) = self.ctx.lookup(&nested) {
                return Some(id);
            }
        }
        Some(base_id)
    }

    fn classify(&self, id: DeclId) -> Resolution {
        let decl = self.ctx.declaration(id);
        match decl.file() {
            Some(file) if Some(file) == self.file => Resolution::Local,
            Some(_) => Resolution::Internal(id),
            None => Resolution::External(id),
        }
    }

    fn missing_for_simple(&self, head: &str) -> Missing {
        if let Some(import) = self
            .syntax
            .imports
            .iter()
            .find(|i| i.bound_name() == Some(head))
        {
            return self.missing_for_qualified(&import.path);
        }

        let foreign_wildcard = self
            .syntax
            .imports
            .iter()
            .filter(|i| i.on_demand && !i.is_static)
            .any(|i| !self.is_project_package(&i.path));

        if foreign_wildcard {
            Missing::Library
        } else {
            Missing::Project
        }
    }

    fn missing_for_qualified(&self, fqn: &str) -> Missing {
        let package = package_prefix(fqn);
        if self.is_project_package(&package) {
            Missing::Project
        } else {
            Missing::Library
        }
    }

    fn is_project_package(&self, package: &str) -> bool {
        self.syntax.package.as_deref() == Some(package) || self.ctx.is_project_package(package)
    }
}

/// Leading lower-case segments of a dotted name (`a.b` for `a.b.C.D`).
fn package_prefix(fqn: &str) -> String {
    fqn.split('.')
        .take_while(|s| starts_lowercase(s))
        .collect::<Vec<_>>()
        .join(".")
}

fn starts_lowercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_lowercase)
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::graph;
    use crate::lang::Lang;
    use crate::project::SourceRootCollector;
    use crate::resolve::{ContextConfig, ResolutionScope};
    use std::fs;
    use tempfile::TempDir;

    fn context(sources: &[(&str, &str)]) -> (TempDir, ResolutionContext) {
        let dir = TempDir::new().expect("tempdir");
        for (rel, content) in sources {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, content).expect("write");
        }
        let model = SourceRootCollector::default()
            .collect(dir.path())
            .expect("model");
        let config = ContextConfig {
            scope: ResolutionScope::Project,
            ..ContextConfig::default()
        };
        let ctx = ResolutionContext::build(&model, &config, &Filter::default());
        (dir, ctx)
    }

    fn syntax(code: &str) -> UnitSyntax {
        let tree = graph::parse_tree(Lang::Java, code).expect("tree");
        graph::extract(&tree, code)
    }

    fn resolve(ctx: &ResolutionContext, code: &str, name: &str) -> Resolution {
        let unit = syntax(code);
        Resolver::new(ctx, &unit, None).resolve(name)
    }

    fn target(ctx: &ResolutionContext, resolution: Resolution) -> String {
        let id = resolution
            .decl()
            .unwrap_or_else(|| panic!("unresolved: {resolution:?}"));
        ctx.declaration(id).fqn.clone()
    }

    #[test]
    fn test_single_type_import_beats_same_package() {
        let (_dir, ctx) = context(&[("src/p/List.java", "package p;\npublic class List {}")]);

        let imported = resolve(&ctx, "package p;\nimport java.util.List;\nclass U {}", "List");
        assert!(matches!(imported, Resolution::External(_)));
        assert_eq!(target(&ctx, imported), "java.util.List");

        let sibling = resolve(&ctx, "package p;\nclass U {}", "List");
        assert!(matches!(sibling, Resolution::Internal(_)));
        assert_eq!(target(&ctx, sibling), "p.List");
    }

    #[test]
    fn test_same_package_beats_on_demand_import() {
        let (_dir, ctx) = context(&[
            ("src/p/X.java", "package p;\npublic class X {}"),
            ("src/r/X.java", "package r;\npublic class X {}"),
        ]);
        let found = resolve(&ctx, "package p;\nimport r.*;\nclass U {}", "X");
        assert_eq!(target(&ctx, found), "p.X");
    }

    #[test]
    fn test_on_demand_imports_in_source_order() {
        let (_dir, ctx) = context(&[
            ("src/q/X.java", "package q;\npublic class X {}"),
            ("src/r/X.java", "package r;\npublic class X {}"),
        ]);
        let first = resolve(&ctx, "package p;\nimport q.*;\nimport r.*;\nclass U {}", "X");
        assert_eq!(target(&ctx, first), "q.X");
        let second = resolve(&ctx, "package p;\nimport r.*;\nimport q.*;\nclass U {}", "X");
        assert_eq!(target(&ctx, second), "r.X");
    }

    #[test]
    fn test_java_lang_comes_last() {
        let (_dir, ctx) = context(&[("src/q/String.java", "package q;\npublic class String {}")]);

        let shadowed = resolve(&ctx, "package p;\nimport q.*;\nclass U {}", "String");
        assert_eq!(target(&ctx, shadowed), "q.String");

        let implicit = resolve(&ctx, "package p;\nclass U {}", "String");
        assert!(matches!(implicit, Resolution::External(_)));
        assert_eq!(target(&ctx, implicit), "java.lang.String");
    }

    #[test]
    fn test_nested_types_resolve_through_their_outer_type() {
        let (_dir, ctx) = context(&[(
            "src/q/Outer.java",
            "package q;\npublic class Outer { public static class Inner {} }",
        )]);
        let code = "package p;\nimport q.Outer;\nclass U {}";

        assert_eq!(target(&ctx, resolve(&ctx, code, "Outer.Inner")), "q.Outer.Inner");
        assert_eq!(target(&ctx, resolve(&ctx, code, "Outer.Unknown")), "q.Outer");
    }

    #[test]
    fn test_qualified_names_and_static_import_owners() {
        let (_dir, ctx) = context(&[(
            "src/q/Outer.java",
            "package q;\npublic class Outer { public static class Inner {} static void helper() {} }",
        )]);
        let code = "package p;\nimport static q.Outer.helper;\nclass U {}";

        assert_eq!(target(&ctx, resolve(&ctx, code, "q.Outer.Inner")), "q.Outer.Inner");

        let unit = syntax(code);
        let all = Resolver::new(&ctx, &unit, None).resolve_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, "q.Outer");
        assert_eq!(target(&ctx, all[0].1), "q.Outer");
    }

    #[test]
    fn test_own_declarations_are_local() {
        let (_dir, ctx) = context(&[("src/p/Node.java", "package p;\npublic class Node {}")]);
        let code = "package p;\nclass U { static class Node {} Node n; }";

        assert_eq!(resolve(&ctx, code, "Node"), Resolution::Local);
        let unit = syntax(code);
        assert!(Resolver::new(&ctx, &unit, None).resolve_all().is_empty());
    }

    #[test]
    fn test_unresolved_project_or_library() {
        let (_dir, ctx) = context(&[("src/q/Present.java", "package q;\npublic class Present {}")]);
        let missing = |code: &str, name: &str| match resolve(&ctx, code, name) {
            Resolution::Unresolved(kind) => kind,
            other => panic!("{name} resolved to {other:?}"),
        };

        let foreign_wildcard = "package p;\nimport org.lib.*;\nclass U {}";
        let project_wildcard = "package p;\nimport q.*;\nclass U {}";
        let foreign_import = "package p;\nimport org.lib.Thing;\nclass U {}";
        let project_import = "package p;\nimport q.Gone;\nclass U {}";

        assert_eq!(missing(foreign_wildcard, "Nope"), Missing::Library);
        assert_eq!(missing(project_wildcard, "Nope"), Missing::Project);
        assert_eq!(missing(foreign_import, "Thing"), Missing::Library);
        assert_eq!(missing(project_import, "Gone"), Missing::Project);
        assert_eq!(missing("package p;\nclass U {}", "org.lib.Thing"), Missing::Library);
        assert_eq!(missing("package p;\nclass U {}", "q.Gone"), Missing::Project);
    }

    #[test]
    fn test_package_prefix() {
        assert_eq!(package_prefix("com.acme.Outer.Inner"), "com.acme");
        assert_eq!(package_prefix("Solo"), "");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("java.util.Collections"), "Collections");
        assert_eq!(last_segment("Solo"), "Solo");
    }
}

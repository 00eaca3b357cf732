// tests/unit_parse.rs
use depflow_core::filter::Filter;
use depflow_core::parse::{parse_filtered, ParseFailure, SelectiveParser};
use depflow_core::project;
use depflow_core::resolve::{ContextConfig, ResolutionContext};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn workspace() -> (TempDir, ResolutionContext) {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src/p");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("A.java"), "package p;\npublic class A {}").unwrap();
    fs::write(src.join("B.java"), "package p;\nclass B { A a; }").unwrap();
    fs::write(src.join("Broken.java"), "package p;\nclass Broken {").unwrap();

    let model = project::collect(temp.path()).unwrap();
    let ctx = ResolutionContext::build(&model, &ContextConfig::default(), &Filter::default());
    (temp, ctx)
}

#[test]
fn test_relative_entries_are_excluded() {
    let (temp, ctx) = workspace();
    let a = temp.path().join("src/p/A.java");
    let b = temp.path().join("src/p/B.java");
    let filter = Filter::new([
        PathBuf::from("src/p/A.java"),
        a.clone(),
        PathBuf::from("./B.java"),
        b.clone(),
    ]);

    let (files, report) = parse_filtered(&filter, &ctx);

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, a);
    assert_eq!(files[1].path, b);
    assert_eq!(report.invalid_paths.len(), 2);
}

#[test]
fn test_sequence_counts_readable_files_only() {
    let (temp, ctx) = workspace();
    let filter = Filter::new([
        temp.path().join("src/p/A.java"),
        temp.path().join("src/p/Missing.java"),
        temp.path().join("src/p/Broken.java"),
    ]);

    let (files, report) = parse_filtered(&filter, &ctx);

    assert_eq!(files.len(), 2);
    assert!(files[0].is_ok());
    assert!(matches!(files[1].outcome, Err(ParseFailure::Syntax { .. })));
    assert_eq!(report.unreadable.len(), 1);
    assert!(matches!(report.unreadable[0].1, ParseFailure::Io(_)));
    assert_eq!(report.failed, 2);
    assert_eq!(report.parsed, 1);
}

#[test]
fn test_filter_order_is_preserved() {
    let (temp, ctx) = workspace();
    let b = temp.path().join("src/p/B.java");
    let a = temp.path().join("src/p/A.java");
    let filter = Filter::new([b.clone(), a.clone()]);

    let paths: Vec<PathBuf> = SelectiveParser::new(&filter, &ctx).map(|f| f.path).collect();
    assert_eq!(paths, vec![b, a]);
}

#[test]
fn test_filter_file_loading() {
    let temp = TempDir::new().unwrap();
    let list = temp.path().join("changed.txt");
    fs::write(&list, "# changed\n/p/src/A.java\n\n/p/src/B.java\n").unwrap();

    let filter = Filter::from_file(&list).unwrap();
    assert_eq!(filter.len(), 2);
    assert!(Filter::from_file(&temp.path().join("absent.txt")).is_err());
}

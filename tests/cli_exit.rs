// tests/cli_exit.rs - Exit code tests for the `depflow` binary
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn depflow(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depflow"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to execute depflow")
}

fn project() -> TempDir {
    let d = TempDir::new().unwrap();
    fs::create_dir_all(d.path().join("src/p")).unwrap();
    fs::write(d.path().join("src/p/A.java"), "package p;\npublic class T {}").unwrap();
    fs::write(d.path().join("src/p/B.java"), "package p;\nclass B { T t; }").unwrap();
    let list = format!(
        "{}\n{}\n",
        d.path().join("src/p/A.java").display(),
        d.path().join("src/p/B.java").display()
    );
    fs::write(d.path().join("filter.txt"), list).unwrap();
    d
}

#[test]
fn test_exit_0_writes_csv() {
    let d = project();
    let out = depflow(
        d.path(),
        &[".", "--filter", "filter.txt", "--output", "out.csv"],
    );
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));

    let csv = fs::read_to_string(d.path().join("out.csv")).unwrap();
    assert!(csv.starts_with("unit,metric,value,"));
    assert!(csv.contains("fan-in(T),1"));
}

#[test]
fn test_exit_0_jsonl_from_config_file() {
    let d = project();
    fs::write(
        d.path().join("depflow.toml"),
        "[output]\nformat = \"jsonl\"\ndestination = \"metrics.jsonl\"\n",
    )
    .unwrap();

    let out = depflow(d.path(), &[".", "--filter", "filter.txt"]);
    assert_eq!(out.status.code(), Some(0));

    let text = fs::read_to_string(d.path().join("metrics.jsonl")).unwrap();
    for line in text.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("metric").is_some());
    }
}

#[test]
fn test_config_paths_are_relative_to_the_project() {
    let d = TempDir::new().unwrap();
    fs::create_dir_all(d.path().join("src/p")).unwrap();
    fs::create_dir_all(d.path().join("libs/org/widgets")).unwrap();
    fs::write(d.path().join("libs/org/widgets/Widget.class"), "").unwrap();
    let a = d.path().join("src/p/A.java");
    fs::write(&a, "package p;\nimport org.widgets.Widget;\nclass A { Widget w; }").unwrap();
    fs::write(d.path().join("filter.txt"), format!("{}\n", a.display())).unwrap();
    fs::write(
        d.path().join("depflow.toml"),
        "[resolution]\nexternal_library_paths = [\"libs\"]\n\n\
         [output]\nformat = \"jsonl\"\ndestination = \"metrics.jsonl\"\n",
    )
    .unwrap();

    let elsewhere = TempDir::new().unwrap();
    let root = d.path().to_str().unwrap();
    let filter = d.path().join("filter.txt");
    let out = depflow(elsewhere.path(), &[root, "--filter", filter.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));

    let text = fs::read_to_string(d.path().join("metrics.jsonl")).unwrap();
    let fan_out = text
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .find(|v| v["metric"] == "fan-out")
        .unwrap();
    assert_eq!(fan_out["external"], 1);
    assert_eq!(fan_out["unresolved_library"], 0);
}

#[test]
fn test_exit_2_invalid_root() {
    let d = project();
    let out = depflow(d.path(), &["missing-dir", "--filter", "filter.txt"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!d.path().join("depflow-metrics.csv").exists());
}

#[test]
fn test_exit_2_malformed_config() {
    let d = project();
    fs::write(d.path().join("depflow.toml"), "[run]\nparallelism = \"lots\"\n").unwrap();
    let out = depflow(d.path(), &[".", "--filter", "filter.txt"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_exit_3_unwritable_output() {
    let d = project();
    let out = depflow(
        d.path(),
        &[".", "--filter", "filter.txt", "--output", "no/such/dir/out.csv"],
    );
    assert_eq!(out.status.code(), Some(3));
}

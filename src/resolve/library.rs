// src/resolve/library.rs
//! Loading type names from external library paths.

use std::fs::{self, File};
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{FlowError, Result};
use crate::graph::{self, defs, imports};
use crate::lang::Lang;

/// Lists the fully qualified type names a library path provides.
///
/// Directories are scanned for `.java` sources and compiled `.class` files;
/// `.jar` and `.zip` files are read as archives of class files.
///
/// # Errors
/// Returns error if the path is missing, unreadable, or of an unsupported kind.
pub fn load(path: &Path) -> Result<Vec<String>> {
    if path.is_dir() {
        return Ok(load_directory(path));
    }
    if !path.is_file() {
        return Err(FlowError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "library path does not exist"),
            path,
        ));
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("jar" | "zip") => load_archive(path),
        _ => Err(FlowError::Config(format!(
            "unsupported library path {} (expected a directory, .jar or .zip)",
            path.display()
        ))),
    }
}

fn load_archive(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| FlowError::io(e, path))?;
    let archive = zip::ZipArchive::new(file)
        .map_err(|e| FlowError::Config(format!("{}: {e}", path.display())))?;

    let mut names: Vec<String> = archive.file_names().filter_map(class_entry_name).collect();
    names.sort();
    Ok(names)
}

fn load_directory(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name().into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if Lang::from_path(path).is_some() {
            names.extend(source_type_names(path));
        } else if path.extension().is_some_and(|e| e == "class") {
            let Ok(rel) = path.strip_prefix(dir) else {
                continue;
            };
            let entry_name = rel.to_string_lossy().replace('\\', "/");
            names.extend(class_entry_name(&entry_name));
        }
    }

    names
}

fn source_type_names(path: &Path) -> Vec<String> {
    let Ok(content) = fs::read_to_string(path) else {
        tracing::debug!("skipping unreadable library source {}", path.display());
        return Vec::new();
    };
    let Some(tree) = graph::parse_tree(Lang::Java, &content) else {
        return Vec::new();
    };
    let package = imports::package(&tree, &content);

    defs::extract(&tree, &content)
        .into_iter()
        .map(|d| match &package {
            Some(pkg) => format!("{pkg}.{}", d.qualified),
            None => d.qualified,
        })
        .collect()
}

/// `com/acme/Foo$Bar.class` becomes `com.acme.Foo.Bar`.
///
/// Anonymous and local classes (`Foo$1`), `module-info` and `package-info`
/// are not addressable by name and are skipped.
fn class_entry_name(entry: &str) -> Option<String> {
    let stem = entry.strip_suffix(".class")?;
    let file = stem.rsplit('/').next().unwrap_or(stem);
    if file == "module-info" || file == "package-info" {
        return None;
    }
    if stem
        .split('$')
        .skip(1)
        .any(|seg| seg.chars().next().map_or(true, |c| c.is_ascii_digit()))
    {
        return None;
    }
    Some(stem.replace(['/', '$'], "."))
}

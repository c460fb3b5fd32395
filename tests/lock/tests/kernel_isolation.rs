//! Build-graph isolation: the kernel is pure data in, bytes out.
//!
//! Nothing under `kernel/` may spawn processes, log, parse command lines or
//! depend on the harness. Digests must be reproducible from the kernel alone.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use xsdigest_kernel::key::{Category, DomainType};

/// Forbidden patterns in non-comment kernel source lines.
const FORBIDDEN_PATTERNS: &[&str] = &[
    "std::process",
    "Command::new",
    "tracing::",
    "clap::",
    "xsdigest_harness",
    "std::env",
];

/// Dependencies the kernel manifest must not declare.
const FORBIDDEN_DEPS: &[&str] = &["tracing", "clap", "xsdigest-harness", "tempfile"];

fn walk(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, violations);
        } else if path.extension().is_some_and(|e| e == "rs") {
            check_file(&path, violations);
        }
    }
}

fn check_file(path: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            continue;
        }
        for pattern in FORBIDDEN_PATTERNS {
            if trimmed.contains(pattern) {
                violations.push((path.display().to_string(), line_no + 1, line.to_string()));
            }
        }
    }
}

fn workspace_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
}

#[test]
fn kernel_source_is_side_effect_free() {
    let mut violations = Vec::new();
    walk(&workspace_root().join("kernel").join("src"), &mut violations);
    if !violations.is_empty() {
        let mut msg = String::from("forbidden references in kernel source:\n");
        for (file, line, content) in &violations {
            let _ = writeln!(msg, "  {file}:{line}: {content}");
        }
        panic!("{msg}");
    }
}

#[test]
fn kernel_manifest_has_no_orchestration_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("kernel").join("Cargo.toml"))
        .expect("kernel/Cargo.toml readable");
    for dep in FORBIDDEN_DEPS {
        let declared = manifest
            .lines()
            .map(str::trim)
            .any(|line| line.starts_with(&format!("{dep} ")) || line.starts_with(&format!("{dep}=")));
        assert!(!declared, "kernel/Cargo.toml declares forbidden dependency {dep}");
    }
}

// ---------------------------------------------------------------------------
// Vocabulary counts
// ---------------------------------------------------------------------------

#[test]
fn category_set_count() {
    assert_eq!(
        Category::ALL.len(),
        18,
        "expected 18 result categories; if you added one, update this count and the fixtures"
    );
}

#[test]
fn domain_type_set_count() {
    assert_eq!(DomainType::ALL.len(), 3);
}

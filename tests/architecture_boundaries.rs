use std::fs;
use std::path::{Path, PathBuf};

fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

/// Crate-relative path with forward slashes, e.g. `src/system/rate.rs`.
fn rel(path: &Path) -> String {
    path.strip_prefix(manifest_dir())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Every `(file, needle)` pair under `src/<dir>` whose source mentions one of
/// `needles`.
fn mentions(dir: &str, needles: &[&str]) -> Vec<String> {
    rs_files(&manifest_dir().join("src").join(dir))
        .into_iter()
        .flat_map(|file| {
            let content = fs::read_to_string(&file).unwrap_or_default();
            needles
                .iter()
                .filter(|needle| content.contains(*needle))
                .map(|needle| format!("{} mentions `{}`", rel(&file), needle))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn sampling_core_does_not_know_about_the_terminal() {
    let violations = mentions(
        "system",
        &["crate::ui", "crate::app", "crate::event", "ratatui", "crossterm"],
    );
    assert!(
        violations.is_empty(),
        "Sampler layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn ui_reads_snapshots_not_probes() {
    let violations = mentions(
        "ui",
        &["crate::system::collector", "crate::system::platform", "sysinfo"],
    );
    assert!(
        violations.is_empty(),
        "UI/probe boundary violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn target_os_cfg_is_scoped_to_system_platform() {
    let violations: Vec<String> = mentions("", &["target_os"])
        .into_iter()
        .filter(|v| !v.starts_with("src/system/platform/"))
        .collect();
    assert!(
        violations.is_empty(),
        "Unexpected target_os cfg usage:\n{}",
        violations.join("\n")
    );
}

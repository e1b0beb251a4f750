//! Console summaries for `build` and `check`.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout. Diagnostics emitted
//! while the steps run go through `tracing` instead; this is the summary
//! printed once everything is done.
//!
//! ```text
//! Pages
//!     001 → 001.html
//!     002 → 002.html
//!     003 skipped: page 003: missing field `title`
//!
//! Site
//!     Index → index.html
//!     Feed → rss.xml
//!     Archive → archive.html
//!
//! Navigation
//!     Patched 3 files
//!     No placeholder: about.html
//!
//! Generated 2 pages, 1 skipped
//! ```

use crate::pipeline::{BuildReport, CheckReport, StepStatus};
use crate::types::page_file_name;
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn step_line(label: &str, status: &StepStatus) -> String {
    match status {
        StepStatus::Written(path) => format!("{}{label} → {}", indent(1), display_name(path)),
        StepStatus::Skipped(reason) => format!("{}{label} skipped: {reason}", indent(1)),
        StepStatus::Failed(reason) => format!("{}{label} FAILED: {reason}", indent(1)),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format the build summary.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for key in &report.pages.rendered {
        lines.push(format!("{}{key} → {}", indent(1), page_file_name(key)));
    }
    for (key, reason) in &report.pages.skipped {
        lines.push(format!("{}{key} skipped: {reason}", indent(1)));
    }

    if !report.numbering_issues.is_empty() {
        lines.push(String::new());
        lines.push("Numbering".to_string());
        for issue in &report.numbering_issues {
            lines.push(format!("{}{issue}", indent(1)));
        }
    }

    lines.push(String::new());
    lines.push("Site".to_string());
    lines.push(step_line("Index", &report.index));
    lines.push(step_line("Feed", &report.feed));
    lines.push(step_line("Archive", &report.archive));

    lines.push(String::new());
    lines.push("Navigation".to_string());
    match &report.patch {
        None => lines.push(format!("{}skipped: no header links", indent(1))),
        Some(patch) => {
            lines.push(format!(
                "{}Patched {}",
                indent(1),
                plural(patch.patched.len(), "file")
            ));
            for path in &patch.without_placeholder {
                lines.push(format!("{}No placeholder: {}", indent(1), display_name(path)));
            }
            for (path, reason) in &patch.failed {
                lines.push(format!("{}FAILED {}: {reason}", indent(1), display_name(path)));
            }
        }
    }

    lines.push(String::new());
    let mut summary = format!("Generated {}", plural(report.pages.rendered.len(), "page"));
    if !report.pages.skipped.is_empty() {
        summary.push_str(&format!(", {} skipped", report.pages.skipped.len()));
    }
    lines.push(summary);
    lines
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

/// Format the findings of `check`.
pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} of {} decoded",
        report.valid_pages,
        plural(report.total_pages, "page")
    )];
    if report.problems.is_empty() {
        lines.push("No problems found".to_string());
    } else {
        lines.push(String::new());
        lines.push("Problems".to_string());
        for problem in &report.problems {
            lines.push(format!("{}{problem}", indent(1)));
        }
    }
    lines
}

pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}

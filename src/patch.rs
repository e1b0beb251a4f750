//! In-place replacement of the navigation placeholder.
//!
//! Runs last, over every `*.html` file directly inside the output directory,
//! whether or not it was produced by this build. The `div` with
//! `id="nav"` is located with an HTML parser and its byte span is replaced
//! by the header bar; everything around it is kept byte for byte. Since the
//! header bar is itself `div id="nav"`, patching is idempotent.

use crate::nav::NAV_PLACEHOLDER_ID;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot list HTML files: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("cannot parse HTML: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Replaced,
    NoPlaceholder,
}

/// Per-file results of a patch run.
#[derive(Debug, Default)]
pub struct PatchReport {
    pub patched: Vec<PathBuf>,
    pub without_placeholder: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Replace the placeholder in `html`. `None` when there is no placeholder.
pub fn replace_placeholder(html: &str, fragment: &str) -> Result<Option<String>, PatchError> {
    let dom = tl::parse(html, tl::ParserOptions::default().track_ids())
        .map_err(|e| PatchError::Parse(format!("{e:?}")))?;
    let parser = dom.parser();

    let Some(tag) = dom
        .get_element_by_id(NAV_PLACEHOLDER_ID)
        .and_then(|handle| handle.get(parser))
        .and_then(|node| node.as_tag())
    else {
        return Ok(None);
    };
    if !tag.name().as_utf8_str().eq_ignore_ascii_case("div") {
        return Ok(None);
    }

    let (start, _) = tag.boundaries(parser);
    let end = start + tag.raw().as_bytes().len();
    let mut patched = String::with_capacity(html.len() - (end - start) + fragment.len());
    patched.push_str(&html[..start]);
    patched.push_str(fragment);
    patched.push_str(&html[end..]);
    Ok(Some(patched))
}

/// Patch a single file in place.
pub fn patch_file(path: &Path, fragment: &str) -> Result<PatchOutcome, PatchError> {
    let html = fs::read_to_string(path)?;
    match replace_placeholder(&html, fragment)? {
        Some(patched) => {
            fs::write(path, patched)?;
            Ok(PatchOutcome::Replaced)
        }
        None => Ok(PatchOutcome::NoPlaceholder),
    }
}

/// Every `*.html` file directly inside `dir`, sorted by name.
pub fn html_files(dir: &Path) -> Result<Vec<PathBuf>, PatchError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let is_html = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == "html");
        if entry.file_type().is_file() && is_html {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Patch every HTML file in `dir`. Per-file failures are logged and recorded.
pub fn patch_all(dir: &Path, fragment: &str) -> Result<PatchReport, PatchError> {
    let mut report = PatchReport::default();
    for path in html_files(dir)? {
        match patch_file(&path, fragment) {
            Ok(PatchOutcome::Replaced) => {
                info!("Replaced navigation in {}", path.display());
                report.patched.push(path);
            }
            Ok(PatchOutcome::NoPlaceholder) => {
                warn!(
                    "No 'div' with id '{NAV_PLACEHOLDER_ID}' found in {}. Skipping...",
                    path.display()
                );
                report.without_placeholder.push(path);
            }
            Err(e) => {
                error!("Error processing {}: {e}", path.display());
                report.failed.push((path, e.to_string()));
            }
        }
    }
    Ok(report)
}

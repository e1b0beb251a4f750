//! Loading of the YAML content documents.
//!
//! Four independent documents feed a build: site info, front matter, header
//! links and the optional custom HTML table. Every loader returns a `Result`
//! so the caller decides whether a missing document aborts the build or just
//! switches a feature off; [`load_or_log`] is the "log it and carry on"
//! variant.
//!
//! Front matter is kept as raw YAML per page and decoded entry by entry, so
//! one malformed page never prevents the others from being built.

use crate::types::{
    CustomHtml, HeaderLink, Page, PageEntry, SiteInfo, format_page_key, page_number,
    page_sort_key,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("page {key}: {source}")]
    Entry {
        key: String,
        source: serde_yaml::Error,
    },
}

/// Problems with the page-key numbering. Navigation assumes keys run
/// densely from `001`; these are reported but never fatal.
#[derive(Error, Debug, PartialEq)]
pub enum NumberingIssue {
    #[error("page key '{0}' is not a number")]
    NonNumeric(String),
    #[error("{}", describe_gap(.first, .last))]
    Gap { first: String, last: String },
    #[error("page key '{found}' found where '{expected}' was expected")]
    OutOfSequence { expected: String, found: String },
}

fn describe_gap(first: &str, last: &str) -> String {
    if first == last {
        format!("page {first} is missing")
    } else {
        format!("pages {first} to {last} are missing")
    }
}

/// Read and deserialize a YAML document.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ContentError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a document, logging and returning `None` on any failure.
pub fn load_or_log<T: DeserializeOwned>(path: &Path, what: &str) -> Option<T> {
    match load_yaml(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Error reading {what}: {e}");
            None
        }
    }
}

pub fn load_site_info(path: &Path) -> Result<SiteInfo, ContentError> {
    load_yaml(path)
}

pub fn load_header_links(path: &Path) -> Result<Vec<HeaderLink>, ContentError> {
    load_yaml(path)
}

/// Custom per-page HTML. Absent or malformed tables degrade to empty.
pub fn load_custom_html(path: &Path) -> BTreeMap<String, CustomHtml> {
    if !path.exists() {
        debug!(
            "{} not found, skipping custom HTML insertion",
            path.display()
        );
        return BTreeMap::new();
    }
    load_or_log(path, "custom HTML table").unwrap_or_default()
}

/// Page metadata in page order: numeric keys by value, so `"1000"` follows
/// `"999"`, then any non-numeric keys.
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    entries: Vec<(String, serde_yaml::Value)>,
}

impl FrontMatter {
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        Ok(Self::from_entries(load_yaml(path)?))
    }

    pub fn from_entries(entries: BTreeMap<String, serde_yaml::Value>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| page_sort_key(a).cmp(&page_sort_key(b)));
        Self { entries }
    }

    /// Total number of entries, decodable or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key of the last page: the entry count, zero-padded.
    pub fn max_page_key(&self) -> String {
        format_page_key(u32::try_from(self.entries.len()).unwrap_or(u32::MAX))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Decode every entry in page order, one result per entry.
    pub fn entries(&self) -> impl Iterator<Item = Result<Page, ContentError>> + '_ {
        self.entries.iter().map(|(key, raw)| decode_entry(key, raw))
    }

    /// All decodable pages in page order.
    ///
    /// Undecodable entries and non-numeric keys are dropped quietly; the
    /// page renderer is the stage that reports them.
    pub fn pages(&self) -> Vec<Page> {
        self.entries()
            .filter_map(|result| match result {
                Ok(page) if page_number(&page.key).is_some() => Some(page),
                Ok(page) => {
                    debug!("Leaving out page with non-numeric key '{}'", page.key);
                    None
                }
                Err(e) => {
                    debug!("Leaving out {e}");
                    None
                }
            })
            .collect()
    }

    /// Check that keys are exactly `001..=N`.
    ///
    /// Each run of missing numbers is reported once; numbering resumes from
    /// the key found after it.
    pub fn numbering_issues(&self) -> Vec<NumberingIssue> {
        let mut issues = Vec::new();
        let mut expected = 1u32;
        for key in self.keys() {
            let Some(n) = page_number(key) else {
                issues.push(NumberingIssue::NonNumeric(key.to_string()));
                continue;
            };
            if n < expected || key != format_page_key(n) {
                issues.push(NumberingIssue::OutOfSequence {
                    expected: format_page_key(expected),
                    found: key.to_string(),
                });
                expected = expected.max(n.saturating_add(1));
                continue;
            }
            if n > expected {
                issues.push(NumberingIssue::Gap {
                    first: format_page_key(expected),
                    last: format_page_key(n - 1),
                });
            }
            expected = n.saturating_add(1);
        }
        issues
    }
}

fn decode_entry(key: &str, raw: &serde_yaml::Value) -> Result<Page, ContentError> {
    let entry: PageEntry =
        serde_yaml::from_value(raw.clone()).map_err(|source| ContentError::Entry {
            key: key.to_string(),
            source,
        })?;
    Ok(Page {
        key: key.to_string(),
        entry,
    })
}

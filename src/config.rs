//! Build configuration.
//!
//! Controls where the content documents are read from and where the generated
//! site is written. Everything has a default, so a site directory containing
//! only the YAML documents builds without any `config.toml` at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_dir = "assets"     # Page media, matched by page-key prefix
//! output_dir = "."          # Pages, index, feed and archive are written here
//! # assets_url = "../assets"  # Media URL prefix; derived from the two above when unset
//!
//! [input]
//! site_info = "site_info.yaml"
//! front_matter = "front_matter.yaml"
//! header = "header.yaml"
//! custom_html = "custom_html.yaml"
//!
//! [output]
//! index = "index.html"
//! feed = "rss.xml"
//! archive = "archive.html"
//!
//! [feed]
//! source_timezone = "America/Los_Angeles"
//! language = "en-us"
//! ```
//!
//! User files are sparse: their keys are merged on top of the stock defaults
//! and unknown keys are rejected to catch typos early.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory holding page images and videos, relative to the site root.
    pub assets_dir: String,
    /// Directory receiving generated files, relative to the site root.
    pub output_dir: String,
    /// URL prefix of media as seen from the generated pages. When unset it
    /// is the path from `output_dir` to `assets_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_url: Option<String>,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub feed: FeedConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            output_dir: ".".to_string(),
            assets_url: None,
            input: InputConfig::default(),
            output: OutputConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

/// File names of the YAML content documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub site_info: String,
    pub front_matter: String,
    pub header: String,
    pub custom_html: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            site_info: "site_info.yaml".to_string(),
            front_matter: "front_matter.yaml".to_string(),
            header: "header.yaml".to_string(),
            custom_html: "custom_html.yaml".to_string(),
        }
    }
}

/// File names of the site-level outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub index: String,
    pub feed: String,
    pub archive: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index: "index.html".to_string(),
            feed: "rss.xml".to_string(),
            archive: "archive.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// IANA zone the front-matter dates are written in.
    pub source_timezone: String,
    pub language: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source_timezone: "America/Los_Angeles".to_string(),
            language: "en-us".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.source_timezone.parse::<Tz>().map_err(|_| {
            ConfigError::Validation(format!(
                "feed.source_timezone: unknown time zone '{}'",
                self.source_timezone
            ))
        })
    }
}

impl BuildConfig {
    /// URL prefix for page media, from `assets_url` or derived from the
    /// directory layout.
    pub fn assets_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.assets_url {
            return Ok(url.clone());
        }
        relative_url(&self.output_dir, &self.assets_dir).ok_or_else(|| {
            ConfigError::Validation(format!(
                "cannot derive a media URL from output_dir '{}' to assets_dir '{}'; set assets_url",
                self.output_dir, self.assets_dir
            ))
        })
    }

    /// Validate values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.feed.timezone()?;
        self.assets_url()?;
        let names = [
            ("input.site_info", &self.input.site_info),
            ("input.front_matter", &self.input.front_matter),
            ("input.header", &self.input.header),
            ("input.custom_html", &self.input.custom_html),
            ("output.index", &self.output.index),
            ("output.feed", &self.output.feed),
            ("output.archive", &self.output.archive),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

fn plain_components(dir: &str) -> Option<Vec<String>> {
    Path::new(dir)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Relative URL of directory `target` from directory `from`, both given
/// relative to the site root. `None` for absolute paths or paths using `..`.
pub fn relative_url(from: &str, target: &str) -> Option<String> {
    let from = plain_components(from)?;
    let target = plain_components(target)?;
    let common = from.iter().zip(&target).take_while(|(a, b)| a == b).count();
    let mut parts = vec![".."; from.len() - common];
    parts.extend(target[common..].iter().map(String::as_str));
    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}

/// Resolved filesystem locations for one build.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl SitePaths {
    pub fn new(root: &Path, config: &BuildConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            assets_dir: root.join(&config.assets_dir),
            output_dir: root.join(&config.output_dir),
        }
    }

    pub fn input(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `config.toml` from the site root. `Ok(None)` when the file is absent.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BuildConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the build config for a site root, falling back to stock defaults.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// Fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# comic-press configuration
# ========================
#
# Every key is optional. Delete anything you don't need to change; the
# values below are the built-in defaults.

# Directory holding page media. Files whose name starts with a page key
# (e.g. 007.png, 007-b.png, 007.mp4) are shown on that page, sorted by name.
assets_dir = "assets"

# Where generated pages, the index, the feed and the archive are written.
# Every *.html file directly inside it gets its navigation bar refreshed.
output_dir = "."

# URL prefix for media in generated pages. By default this is the path from
# output_dir to assets_dir (e.g. "../assets" for output_dir = "public").
# Set it when media is served from elsewhere, or when either directory is
# absolute or uses "..".
# assets_url = "https://media.example.com/comic"

[input]
# Site title, author and public domain.
site_info = "site_info.yaml"
# Page metadata keyed by zero-padded page number ("001", "002", ...).
front_matter = "front_matter.yaml"
# Ordered list of {name, link} entries for the top navigation bar.
header = "header.yaml"
# Optional map of page key -> {html} injected above the author's notes.
custom_html = "custom_html.yaml"

[output]
# Copy of the newest page, served as the site entry point.
index = "index.html"
# RSS 2.0 feed, newest page first.
feed = "rss.xml"
# Table of every page.
archive = "archive.html"

[feed]
# IANA time zone the front-matter dates are written in. Dates are
# converted from this zone to UTC for the feed.
source_timezone = "America/Los_Angeles"
language = "en-us"
"##
}

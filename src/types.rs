//! Shared data model for the content documents.
//!
//! These types are produced once by [`crate::content`] and borrowed read-only
//! by every later stage. Page keys are kept as the strings found in the front
//! matter; [`page_number`] and [`format_page_key`] convert between the
//! zero-padded text form and the numeric position used for navigation.

use serde::{Deserialize, Deserializer, de::Error as _};

/// Site-wide metadata from `site_info.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteInfo {
    #[serde(deserialize_with = "scalar")]
    pub title: String,
    #[serde(deserialize_with = "scalar")]
    pub author: String,
    /// Public base URL of the site, used for absolute feed links.
    #[serde(default, deserialize_with = "scalar")]
    pub domain: String,
}

/// Front matter for a single comic page.
///
/// Scalar fields accept any YAML scalar, so `Chapter: 1` and `Chapter: "1"`
/// both decode to the label `"1"`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    #[serde(rename = "Chapter", deserialize_with = "scalar")]
    pub chapter: String,
    #[serde(deserialize_with = "scalar")]
    pub page: String,
    #[serde(deserialize_with = "scalar")]
    pub title: String,
    /// Short description; doubles as the alt text of page images.
    #[serde(default, deserialize_with = "scalar")]
    pub desc: String,
    /// Author's note in markdown.
    #[serde(default, deserialize_with = "scalar")]
    pub note: String,
    /// Publish date, `Dow, DD Mon YYYY HH:MM:SS ±ZZZZ`.
    #[serde(deserialize_with = "scalar")]
    pub date: String,
}

/// One entry of the header link bar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeaderLink {
    #[serde(deserialize_with = "scalar")]
    pub name: String,
    #[serde(deserialize_with = "scalar")]
    pub link: String,
}

/// Raw HTML injected above a page's author notes.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomHtml {
    pub html: String,
}

/// A decoded page together with its key.
#[derive(Debug, Clone)]
pub struct Page {
    pub key: String,
    pub entry: PageEntry,
}

impl Page {
    /// Output file name, `<key>.html`.
    pub fn file_name(&self) -> String {
        page_file_name(&self.key)
    }
}

/// Numeric value of a page key. Keys must be non-empty ASCII digits.
pub fn page_number(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Zero-pad a page number to the 3-digit key form (`7` → `"007"`).
pub fn format_page_key(number: u32) -> String {
    format!("{number:03}")
}

/// Ordering key for page keys: numeric keys by value, then non-numeric keys
/// after them. Ties fall back to the text so the order is total.
pub fn page_sort_key(key: &str) -> (u32, &str) {
    (page_number(key).unwrap_or(u32::MAX), key)
}

pub fn page_file_name(key: &str) -> String {
    format!("{key}.html")
}

/// Accept any YAML scalar as text. `null` becomes the empty string.
fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a scalar value, found {other:?}"
        ))),
    }
}

//! Per-page HTML generation.
//!
//! Every front-matter entry becomes `<key>.html` in the output directory:
//!
//! ```text
//! head         fixed stylesheet/script references, "<site> - By <author> - <title>"
//! header       home link + empty navigation placeholder (filled by the patcher)
//! headings     Chapter / Page / Title
//! comic nav    first / previous / next / last
//! media        every asset named <key>*.*: <video> for .mp4, <img> otherwise
//! comic nav    repeated below the media
//! notes        "Author's Notes", optional custom HTML, rendered markdown note
//! ```
//!
//! Pages are independent: a page that fails to decode or write is logged and
//! skipped, and the remaining pages are still generated. There is no rollback.

use crate::content::{ContentError, FrontMatter};
use crate::nav::{self, NAV_PLACEHOLDER_ID, NavTargets};
use crate::types::{CustomHtml, Page, SiteInfo, page_file_name, page_number};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, html as md_html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot list assets: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("page key '{0}' is not a number")]
    InvalidKey(String),
}

const BOOTSTRAP_CSS: &str = "https://stackpath.bootstrapcdn.com/bootstrap/4.3.1/css/bootstrap.min.css";
const BOOTSTRAP_CSS_SRI: &str =
    "sha384-ggOyR0iXCbMQv3Xipma34MD+dH/1fQ784/j6cY/iJTQUOhcWr7x9JvoRxT2MZw1T";
const JQUERY_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/jquery/3.3.1/jquery.min.js";
const POPPER_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/popper.js/1.14.7/umd/popper.min.js";
const POPPER_JS_SRI: &str =
    "sha384-UO2eT0CpHqdSJQ6hJty5KVphtPhzWj9WO1clHTMGa3JDZwrnQq4sF86dIHNDz0W1";
const LIGHTBOX_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/ekko-lightbox/5.3.0/ekko-lightbox.css";
const LIGHTBOX_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/ekko-lightbox/5.3.0/ekko-lightbox.js";
const SITE_CSS: &str = "css/style.css";
const BOOTSTRAP_JS: &str = "https://stackpath.bootstrapcdn.com/bootstrap/4.3.1/js/bootstrap.min.js";
const BOOTSTRAP_JS_SRI: &str =
    "sha384-JjSmVgyd0p3pXB1rRibZUAYoIIy6OrQ6VrjIEaFf/nJGzIxFDsf4x0xIM+B07jRM";
const LOGO: &str = "img/logo.png";

const VIDEO_FALLBACK: &str = "Your browser does not support the video tag.";

/// Read-only inputs shared by every page of one build.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub site: &'a SiteInfo,
    pub custom_html: &'a BTreeMap<String, CustomHtml>,
    /// Directory searched for page media.
    pub assets_dir: &'a Path,
    /// URL prefix for media, as seen from the generated pages.
    pub assets_url: &'a str,
    /// Target of the logo link.
    pub home_href: &'a str,
}

/// What happened to each front-matter entry.
#[derive(Debug, Default)]
pub struct RenderOutcome {
    /// Keys written successfully, in key order.
    pub rendered: Vec<String>,
    /// Keys skipped, with the reason.
    pub skipped: Vec<(String, String)>,
    /// The last page written, used to seed the index page.
    pub last_written: Option<PathBuf>,
}

/// A piece of page media.
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Video { src: String },
    Image { src: String, alt: String },
}

impl Media {
    /// Classify an asset by extension: `.mp4` is video, everything else an image.
    pub fn from_file_name(file_name: &str, url_prefix: &str, alt: &str) -> Self {
        let src = asset_url(url_prefix, file_name);
        let is_video = Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
        if is_video {
            Media::Video { src }
        } else {
            Media::Image {
                src,
                alt: alt.to_string(),
            }
        }
    }

    fn markup(&self) -> Markup {
        match self {
            Media::Video { src } => html! {
                video src=(src) controls { (VIDEO_FALLBACK) }
                br;
            },
            Media::Image { src, alt } => html! {
                img src=(src) alt=(alt);
                br;
            },
        }
    }
}

fn asset_url(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() || prefix == "." {
        file_name.to_string()
    } else {
        format!("{prefix}/{file_name}")
    }
}

/// Render every page in ascending key order into `output_dir`.
pub fn render_pages(
    front_matter: &FrontMatter,
    ctx: &RenderContext<'_>,
    output_dir: &Path,
) -> RenderOutcome {
    let mut outcome = RenderOutcome::default();
    let max_page = page_number(&front_matter.max_page_key()).unwrap_or(1);

    for (key, decoded) in front_matter.keys().zip(front_matter.entries()) {
        let output_file = output_dir.join(page_file_name(key));
        if output_file.exists()
            && let Err(e) = fs::remove_file(&output_file)
        {
            error!("Error deleting file {}: {e}", output_file.display());
            outcome.skipped.push((key.to_string(), e.to_string()));
            continue;
        }

        let result = decoded
            .map_err(RenderError::from)
            .and_then(|page| write_page(&page, max_page, ctx, &output_file));

        match result {
            Ok(()) => {
                info!("Generated {}", output_file.display());
                outcome.rendered.push(key.to_string());
                outcome.last_written = Some(output_file);
            }
            Err(e) => {
                error!("Error generating {}: {e}", output_file.display());
                outcome.skipped.push((key.to_string(), e.to_string()));
            }
        }
    }

    outcome
}

fn write_page(
    page: &Page,
    max_page: u32,
    ctx: &RenderContext<'_>,
    output_file: &Path,
) -> Result<(), RenderError> {
    let current = page_number(&page.key).ok_or_else(|| RenderError::InvalidKey(page.key.clone()))?;
    let media = find_assets(ctx.assets_dir, &page.key)?
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| Media::from_file_name(&name.to_string_lossy(), ctx.assets_url, &page.entry.desc))
        .collect::<Vec<_>>();
    let targets = NavTargets::new(current, max_page);
    let document = render_page(page, &targets, &media, ctx);
    fs::write(output_file, document.into_string())?;
    Ok(())
}

/// Asset files directly inside `assets_dir` named `<key>*.*`, sorted by name.
pub fn find_assets(assets_dir: &Path, key: &str) -> Result<Vec<PathBuf>, RenderError> {
    if !assets_dir.is_dir() {
        debug!("No assets directory at {}", assets_dir.display());
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(assets_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = {
            let name = entry.file_name().to_string_lossy();
            name.strip_prefix(key).is_some_and(|rest| rest.contains('.'))
        };
        if matches {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Markdown to HTML, with every newline inside a paragraph kept as `<br />`.
pub fn render_note(markdown: &str) -> String {
    let parser = Parser::new(markdown).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// The complete HTML document for one page.
pub fn render_page(
    page: &Page,
    targets: &NavTargets,
    media: &[Media],
    ctx: &RenderContext<'_>,
) -> Markup {
    let entry = &page.entry;
    let comic_nav = nav::comic_nav(targets);
    let custom = ctx.custom_html.get(&page.key);
    let note_html = render_note(&entry.note);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1";
                title { (ctx.site.title) " - By " (ctx.site.author) " - " (entry.title) }
                link rel="stylesheet" href=(BOOTSTRAP_CSS) integrity=(BOOTSTRAP_CSS_SRI) crossorigin="anonymous";
                script src=(JQUERY_JS) crossorigin="anonymous" {}
                script src=(POPPER_JS) integrity=(POPPER_JS_SRI) crossorigin="anonymous" {}
                link href=(LIGHTBOX_CSS) rel="stylesheet" crossorigin="anonymous";
                script src=(LIGHTBOX_JS) crossorigin="anonymous" {}
                link href=(SITE_CSS) rel="stylesheet";
                script src=(BOOTSTRAP_JS) integrity=(BOOTSTRAP_JS_SRI) crossorigin="anonymous" {}
                link rel="preconnect" href="https://fonts.googleapis.com/";
                link rel="preconnect" href="https://fonts.gstatic.com/" crossorigin="";
            }
            body {
                div align="center" {
                    div.writeHeader {
                        header align="center" {
                            a href=(ctx.home_href) { img src=(LOGO) alt=""; }
                            div id=(NAV_PLACEHOLDER_ID) {}
                        }
                    }
                    h1 { "Chapter: " (entry.chapter) }
                    h2 { "Page: " (entry.page) }
                    h2 { "Title: " (entry.title) }
                    div.writeNav { (comic_nav) }
                    div.comicPage {
                        @for item in media {
                            (item.markup())
                        }
                    }
                    div.writeNav { (comic_nav) }
                    h1 { "Author's Notes" }
                    @if let Some(custom) = custom {
                        (PreEscaped(&custom.html))
                    }
                    div.authorNotes { (PreEscaped(note_html)) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageEntry;
    use tempfile::TempDir;

    fn site() -> SiteInfo {
        SiteInfo {
            title: "Moth Light".to_string(),
            author: "Ana Ruiz".to_string(),
            domain: "https://mothlight.example".to_string(),
        }
    }

    fn page(key: &str, title: &str) -> Page {
        Page {
            key: key.to_string(),
            entry: PageEntry {
                chapter: "1".to_string(),
                page: key.trim_start_matches('0').to_string(),
                title: title.to_string(),
                desc: "A moth circles a lamp".to_string(),
                note: "First line\nsecond line".to_string(),
                date: "Mon, 01 Jan 2024 10:00:00 -0800".to_string(),
            },
        }
    }

    fn ctx<'a>(
        site: &'a SiteInfo,
        custom: &'a BTreeMap<String, CustomHtml>,
        assets: &'a Path,
    ) -> RenderContext<'a> {
        RenderContext {
            site,
            custom_html: custom,
            assets_dir: assets,
            assets_url: "assets",
            home_href: "index.html",
        }
    }

    #[test]
    fn note_turns_newlines_into_breaks() {
        let html = render_note("First line\nsecond line");
        assert_eq!(html, "<p>First line<br />\nsecond line</p>\n");
    }

    #[test]
    fn note_renders_markdown() {
        let html = render_note("Some **bold** and a [link](https://example.com).");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains(r#"<a href="https://example.com">link</a>"#));
    }

    #[test]
    fn empty_note_renders_nothing() {
        assert_eq!(render_note(""), "");
    }

    #[test]
    fn mp4_becomes_video() {
        let media = Media::from_file_name("003.mp4", "assets", "desc");
        assert_eq!(
            media,
            Media::Video {
                src: "assets/003.mp4".to_string()
            }
        );
        let html = media.markup().into_string();
        assert!(html.contains("<video"));
        assert!(html.contains("controls"));
        assert!(html.contains(VIDEO_FALLBACK));
    }

    #[test]
    fn other_extensions_become_images_with_desc_alt() {
        let media = Media::from_file_name("003-b.png", "assets/", "A moth");
        let html = media.markup().into_string();
        assert_eq!(html, r#"<img src="assets/003-b.png" alt="A moth"><br>"#);
    }

    #[test]
    fn find_assets_matches_prefix_sorted() {
        let tmp = TempDir::new().unwrap();
        for name in ["002-b.png", "001.png", "002.mp4", "002-a.jpg", "002", "x002.png"] {
            fs::write(tmp.path().join(name), b"").unwrap();
        }
        fs::create_dir(tmp.path().join("002.dir")).unwrap();

        let found = find_assets(tmp.path(), "002").unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["002-a.jpg", "002-b.png", "002.mp4"]);
    }

    #[test]
    fn find_assets_without_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(find_assets(&tmp.path().join("missing"), "001").unwrap().is_empty());
    }

    #[test]
    fn page_document_structure() {
        let site = site();
        let custom = BTreeMap::new();
        let tmp = TempDir::new().unwrap();
        let media = vec![Media::from_file_name("001.png", "assets", "A moth circles a lamp")];
        let html = render_page(
            &page("001", "Lamp"),
            &NavTargets::new(1, 2),
            &media,
            &ctx(&site, &custom, tmp.path()),
        )
        .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Moth Light - By Ana Ruiz - Lamp</title>"));
        assert!(html.contains(r#"<div id="nav"></div>"#));
        assert!(html.contains("<h1>Chapter: 1</h1>"));
        assert!(html.contains("<h2>Page: 1</h2>"));
        assert!(html.contains("<h2>Title: Lamp</h2>"));
        assert_eq!(html.matches(r#"class="comicNav""#).count(), 2);
        assert!(html.contains(r#"<img src="assets/001.png" alt="A moth circles a lamp">"#));
        assert!(html.contains("<h1>Author's Notes</h1>"));
        assert!(html.contains(r#"<div class="authorNotes"><p>First line<br />"#));
        assert!(html.contains(BOOTSTRAP_CSS_SRI));
    }

    #[test]
    fn media_sits_between_the_two_nav_strips() {
        let site = site();
        let custom = BTreeMap::new();
        let tmp = TempDir::new().unwrap();
        let media = vec![Media::from_file_name("001.png", "assets", "x")];
        let html = render_page(
            &page("001", "Lamp"),
            &NavTargets::new(1, 1),
            &media,
            &ctx(&site, &custom, tmp.path()),
        )
        .into_string();
        let first_nav = html.find("comicNav").unwrap();
        let img = html.find("assets/001.png").unwrap();
        let last_nav = html.rfind("comicNav").unwrap();
        assert!(first_nav < img && img < last_nav);
    }

    #[test]
    fn custom_html_injected_verbatim_before_notes() {
        let site = site();
        let mut custom = BTreeMap::new();
        custom.insert(
            "001".to_string(),
            CustomHtml {
                html: r#"<iframe src="https://shop.example"></iframe>"#.to_string(),
            },
        );
        let tmp = TempDir::new().unwrap();
        let html = render_page(
            &page("001", "Lamp"),
            &NavTargets::new(1, 1),
            &[],
            &ctx(&site, &custom, tmp.path()),
        )
        .into_string();
        let iframe = html.find(r#"<iframe src="https://shop.example"></iframe>"#).unwrap();
        assert!(html.find("Author's Notes").unwrap() < iframe);
        assert!(iframe < html.find("authorNotes").unwrap());
    }

    #[test]
    fn custom_html_only_on_matching_page() {
        let site = site();
        let mut custom = BTreeMap::new();
        custom.insert("002".to_string(), CustomHtml { html: "<hr id=\"promo\">".to_string() });
        let tmp = TempDir::new().unwrap();
        let html = render_page(
            &page("001", "Lamp"),
            &NavTargets::new(1, 2),
            &[],
            &ctx(&site, &custom, tmp.path()),
        )
        .into_string();
        assert!(!html.contains("promo"));
    }

    #[test]
    fn titles_are_escaped() {
        let site = site();
        let custom = BTreeMap::new();
        let tmp = TempDir::new().unwrap();
        let html = render_page(
            &page("001", "<script>x</script>"),
            &NavTargets::new(1, 1),
            &[],
            &ctx(&site, &custom, tmp.path()),
        )
        .into_string();
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    }

    #[test]
    fn render_pages_replaces_stale_output_and_tracks_last() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir(&assets).unwrap();
        fs::write(tmp.path().join("001.html"), "stale").unwrap();

        let fm = FrontMatter::from_entries(
            serde_yaml::from_str(
                r#"
"001": { Chapter: 1, page: 1, title: One, date: "Mon, 01 Jan 2024 10:00:00 -0800" }
"002": { Chapter: 1, page: 2, title: Two, date: "Tue, 02 Jan 2024 10:00:00 -0800" }
"#,
            )
            .unwrap(),
        );
        let site = site();
        let custom = BTreeMap::new();
        let outcome = render_pages(&fm, &ctx(&site, &custom, &assets), tmp.path());

        assert_eq!(outcome.rendered, vec!["001", "002"]);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.last_written, Some(tmp.path().join("002.html")));
        let first = fs::read_to_string(tmp.path().join("001.html")).unwrap();
        assert!(first.contains("Title: One"));
    }

    #[test]
    fn render_pages_skips_non_numeric_key() {
        let tmp = TempDir::new().unwrap();
        let fm = FrontMatter::from_entries(
            serde_yaml::from_str(
                r#"
"001": { Chapter: 1, page: 1, title: One, date: d }
"bonus": { Chapter: 1, page: x, title: Bonus, date: d }
"#,
            )
            .unwrap(),
        );
        let site = site();
        let custom = BTreeMap::new();
        let outcome = render_pages(&fm, &ctx(&site, &custom, tmp.path()), tmp.path());

        assert_eq!(outcome.rendered, vec!["001"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].0, "bonus");
        assert!(!tmp.path().join("bonus.html").exists());
    }
}

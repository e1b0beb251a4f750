//! # comic-press
//!
//! A static site generator for webcomics published one page at a time.
//! A site is a directory of YAML documents and media:
//!
//! ```text
//! site/
//! ├── config.toml          # Build settings (optional)
//! ├── site_info.yaml       # title, author, domain
//! ├── front_matter.yaml    # "001": {Chapter, page, title, desc, note, date}, ...
//! ├── header.yaml          # - {name, link} for the top navigation bar
//! ├── custom_html.yaml     # "007": {html} snippets (optional)
//! └── assets/
//!     ├── 001.png          # Media is matched to pages by key prefix
//!     ├── 002-a.png
//!     ├── 002-b.png
//!     └── 003.mp4
//! ```
//!
//! A build writes `001.html`, `002.html`, ..., copies the newest page to
//! `index.html`, emits `rss.xml` and `archive.html`, and finally swaps the
//! header bar into the navigation placeholder of every HTML file in the
//! output directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`content`] | YAML document loading and per-page decoding |
//! | [`types`] | Shared data model and page-key helpers |
//! | [`nav`] | Comic navigation strip and header bar markup |
//! | [`render`] | Per-page HTML: media discovery, markdown notes, document |
//! | [`feed`] | RSS 2.0 feed and source-zone → UTC date conversion |
//! | [`archive`] | Archive table page |
//! | [`patch`] | In-place navigation placeholder replacement |
//! | [`pipeline`] | Step orchestration and build report |
//! | [`output`] | Console summaries |
//!
//! # Failure Policy
//!
//! A build prefers partial output over nothing. Missing site info or front
//! matter stops the build before anything is written; after that, a broken
//! page is skipped, a bad feed date fails only the feed, and a file the
//! patcher cannot handle is left as it was. Every such event is logged and
//! recorded in the [`pipeline::BuildReport`].

pub mod archive;
pub mod config;
pub mod content;
pub mod feed;
pub mod nav;
pub mod output;
pub mod patch;
pub mod pipeline;
pub mod render;
pub mod types;

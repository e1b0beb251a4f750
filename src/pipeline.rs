//! Build orchestration.
//!
//! ```text
//! 1. Load     config.toml + YAML documents   (site info and front matter are required)
//! 2. Render   <key>.html per page             (failed pages skipped)
//! 3. Index    copy of the last page written   (index.html)
//! 4. Feed     rss.xml                         (any bad date fails this step)
//! 5. Archive  archive.html
//! 6. Patch    header bar into every *.html    (skipped without header links)
//! ```
//!
//! Steps 2–6 favor partial completion: a failure is logged, recorded in the
//! [`BuildReport`], and the remaining steps still run.

use crate::archive::build_archive;
use crate::config::{self, BuildConfig, ConfigError, SitePaths};
use crate::content::{
    ContentError, FrontMatter, NumberingIssue, load_custom_html, load_header_links,
    load_site_info,
};
use crate::feed::{build_feed, pub_date};
use crate::nav::header_bar;
use crate::patch::{PatchReport, patch_all};
use crate::render::{RenderContext, RenderOutcome, render_pages};
use crate::types::{CustomHtml, HeaderLink, SiteInfo};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one site-level output step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Written(PathBuf),
    Skipped(String),
    Failed(String),
}

impl StepStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed(_))
    }
}

#[derive(Debug)]
pub struct BuildReport {
    pub pages: RenderOutcome,
    pub index: StepStatus,
    pub feed: StepStatus,
    pub archive: StepStatus,
    /// `None` when patching was skipped for lack of header links.
    pub patch: Option<PatchReport>,
    pub numbering_issues: Vec<NumberingIssue>,
}

impl BuildReport {
    /// False when a whole step failed. Skipped pages alone don't count.
    pub fn is_success(&self) -> bool {
        !(self.index.is_failed() || self.feed.is_failed() || self.archive.is_failed())
    }
}

/// Everything a build reads, loaded up front.
#[derive(Debug)]
pub struct Site {
    pub config: BuildConfig,
    pub paths: SitePaths,
    pub info: SiteInfo,
    pub front_matter: FrontMatter,
    pub header_links: Option<Vec<HeaderLink>>,
    pub custom_html: BTreeMap<String, CustomHtml>,
}

impl Site {
    /// Load the config and content documents under `root`.
    ///
    /// Site info and front matter are required. Header links and custom HTML
    /// are optional and only logged when unavailable.
    pub fn load(root: &Path) -> Result<Self, BuildError> {
        let config = config::load_config(root)?;
        let paths = SitePaths::new(root, &config);
        let info = load_site_info(&paths.input(&config.input.site_info))?;
        let front_matter = FrontMatter::load(&paths.input(&config.input.front_matter))?;
        let header_links = match load_header_links(&paths.input(&config.input.header)) {
            Ok(links) => Some(links),
            Err(e) => {
                warn!("Error reading header links: {e}");
                None
            }
        };
        let custom_html = load_custom_html(&paths.input(&config.input.custom_html));

        Ok(Self {
            config,
            paths,
            info,
            front_matter,
            header_links,
            custom_html,
        })
    }

    /// Run every generation step.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let numbering_issues = self.front_matter.numbering_issues();
        for issue in &numbering_issues {
            warn!("{issue}; navigation assumes pages numbered densely from 001");
        }

        fs::create_dir_all(&self.paths.output_dir)?;

        let assets_url = self.config.assets_url()?;
        let ctx = RenderContext {
            site: &self.info,
            custom_html: &self.custom_html,
            assets_dir: &self.paths.assets_dir,
            assets_url: &assets_url,
            home_href: &self.config.output.index,
        };
        let pages = render_pages(&self.front_matter, &ctx, &self.paths.output_dir);
        let index = self.write_index(pages.last_written.as_deref());
        let feed = self.write_feed()?;
        let archive = self.write_archive();
        let patch = self.patch_navigation();

        Ok(BuildReport {
            pages,
            index,
            feed,
            archive,
            patch,
            numbering_issues,
        })
    }

    fn write_index(&self, last_written: Option<&Path>) -> StepStatus {
        let Some(last) = last_written else {
            warn!("No page was generated, skipping {}", self.config.output.index);
            return StepStatus::Skipped("no page was generated".to_string());
        };
        let index = self.paths.output(&self.config.output.index);
        match fs::copy(last, &index) {
            Ok(_) => {
                info!("Created {} from {}", index.display(), last.display());
                StepStatus::Written(index)
            }
            Err(e) => {
                error!("Error creating {}: {e}", index.display());
                StepStatus::Failed(e.to_string())
            }
        }
    }

    fn write_feed(&self) -> Result<StepStatus, BuildError> {
        let zone = self.config.feed.timezone()?;
        let path = self.paths.output(&self.config.output.feed);
        let xml = match build_feed(
            &self.front_matter.pages(),
            &self.info,
            zone,
            &self.config.feed.language,
        ) {
            Ok(xml) => xml,
            Err(e) => {
                error!("Error generating {}: {e}", path.display());
                return Ok(StepStatus::Failed(e.to_string()));
            }
        };
        Ok(write_step(path, xml))
    }

    fn write_archive(&self) -> StepStatus {
        let path = self.paths.output(&self.config.output.archive);
        let html = build_archive(
            &self.front_matter.pages(),
            &self.info,
            &self.config.output.index,
        );
        write_step(path, html.into_string())
    }

    fn patch_navigation(&self) -> Option<PatchReport> {
        let Some(links) = &self.header_links else {
            warn!("No header links available, leaving navigation placeholders as they are");
            return None;
        };
        let bar = header_bar(links).into_string();
        match patch_all(&self.paths.output_dir, &bar) {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Error patching navigation: {e}");
                Some(PatchReport {
                    failed: vec![(self.paths.output_dir.clone(), e.to_string())],
                    ..PatchReport::default()
                })
            }
        }
    }

    /// Validate everything a build would read without writing anything.
    pub fn check(&self) -> CheckReport {
        let mut problems: Vec<String> = self
            .front_matter
            .numbering_issues()
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut valid_pages = 0;
        for decoded in self.front_matter.entries() {
            match decoded {
                Ok(page) => {
                    valid_pages += 1;
                    if let Ok(zone) = self.config.feed.timezone()
                        && let Err(e) = pub_date(&page.entry.date, zone)
                    {
                        problems.push(format!("page {}: {e}", page.key));
                    }
                }
                Err(e) => problems.push(e.to_string()),
            }
        }

        if self.header_links.is_none() {
            problems.push(format!(
                "header links unavailable ({}), navigation will not be patched",
                self.config.input.header
            ));
        }
        if !self.paths.assets_dir.is_dir() {
            problems.push(format!(
                "assets directory {} not found, pages will have no media",
                self.paths.assets_dir.display()
            ));
        }

        CheckReport {
            total_pages: self.front_matter.len(),
            valid_pages,
            problems,
        }
    }
}

/// Findings of [`Site::check`].
#[derive(Debug)]
pub struct CheckReport {
    pub total_pages: usize,
    pub valid_pages: usize,
    pub problems: Vec<String>,
}

fn write_step(path: PathBuf, contents: String) -> StepStatus {
    match fs::write(&path, contents) {
        Ok(()) => {
            info!("Generated {}", path.display());
            StepStatus::Written(path)
        }
        Err(e) => {
            error!("Error generating {}: {e}", path.display());
            StepStatus::Failed(e.to_string())
        }
    }
}

/// Load the site under `root` and build it.
pub fn build(root: &Path) -> Result<BuildReport, BuildError> {
    Site::load(root)?.build()
}

/// Load the site under `root` and check it.
pub fn check(root: &Path) -> Result<CheckReport, BuildError> {
    Ok(Site::load(root)?.check())
}


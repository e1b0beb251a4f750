//! The archive page: a single table listing every page in key order.
//!
//! Chapter and title cells link to the page; a small inline script makes the
//! whole row clickable by following the first link found in it.

use crate::nav::NAV_PLACEHOLDER_ID;
use crate::types::{Page, SiteInfo, page_sort_key};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const ROW_CLICK_JS: &str = r#"
document.querySelectorAll(".archiveTable tr").forEach(row => {
  row.addEventListener("click", () => {
    const link = row.querySelector("a");
    if (link) {
      window.location.href = link.getAttribute("href");
    }
  });
});
"#;

const FONT_CSS: &str = "https://fonts.googleapis.com/css?family=Mali&display=swap";

/// Render the archive document. Rows follow ascending page key.
pub fn build_archive(pages: &[Page], site: &SiteInfo, home_href: &str) -> Markup {
    let mut ordered: Vec<&Page> = pages.iter().collect();
    ordered.sort_by(|a, b| page_sort_key(&a.key).cmp(&page_sort_key(&b.key)));

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1";
                title { (site.title) " - By " (site.author) " - Archives" }
                link rel="stylesheet" href="css/style.css";
                link href=(FONT_CSS) rel="stylesheet";
            }
            body {
                header {
                    div id=(NAV_PLACEHOLDER_ID) {
                        a href=(home_href) { img src="img/logo.png" alt=""; }
                    }
                }
                main {
                    section {
                        article {
                            div.subPage.archivePage {
                                table.archiveTable {
                                    tr {
                                        th { "Chapter" }
                                        th { "Title" }
                                        th { "Description" }
                                    }
                                    @for page in &ordered {
                                        @let href = page.file_name();
                                        tr {
                                            td { a href=(href) { (page.entry.chapter) } }
                                            td { a href=(href) { (page.entry.title) } }
                                            td { (page.entry.desc) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                script { (PreEscaped(ROW_CLICK_JS)) }
            }
        }
    }
}

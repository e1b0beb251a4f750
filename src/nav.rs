//! Navigation fragments.
//!
//! Two independent pieces of markup:
//!
//! - the **comic navigation** (first / previous / next / last icons) shown
//!   above and below every page's media, and
//! - the **header bar**, the site-wide link list that the patcher swaps into
//!   every page's navigation placeholder.
//!
//! Previous and next are clamped into `001..=last` rather than disabled: on
//! the first page "previous" points at the page itself, and on the last page
//! so does "next".

use crate::types::{HeaderLink, format_page_key, page_file_name};
use maud::{Markup, html};

/// `id` of the navigation placeholder element in every generated page.
pub const NAV_PLACEHOLDER_ID: &str = "nav";

const FIRST_ICON: &str = "/img/comicnav/nav_first.png";
const PREVIOUS_ICON: &str = "/img/comicnav/nav_previous.png";
const NEXT_ICON: &str = "/img/comicnav/nav_next.png";
const LAST_ICON: &str = "/img/comicnav/nav_last.png";

/// Page keys targeted by the four comic navigation links.
#[derive(Debug, Clone, PartialEq)]
pub struct NavTargets {
    pub first: String,
    pub previous: String,
    pub next: String,
    pub last: String,
}

impl NavTargets {
    pub fn new(current: u32, last: u32) -> Self {
        let last = last.max(1);
        let clamp = |n: u32| n.clamp(1, last);
        Self {
            first: format_page_key(1),
            previous: format_page_key(clamp(current.saturating_sub(1))),
            next: format_page_key(clamp(current.saturating_add(1))),
            last: format_page_key(last),
        }
    }
}

/// The first / previous / next / last icon strip.
pub fn comic_nav(targets: &NavTargets) -> Markup {
    html! {
        div.comicNav {
            a href=(page_file_name(&targets.first)) { img src=(FIRST_ICON) alt="First"; }
            a href=(page_file_name(&targets.previous)) { img src=(PREVIOUS_ICON) alt="Previous"; }
            a href=(page_file_name(&targets.next)) { img src=(NEXT_ICON) alt="Next"; }
            a href=(page_file_name(&targets.last)) { img src=(LAST_ICON) alt="Last"; }
        }
    }
}

/// The site header bar: one link per entry, in order, separated by ` | `.
///
/// The bar is itself the navigation placeholder element, so patching an
/// already patched page just replaces the bar again. Link names and targets
/// are HTML-escaped; unlike custom HTML and notes, nothing here is inserted
/// verbatim.
pub fn header_bar(links: &[HeaderLink]) -> Markup {
    html! {
        div id=(NAV_PLACEHOLDER_ID) {
            @for (i, link) in links.iter().enumerate() {
                @if i > 0 { " | " }
                a href=(link.link) { (link.name) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(name: &str, href: &str) -> HeaderLink {
        HeaderLink {
            name: name.to_string(),
            link: href.to_string(),
        }
    }

    #[test]
    fn first_page_previous_points_at_itself() {
        let t = NavTargets::new(1, 5);
        assert_eq!(t.previous, "001");
        assert_eq!(t.next, "002");
    }

    #[test]
    fn last_page_next_points_at_itself() {
        let t = NavTargets::new(5, 5);
        assert_eq!(t.previous, "004");
        assert_eq!(t.next, "005");
        assert_eq!(t.last, "005");
    }

    #[test]
    fn single_page_comic_points_everything_at_001() {
        let t = NavTargets::new(1, 1);
        assert_eq!(
            t,
            NavTargets {
                first: "001".into(),
                previous: "001".into(),
                next: "001".into(),
                last: "001".into(),
            }
        );
    }

    #[test]
    fn targets_stay_within_bounds() {
        for last in 1..=30u32 {
            for current in 0..=last + 2 {
                let t = NavTargets::new(current, last);
                for key in [&t.first, &t.previous, &t.next, &t.last] {
                    let n: u32 = key.parse().unwrap();
                    assert!(
                        (1..=last).contains(&n),
                        "current={current} last={last} produced {key}"
                    );
                    assert!(key.len() >= 3);
                }
            }
        }
    }

    #[test]
    fn comic_nav_links_to_html_files() {
        let html = comic_nav(&NavTargets::new(2, 3)).into_string();
        assert!(html.contains(r#"class="comicNav""#));
        assert!(html.contains(r#"href="001.html""#));
        assert!(html.contains(r#"href="003.html""#));
        assert!(html.contains(r#"alt="Previous""#));
        assert_eq!(html.matches("<a ").count(), 4);
    }

    #[test]
    fn header_bar_one_anchor_per_link() {
        let links = vec![
            link("Home", "index.html"),
            link("Archive", "archive.html"),
            link("RSS", "rss.xml"),
        ];
        let html = header_bar(&links).into_string();
        assert_eq!(html.matches("<a ").count(), 3);
        assert_eq!(html.matches(" | ").count(), 2);
        assert_eq!(
            html,
            r#"<div id="nav"><a href="index.html">Home</a> | <a href="archive.html">Archive</a> | <a href="rss.xml">RSS</a></div>"#
        );
    }

    #[test]
    fn header_bar_has_no_trailing_separator() {
        let html = header_bar(&[link("Home", "/")]).into_string();
        assert!(!html.contains(" | "));
        assert!(html.ends_with("</a></div>"));
    }

    #[test]
    fn header_bar_escapes_names() {
        let html = header_bar(&[link("<b>Shop</b>", "/shop")]).into_string();
        assert!(html.contains("&lt;b&gt;Shop&lt;/b&gt;"));
    }
}

//! RSS 2.0 feed generation.
//!
//! One item per page, newest (highest key) first. Front-matter dates are
//! written as wall-clock times in the configured source zone; the offset in
//! the text is ignored, the wall clock is placed in the source zone and the
//! resulting instant is published in UTC using the same textual pattern:
//!
//! ```text
//! Mon, 01 Jan 2024 10:00:00 -0800   (America/Los_Angeles wall clock)
//! Mon, 01 Jan 2024 18:00:00 +0000   (pubDate)
//! ```
//!
//! A single unparseable date fails the whole feed.

use crate::types::{Page, SiteInfo, page_sort_key};
use chrono::{DateTime, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use rss::{ChannelBuilder, ItemBuilder};
use thiserror::Error;

/// Textual date pattern used both in front matter and in `pubDate`.
pub const FEED_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// [`FEED_DATE_FORMAT`] after the leading weekday.
const DATE_BODY_FORMAT: &str = "%d %b %Y %H:%M:%S %z";

#[derive(Error, Debug)]
pub enum DateError {
    #[error("cannot parse '{date}': {source}")]
    Parse {
        date: String,
        source: chrono::ParseError,
    },
    #[error("{wall} does not exist in {zone}")]
    Nonexistent { wall: NaiveDateTime, zone: Tz },
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("page {key}: {source}")]
    Date { key: String, source: DateError },
}

/// Wall-clock part of a front-matter date, ignoring its offset.
///
/// The weekday must be a weekday name but is not checked against the date,
/// so `Tue, 01 Jan 2024` reads as 1 January.
pub fn wall_clock(date: &str) -> Result<NaiveDateTime, DateError> {
    let trimmed = date.trim();
    let parsed = match trimmed.split_once(',') {
        Some((weekday, body)) if weekday.trim().parse::<Weekday>().is_ok() => {
            DateTime::parse_from_str(body.trim_start(), DATE_BODY_FORMAT)
        }
        _ => DateTime::parse_from_str(trimmed, FEED_DATE_FORMAT),
    };
    parsed
        .map(|dt| dt.naive_local())
        .map_err(|source| DateError::Parse {
            date: date.to_string(),
            source,
        })
}

/// Interpret a front-matter date in `zone` and return the UTC instant.
///
/// Wall-clock times repeated by a DST fall-back resolve to the earlier
/// instant. Times skipped by a spring-forward are read with the offset in
/// force before the transition, which lands them after the gap.
pub fn to_utc(date: &str, zone: Tz) -> Result<DateTime<Utc>, DateError> {
    let wall = wall_clock(date)?;
    if let Some(local) = zone.from_local_datetime(&wall).earliest() {
        return Ok(local.with_timezone(&Utc));
    }
    let before = zone
        .from_local_datetime(&(wall - TimeDelta::days(1)))
        .earliest()
        .ok_or(DateError::Nonexistent { wall, zone })?;
    let offset = TimeDelta::seconds(i64::from(before.offset().fix().local_minus_utc()));
    Ok(Utc.from_utc_datetime(&(wall - offset)))
}

/// Front-matter date rendered as a UTC `pubDate`.
pub fn pub_date(date: &str, zone: Tz) -> Result<String, DateError> {
    Ok(to_utc(date, zone)?.format(FEED_DATE_FORMAT).to_string())
}

fn item_link(site: &SiteInfo, page: &Page) -> String {
    let domain = site.domain.trim_end_matches('/');
    if domain.is_empty() {
        page.file_name()
    } else {
        format!("{domain}/{}", page.file_name())
    }
}

/// Build the RSS document for `pages`.
pub fn build_feed(
    pages: &[Page],
    site: &SiteInfo,
    zone: Tz,
    language: &str,
) -> Result<String, FeedError> {
    let mut newest_first: Vec<&Page> = pages.iter().collect();
    newest_first.sort_by(|a, b| page_sort_key(&b.key).cmp(&page_sort_key(&a.key)));

    let items = newest_first
        .into_iter()
        .map(|page| {
            let date = pub_date(&page.entry.date, zone).map_err(|source| FeedError::Date {
                key: page.key.clone(),
                source,
            })?;
            Ok(ItemBuilder::default()
                .title(page.entry.title.clone())
                .link(item_link(site, page))
                .description(page.entry.desc.clone())
                .pub_date(date)
                .build())
        })
        .collect::<Result<Vec<_>, FeedError>>()?;

    let channel = ChannelBuilder::default()
        .title(format!("{} - By {}", site.title, site.author))
        .link(site.domain.clone())
        .description(format!("{}, a webcomic by {}.", site.title, site.author))
        .language(language.to_string())
        .items(items)
        .build();

    Ok(channel.to_string())
}

//! Episode menu entries
//!
//! Turns a located chapter (and its segments or sibling audio chapters)
//! into flat entries the host renders as items or folders.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

use crate::composition::{EntryInfo, MediaComposition};
use crate::error::ResolveError;
use crate::locator::locate;
use crate::urn::urn_local_id;

static RE_SIZE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+/\d+x\d+$").expect("invalid size suffix regex"));
static RE_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+x\d+").expect("invalid size regex"));

/// How an episode is expanded into entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpisodeOptions {
    /// List the chapter followed by its segments.
    pub include_segments: bool,
    /// Without `include_segments`, show a chapter with segments as a folder.
    pub segment_option: bool,
    pub audio: bool,
    /// Attach WebVTT subtitle URLs, for audio entries too.
    pub subtitles: bool,
}

/// One renderable menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeEntry {
    /// URN if known, otherwise the id; used to play or open the entry.
    pub name: String,
    pub title: String,
    pub plot: Option<String>,
    pub lead: Option<String>,
    pub image: Option<String>,
    pub banner: Option<String>,
    pub duration_secs: Option<i64>,
    /// `YYYY-MM-DD`
    pub aired: Option<String>,
    pub subtitles: Vec<String>,
    pub is_folder: bool,
}

/// Host-side menu callbacks.
pub trait ItemSink {
    fn render_folder(&self, entry: &EpisodeEntry);
    fn render_item(&self, entry: &EpisodeEntry);
}

/// Entries for `requested_id`.
///
/// The composition must name its chapter through a valid `chapterUrn`.
pub fn episode_entries(
    composition: &MediaComposition,
    requested_id: &str,
    options: &EpisodeOptions,
) -> Result<Vec<EpisodeEntry>, ResolveError> {
    urn_local_id(composition.chapter_urn.as_deref())
        .ok_or_else(|| ResolveError::ChapterNotFound {
            id: requested_id.to_string(),
        })?;

    let located = locate(composition, requested_id)?;
    let banner = composition.banner_image_url().map(scaled_banner);
    let banner = banner.as_deref();
    let entry = |info: &EntryInfo, is_folder: bool| build_entry(info, banner, is_folder, options);

    if let Some(segment) = located.segment {
        return Ok(vec![entry(&segment.info, false)]);
    }

    let chapter = located.chapter;
    if !options.include_segments {
        let is_folder = options.segment_option && !chapter.segment_list.is_empty();
        return Ok(vec![entry(&chapter.info, is_folder)]);
    }

    let mut entries = vec![entry(&chapter.info, false)];
    if options.audio && located.chapter_index == 0 {
        entries.extend(
            composition
                .chapter_list
                .iter()
                .skip(1)
                .map(|sibling| entry(&sibling.info, false)),
        );
    }
    entries.extend(
        chapter
            .segment_list
            .iter()
            .map(|segment| entry(&segment.info, false)),
    );
    Ok(entries)
}

fn build_entry(
    info: &EntryInfo,
    banner: Option<&str>,
    is_folder: bool,
    options: &EpisodeOptions,
) -> EpisodeEntry {
    let subtitles = if options.subtitles {
        info.subtitle_list
            .iter()
            .filter(|sub| sub.format.as_deref() == Some("VTT"))
            .filter_map(|sub| sub.url.clone())
            .collect()
    } else {
        Vec::new()
    };

    EpisodeEntry {
        name: info.urn.clone().unwrap_or_else(|| info.id.clone()),
        title: info.title.clone().unwrap_or_default(),
        plot: info.description.clone().or_else(|| info.lead.clone()),
        lead: info.lead.clone(),
        image: info.image_url.as_deref().map(strip_image_size),
        banner: banner.map(str::to_string),
        duration_secs: info.duration.map(|ms| ms / 1000).filter(|secs| *secs > 0),
        aired: info.date.as_deref().and_then(aired_date),
        subtitles,
        is_folder,
    }
}

/// Banners addressed by size get a fixed-width rendition.
#[must_use]
pub fn scaled_banner(banner: &str) -> String {
    if RE_SIZE_SUFFIX.is_match(banner) {
        format!("{banner}/scale/width/1000")
    } else {
        banner.to_string()
    }
}

/// Remove `/<w>x<h>` parts some business units append to image URLs.
#[must_use]
pub fn strip_image_size(image: &str) -> String {
    RE_SIZE.replace_all(image, "").into_owned()
}

fn aired_date(date: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

//! Media composition documents
//!
//! Both integration layer request shapes return the same document. Field
//! presence is inconsistent across responses, so every list defaults to
//! empty (also when sent as `null`) and numeric marks tolerate floats and
//! numeric strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Root document: show, chapters, segments, resources.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaComposition {
    pub chapter_urn: Option<String>,
    pub segment_urn: Option<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub chapter_list: Vec<Chapter>,
    pub show: Option<Show>,
    pub episode: Option<Episode>,
}

impl MediaComposition {
    #[must_use]
    pub fn episode_title(&self) -> Option<&str> {
        self.episode
            .as_ref()
            .and_then(|episode| episode.title.as_deref())
    }

    #[must_use]
    pub fn banner_image_url(&self) -> Option<&str> {
        self.show
            .as_ref()
            .and_then(|show| show.banner_image_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Show {
    pub title: Option<String>,
    pub banner_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Episode {
    pub title: Option<String>,
}

/// Display metadata shared by chapters and segments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryInfo {
    pub id: String,
    pub urn: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub lead: Option<String>,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub duration: Option<i64>,
    pub date: Option<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub subtitle_list: Vec<Subtitle>,
}

/// One playable unit of a composition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(flatten)]
    pub info: EntryInfo,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub resource_list: Vec<Resource>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub segment_list: Vec<Segment>,
}

impl Chapter {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    #[must_use]
    pub fn is_audio(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("AUDIO"))
    }
}

/// A sub-range of its parent chapter, in milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(flatten)]
    pub info: EntryInfo,
    #[serde(default, deserialize_with = "lenient_int")]
    pub mark_in: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub mark_out: Option<i64>,
}

impl Segment {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subtitle {
    pub format: Option<String>,
    pub url: Option<String>,
}

/// One deliverable stream variant of a chapter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    pub protocol: String,
    pub quality: Option<String>,
    pub url: String,
    /// `Some` whenever the key is present, even if the list is empty.
    pub drm_list: Option<Vec<Drm>>,
}

impl Resource {
    #[must_use]
    pub fn protocol(&self) -> Option<Protocol> {
        Protocol::parse(&self.protocol)
    }

    #[must_use]
    pub fn quality(&self) -> Option<Quality> {
        self.quality.as_deref().and_then(Quality::parse)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Drm {
    #[serde(rename = "type")]
    pub drm_type: String,
    pub license_url: Option<String>,
}

impl Drm {
    #[must_use]
    pub fn is_widevine(&self) -> bool {
        self.drm_type == "WIDEVINE"
    }
}

/// Delivery protocol of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Hls,
    Dash,
    Http,
    Https,
    HttpMp3Stream,
}

impl Protocol {
    /// Case-insensitive.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "HLS" => Some(Self::Hls),
            "DASH" => Some(Self::Dash),
            "HTTP" => Some(Self::Http),
            "HTTPS" => Some(Self::Https),
            "HTTP-MP3-STREAM" => Some(Self::HttpMp3Stream),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_audio(self) -> bool {
        matches!(self, Self::Http | Self::Https | Self::HttpMp3Stream)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hls => "HLS",
            Self::Dash => "DASH",
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
            Self::HttpMp3Stream => "HTTP-MP3-STREAM",
        }
    }
}

/// Quality label of a resource. Matched exactly as the API sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Sd,
    Hd,
    Hq,
}

impl Quality {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SD" => Some(Self::Sd),
            "HD" => Some(Self::Hd),
            "HQ" => Some(Self::Hq),
            _ => None,
        }
    }
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

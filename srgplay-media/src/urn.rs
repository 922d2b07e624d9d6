//! URN and raw id parsing
//!
//! Identifiers arrive either as raw ids (`abc123`, a UUID, a number) that
//! belong to the configured business unit, or as fully qualified URNs of the
//! shape `urn:<businessUnit>:<mediaType>:<id>`. The local id may itself
//! contain colons (`urn:rts:video:scheduled:42`).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static RE_URN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^urn:(?P<bu>[A-Za-z0-9]+):(?P<type>[A-Za-z]+):(?P<id>.+)$")
        .expect("invalid URN regex")
});

pub const MEDIA_TYPE_VIDEO: &str = "video";
pub const MEDIA_TYPE_AUDIO: &str = "audio";

/// Media type segment used when qualifying a raw id.
#[must_use]
pub const fn media_type_for(audio: bool) -> &'static str {
    if audio {
        MEDIA_TYPE_AUDIO
    } else {
        MEDIA_TYPE_VIDEO
    }
}

/// Fully qualified identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn {
    pub business_unit: String,
    pub media_type: String,
    pub id: String,
}

impl Urn {
    pub fn new(
        business_unit: impl Into<String>,
        media_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            business_unit: business_unit.into(),
            media_type: media_type.into(),
            id: id.into(),
        }
    }

    /// Parse a `urn:<bu>:<type>:<id>` string; `None` for anything else.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let caps = RE_URN.captures(value.trim())?;
        Some(Self::new(&caps["bu"], &caps["type"], &caps["id"]))
    }

    #[must_use]
    pub fn is_audio(&self) -> bool {
        self.media_type.eq_ignore_ascii_case(MEDIA_TYPE_AUDIO)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "urn:{}:{}:{}", self.business_unit, self.media_type, self.id)
    }
}

/// A request identifier: the local id plus whatever context a URN carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    business_unit: Option<String>,
    media_type: Option<String>,
    local_id: String,
}

impl Identifier {
    /// Never fails: a malformed URN is kept whole as the local id.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match Urn::parse(value) {
            Some(urn) => Self {
                business_unit: Some(urn.business_unit),
                media_type: Some(urn.media_type),
                local_id: urn.id,
            },
            None => Self {
                business_unit: None,
                media_type: None,
                local_id: value.to_string(),
            },
        }
    }

    #[must_use]
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    #[must_use]
    pub fn business_unit(&self) -> Option<&str> {
        self.business_unit.as_deref()
    }

    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    #[must_use]
    pub const fn is_urn(&self) -> bool {
        self.business_unit.is_some()
    }

    /// Complete the identifier with context for the parts it lacks.
    #[must_use]
    pub fn qualify(&self, business_unit: &str, media_type: &str) -> Urn {
        Urn::new(
            self.business_unit.as_deref().unwrap_or(business_unit),
            self.media_type.as_deref().unwrap_or(media_type),
            self.local_id.as_str(),
        )
    }
}

/// Local id of a URN-valued document field, if the field is a valid URN.
#[must_use]
pub fn urn_local_id(value: Option<&str>) -> Option<String> {
    value.and_then(Urn::parse).map(|urn| urn.id)
}

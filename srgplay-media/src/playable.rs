//! Playable item descriptor handed to the host player

use std::collections::BTreeMap;

use serde::Serialize;

const INPUTSTREAM: &str = "inputstream.adaptive";

/// Manifest kind of the selected stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestType {
    Hls,
    Mpd,
    /// Plain HTTP audio, played without an adaptive manifest.
    Progressive,
}

impl ManifestType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hls => "hls",
            Self::Mpd => "mpd",
            Self::Progressive => "",
        }
    }

    #[must_use]
    pub const fn is_adaptive(self) -> bool {
        !matches!(self, Self::Progressive)
    }
}

/// DRM license parameters for an encrypted manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    pub license_type: String,
    pub license_url: String,
}

impl License {
    pub const WIDEVINE: &'static str = "com.widevine.alpha";

    pub fn widevine(license_url: impl Into<String>) -> Self {
        Self {
            license_type: Self::WIDEVINE.to_string(),
            license_url: license_url.into(),
        }
    }

    /// `<url>|<headers>|<post data>|<response>` as inputstream.adaptive expects it.
    #[must_use]
    pub fn license_key(&self) -> String {
        format!(
            "{}|Content-Type=application/octet-stream|R{{SSM}}|",
            self.license_url
        )
    }
}

/// Final descriptor of one resolved stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayableItem {
    pub title: String,
    pub url: String,
    pub manifest_type: ManifestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<String>,
}

impl PlayableItem {
    /// Player properties for the adaptive input stream; empty for progressive audio.
    #[must_use]
    pub fn properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        if !self.manifest_type.is_adaptive() {
            return props;
        }
        props.insert("inputstream".to_string(), INPUTSTREAM.to_string());
        props.insert(
            format!("{INPUTSTREAM}.manifest_type"),
            self.manifest_type.as_str().to_string(),
        );
        if let Some(license) = &self.license {
            props.insert(
                format!("{INPUTSTREAM}.license_type"),
                license.license_type.clone(),
            );
            props.insert(format!("{INPUTSTREAM}.license_key"), license.license_key());
            props.insert(
                format!("{INPUTSTREAM}.license_flags"),
                "persistent_storage".to_string(),
            );
            props.insert(
                format!("{INPUTSTREAM}.manifest_update_parameter"),
                "full".to_string(),
            );
        }
        props
    }
}

/// Assemble the descriptor. Progressive items never carry license or subtitles.
#[must_use]
pub fn emit(
    title: impl Into<String>,
    url: impl Into<String>,
    manifest_type: ManifestType,
    license: Option<License>,
    subtitles: Vec<String>,
) -> PlayableItem {
    let adaptive = manifest_type.is_adaptive();
    PlayableItem {
        title: title.into(),
        url: url.into(),
        manifest_type,
        license: license.filter(|_| adaptive),
        subtitles: if adaptive { subtitles } else { Vec::new() },
    }
}

/// Host-side playback callbacks.
pub trait PlaybackHost {
    /// Hand a resolved item to the player.
    fn resolve(&self, item: PlayableItem);

    /// Best-effort user notification.
    fn notify_user(&self, message: &str);
}

//! Delivery resource selection
//!
//! Resources are scanned in document order. A resource is considered only
//! if its protocol is whitelisted for the content kind, and it replaces the
//! current pick whenever its quality weight is at least the current weight.
//! Equal weights therefore let later entries win.

use crate::composition::{Protocol, Quality, Resource};
use crate::playable::{License, ManifestType};

/// Per-request selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionPreference {
    pub prefer_hd: bool,
    /// Restrict to progressive audio protocols.
    pub audio: bool,
}

/// The adopted resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub url: String,
    pub manifest_type: ManifestType,
    pub weight: i32,
    pub license: Option<License>,
}

/// Whitelisted protocols and their manifest tag.
const fn manifest_type(protocol: Protocol, audio: bool) -> Option<ManifestType> {
    match (protocol, audio) {
        (Protocol::Http | Protocol::Https | Protocol::HttpMp3Stream, true) => {
            Some(ManifestType::Progressive)
        }
        (Protocol::Hls, false) => Some(ManifestType::Hls),
        (Protocol::Dash, false) => Some(ManifestType::Mpd),
        _ => None,
    }
}

/// Quality weight; unknown qualities weigh 0.
#[must_use]
pub const fn weight(quality: Option<Quality>, prefer_hd: bool) -> i32 {
    match (quality, prefer_hd) {
        (Some(Quality::Sd), true) => 1,
        (Some(Quality::Hd | Quality::Hq), true) => 2,
        (Some(Quality::Hd | Quality::Hq), false) => 1,
        (Some(Quality::Sd), false) => 2,
        (None, _) => 0,
    }
}

/// Pick one resource, or `None` when nothing is eligible.
///
/// A resource with a `drmList` is adopted only through a Widevine entry;
/// other DRM systems make it ineligible.
#[must_use]
pub fn select(resources: &[Resource], preference: &SelectionPreference) -> Option<Selection> {
    let mut current_weight = -1;
    let mut selection: Option<Selection> = None;

    for resource in resources {
        let Some(manifest_type) = resource
            .protocol()
            .and_then(|p| manifest_type(p, preference.audio))
        else {
            continue;
        };

        let res_weight = weight(resource.quality(), preference.prefer_hd);
        if res_weight < current_weight {
            continue;
        }

        match &resource.drm_list {
            Some(drm_list) => {
                for drm in drm_list.iter().filter(|drm| drm.is_widevine()) {
                    let Some(license_url) = drm.license_url.as_deref() else {
                        continue;
                    };
                    current_weight = res_weight;
                    selection = Some(Selection {
                        url: resource.url.clone(),
                        manifest_type,
                        weight: res_weight,
                        license: Some(License::widevine(license_url)),
                    });
                }
            }
            None => {
                current_weight = res_weight;
                selection = Some(Selection {
                    url: resource.url.clone(),
                    manifest_type,
                    weight: res_weight,
                    license: None,
                });
            }
        }
    }

    selection.filter(|s| !s.url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Drm;

    fn res(protocol: &str, quality: &str, url: &str) -> Resource {
        Resource {
            protocol: protocol.to_string(),
            quality: Some(quality.to_string()),
            url: url.to_string(),
            drm_list: None,
        }
    }

    fn drm_res(protocol: &str, quality: &str, url: &str, drm_type: &str) -> Resource {
        Resource {
            drm_list: Some(vec![Drm {
                drm_type: drm_type.to_string(),
                license_url: Some(format!("https://lic/{drm_type}")),
            }]),
            ..res(protocol, quality, url)
        }
    }

    const HD_VIDEO: SelectionPreference = SelectionPreference { prefer_hd: true, audio: false };
    const SD_VIDEO: SelectionPreference = SelectionPreference { prefer_hd: false, audio: false };

    #[test]
    fn test_weights() {
        assert_eq!(weight(Some(Quality::Sd), true), 1);
        assert_eq!(weight(Some(Quality::Hq), true), 2);
        assert_eq!(weight(Some(Quality::Hd), false), 1);
        assert_eq!(weight(Some(Quality::Sd), false), 2);
        assert_eq!(weight(None, true), 0);
    }

    #[test]
    fn test_prefer_hd_picks_highest_weight() {
        let resources = [
            res("HLS", "SD", "https://cdn/sd.m3u8"),
            res("HLS", "HD", "https://cdn/hd.m3u8"),
            res("DASH", "SD", "https://cdn/sd.mpd"),
        ];
        let selection = select(&resources, &HD_VIDEO).unwrap();
        assert_eq!(selection.url, "https://cdn/hd.m3u8");
        assert_eq!(selection.manifest_type, ManifestType::Hls);
        assert_eq!(selection.weight, 2);
    }

    #[test]
    fn test_drm_resource_wins_on_weight_alone() {
        let resources = [
            drm_res("HLS", "SD", "https://cdn/drm.m3u8", "WIDEVINE"),
            res("HLS", "HD", "https://cdn/hd.m3u8"),
        ];
        let selection = select(&resources, &SD_VIDEO).unwrap();
        assert_eq!(selection.url, "https://cdn/drm.m3u8");
        assert_eq!(selection.license, Some(License::widevine("https://lic/WIDEVINE")));
    }

    #[test]
    fn test_later_equal_weight_wins() {
        let resources = [
            res("HLS", "HD", "https://cdn/first.m3u8"),
            res("DASH", "HQ", "https://cdn/second.mpd"),
        ];
        let selection = select(&resources, &HD_VIDEO).unwrap();
        assert_eq!(selection.url, "https://cdn/second.mpd");
        assert_eq!(selection.manifest_type, ManifestType::Mpd);
    }

    #[test]
    fn test_non_drm_resource_clears_license() {
        let resources = [
            drm_res("DASH", "HD", "https://cdn/drm.mpd", "WIDEVINE"),
            res("HLS", "HD", "https://cdn/clear.m3u8"),
        ];
        let selection = select(&resources, &HD_VIDEO).unwrap();
        assert_eq!(selection.url, "https://cdn/clear.m3u8");
        assert!(selection.license.is_none());
    }

    #[test]
    fn test_other_drm_systems_are_ignored() {
        let resources = [
            res("HLS", "SD", "https://cdn/sd.m3u8"),
            drm_res("HLS", "HD", "https://cdn/fairplay.m3u8", "FAIRPLAY"),
        ];
        let selection = select(&resources, &HD_VIDEO).unwrap();
        assert_eq!(selection.url, "https://cdn/sd.m3u8");

        assert!(select(&resources[1..], &HD_VIDEO).is_none());
    }

    #[test]
    fn test_empty_drm_list_is_not_adopted() {
        let resources = [Resource {
            drm_list: Some(Vec::new()),
            ..res("HLS", "HD", "https://cdn/a.m3u8")
        }];
        assert!(select(&resources, &HD_VIDEO).is_none());
    }

    #[test]
    fn test_audio_whitelist() {
        let resources = [
            res("HLS", "HD", "https://cdn/a.m3u8"),
            res("HTTP-MP3-STREAM", "HQ", "https://cdn/a.mp3"),
            res("https", "SD", "https://cdn/b.mp3"),
        ];
        let audio = SelectionPreference { prefer_hd: true, audio: true };
        let selection = select(&resources, &audio).unwrap();
        assert_eq!(selection.url, "https://cdn/a.mp3");
        assert_eq!(selection.manifest_type, ManifestType::Progressive);

        let video_only = [res("HTTP", "HD", "https://cdn/a.mp3")];
        assert!(select(&video_only, &HD_VIDEO).is_none());
    }

    #[test]
    fn test_unknown_quality_still_selectable() {
        let resources = [res("DASH", "UHD", "https://cdn/a.mpd")];
        let selection = select(&resources, &HD_VIDEO).unwrap();
        assert_eq!(selection.weight, 0);
    }

    #[test]
    fn test_nothing_eligible() {
        assert!(select(&[], &HD_VIDEO).is_none());
        assert!(select(&[res("RTMP", "HD", "rtmp://x")], &HD_VIDEO).is_none());
    }
}

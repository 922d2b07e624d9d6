//! WebVTT subtitle resolution
//!
//! Subtitle locations travel inside the stream URL as `caption=<file>[:<lang>]`
//! and `webvttbaseurl=<host/path>`. When the caption is an HLS playlist the
//! host player cannot use it directly, so its chunks are concatenated into a
//! local `.vtt` file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::http::HttpFetch;

/// Subtitle location extracted from a stream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionSource {
    pub url: String,
    pub language: Option<String>,
}

impl CaptionSource {
    #[must_use]
    pub fn is_playlist(&self) -> bool {
        self.url.ends_with(".m3u8")
    }
}

/// Read `caption` and `webvttbaseurl` from the stream URL's query.
#[must_use]
pub fn caption_source(stream_url: &str) -> Option<CaptionSource> {
    let parsed = Url::parse(stream_url).ok()?;
    let mut caption = None;
    let mut base = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "caption" => caption = Some(value.into_owned()),
            "webvttbaseurl" => base = Some(value.into_owned()),
            _ => {}
        }
    }
    let (caption, base) = (caption.filter(|c| !c.is_empty())?, base.filter(|b| !b.is_empty())?);

    let (file, language) = match caption.split_once(':') {
        Some((file, rest)) => (file, rest.split(':').next().map(str::to_string)),
        None => (caption.as_str(), None),
    };
    Some(CaptionSource {
        url: format!("http://{base}/{file}"),
        language,
    })
}

/// Drop everything before the first digit of a chunk (the `WEBVTT` header
/// block), so chunks can follow each other in one file.
#[must_use]
pub fn strip_chunk_header(chunk: &str) -> &str {
    chunk
        .find(char::is_numeric)
        .map_or("", |index| &chunk[index..])
}

/// `<name>[.<lang>].vtt` with path separators replaced, so the file
/// always lands directly in the subtitle directory.
#[must_use]
pub fn subtitle_file_name(name: &str, language: Option<&str>) -> String {
    let language = language.map(|lang| format!(".{lang}")).unwrap_or_default();
    format!("{name}{language}.vtt").replace(['/', '\\'], "_")
}

/// Remove assembled `urn*.vtt` files left by earlier sessions.
pub fn cleanup_subtitle_dir(dir: &Path) -> std::io::Result<usize> {
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("urn") && name.ends_with(".vtt") && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

pub struct SubtitleResolver {
    http: Arc<dyn HttpFetch>,
    dir: PathBuf,
}

impl SubtitleResolver {
    pub fn new(http: Arc<dyn HttpFetch>, dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            dir: dir.into(),
        }
    }

    /// Subtitle URLs or local file paths for the stream; empty when the
    /// stream carries no caption.
    pub async fn resolve(&self, stream_url: &str, name: &str) -> Vec<String> {
        let Some(source) = caption_source(stream_url) else {
            return Vec::new();
        };
        debug!(url = %source.url, "Subtitle source");
        if !source.is_playlist() {
            return vec![source.url];
        }

        let path = self
            .dir
            .join(subtitle_file_name(name, source.language.as_deref()));

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            if let Err(e) = self.assemble(&source.url, &path).await {
                warn!(url = %source.url, error = %e, "Cannot assemble subtitles");
                return Vec::new();
            }
        }
        vec![path.to_string_lossy().into_owned()]
    }

    async fn assemble(&self, playlist_url: &str, path: &Path) -> anyhow::Result<()> {
        let playlist = self.http.open_url(playlist_url, false).await?;
        let base = playlist_url
            .rsplit_once('/')
            .map_or(playlist_url, |(base, _)| base);

        let mut vtt = String::new();
        let mut first = true;
        for line in playlist.lines().filter(|l| !l.is_empty() && !l.starts_with('#')) {
            let chunk_url = format!("{base}/{line}");
            let chunk = match self.http.open_url(&chunk_url, false).await {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(url = %chunk_url, error = %e, "Skipping subtitle chunk");
                    continue;
                }
            };
            if first {
                vtt.push_str(&chunk);
                first = false;
            } else {
                vtt.push('\n');
                vtt.push_str(strip_chunk_header(&chunk));
            }
        }

        tokio::fs::write(path, vtt).await?;
        Ok(())
    }
}

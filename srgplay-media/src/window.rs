//! Segment time windows on stream URLs
//!
//! Segment playback reuses the parent chapter's stream restricted to the
//! segment's marks, expressed as `start`/`end` query parameters in seconds.

use tracing::warn;
use url::Url;

/// Playback window in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Window from millisecond marks, `None` unless both marks are usable.
    ///
    /// With `zero_is_absent`, a mark that is zero after conversion to
    /// seconds counts as missing, so a segment starting at 0 plays
    /// unrestricted.
    #[must_use]
    pub fn from_marks(mark_in_ms: Option<i64>, mark_out_ms: Option<i64>, zero_is_absent: bool) -> Option<Self> {
        let to_secs = |ms: Option<i64>| {
            ms.filter(|ms| *ms >= 0)
                .map(|ms| ms / 1000)
                .filter(|secs| !zero_is_absent || *secs != 0)
        };
        Some(Self {
            start: to_secs(mark_in_ms)?,
            end: to_secs(mark_out_ms)?,
        })
    }
}

/// Replace any `start`/`end` query parameters of `url` with `window`.
///
/// Other parameters are kept byte for byte and in order, so signed
/// tokens survive. Scheme, host, path and fragment are untouched. An
/// unparseable URL is returned as is.
#[must_use]
pub fn apply_window(url: &str, window: TimeWindow) -> String {
    let mut parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(url, error = %e, "Cannot apply time window to stream URL");
            return url.to_string();
        }
    };

    let mut query: Vec<String> = parsed
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|piece| !piece.is_empty())
        .filter(|piece| {
            let key = piece.split_once('=').map_or(*piece, |(key, _)| key);
            key != "start" && key != "end"
        })
        .map(str::to_string)
        .collect();
    query.push(format!("start={}", window.start));
    query.push(format!("end={}", window.end));

    parsed.set_query(Some(&query.join("&")));
    parsed.into()
}

/// [`apply_window`] from raw millisecond marks; `url` unchanged when the
/// marks do not form a window.
#[must_use]
pub fn apply_marks(url: &str, mark_in_ms: Option<i64>, mark_out_ms: Option<i64>, zero_is_absent: bool) -> String {
    match TimeWindow::from_marks(mark_in_ms, mark_out_ms, zero_is_absent) {
        Some(window) => apply_window(url, window),
        None => url.to_string(),
    }
}

// SRG SSR media stream resolution
//
// Resolves an episode, segment or livestream identifier into a playable
// stream descriptor using the SRG SSR integration layer.
//
// Pipeline:
// - urn / source: qualify the identifier, fetch the media composition
// - locator / selector: pick the chapter or segment and one delivery resource
// - auth / window: sign the stream URL, restrict segments to their marks
// - playable: descriptor handed to the host player

// Shared error types
pub mod error;

// Ambient
pub mod config;
pub mod http;
pub mod logging;

// Pipeline steps
pub mod auth;
pub mod composition;
pub mod locator;
pub mod playable;
pub mod selector;
pub mod source;
pub mod urn;
pub mod window;

// Host-facing features
pub mod episode;
pub mod resolver;
pub mod subtitles;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use error::{FetchError, ResolveError};
pub use http::{HttpClient, HttpFetch};
pub use playable::{PlayableItem, PlaybackHost};
pub use resolver::StreamResolver;
pub use selector::SelectionPreference;

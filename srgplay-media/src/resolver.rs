//! Stream resolution pipeline
//!
//! identifier → composition → chapter/segment → resource → token → window
//! → playable item. Every step is awaited in order; a failure before the
//! token step ends the request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::TokenAuthorizer;
use crate::config::{Config, PlaybackConfig};
use crate::episode::{episode_entries, EpisodeOptions, ItemSink};
use crate::error::{FetchError, ResolveError};
use crate::http::{HttpClient, HttpFetch};
use crate::locator::locate;
use crate::playable::{emit, ManifestType, PlayableItem, PlaybackHost};
use crate::selector::{select, SelectionPreference};
use crate::source::{source_from_config, ContentSource};
use crate::subtitles::SubtitleResolver;
use crate::urn::{media_type_for, Identifier, Urn};
use crate::window::apply_marks;

const LIVE_TITLE: &str = "Live";

pub struct StreamResolver {
    source: Box<dyn ContentSource>,
    authorizer: TokenAuthorizer,
    subtitles: SubtitleResolver,
    business_unit: String,
    playback: PlaybackConfig,
}

impl StreamResolver {
    /// Resolver using `http` for every request.
    pub fn new(config: &Config, http: Arc<dyn HttpFetch>) -> Self {
        let source = source_from_config(&config.api, http.clone());
        Self::with_source(config, source, http)
    }

    /// Resolver backed by a reqwest client built from `config.http`.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let http: Arc<dyn HttpFetch> = Arc::new(HttpClient::new(&config.http)?);
        Ok(Self::new(config, http))
    }

    pub fn with_source(
        config: &Config,
        source: Box<dyn ContentSource>,
        http: Arc<dyn HttpFetch>,
    ) -> Self {
        Self {
            source,
            authorizer: TokenAuthorizer::new(http.clone(), config.api.token_endpoint()),
            subtitles: SubtitleResolver::new(http, config.playback.subtitle_dir.clone()),
            business_unit: config.api.business_unit.clone(),
            playback: config.playback.clone(),
        }
    }

    fn qualify(&self, identifier: &str, audio: bool) -> (Identifier, Urn) {
        let identifier = Identifier::parse(identifier);
        let urn = identifier.qualify(&self.business_unit, media_type_for(audio));
        (identifier, urn)
    }

    /// Resolve `identifier` (raw id or URN) to a playable item.
    pub async fn resolve_stream(
        &self,
        identifier: &str,
        preference: &SelectionPreference,
    ) -> Result<PlayableItem, ResolveError> {
        let (identifier, urn) = self.qualify(identifier, preference.audio);
        debug!(%urn, source = self.source.name(), "Resolving stream");

        let composition = self.source.fetch(&urn).await?;
        let located = locate(&composition, identifier.local_id())?;
        let chapter = located.chapter;

        let preference = SelectionPreference {
            audio: preference.audio || chapter.is_audio(),
            ..*preference
        };
        let selection = select(&chapter.resource_list, &preference).ok_or_else(|| {
            ResolveError::NoResource {
                chapter: chapter.id().to_string(),
            }
        })?;
        debug!(
            url = %selection.url,
            manifest = selection.manifest_type.as_str(),
            weight = selection.weight,
            drm = selection.license.is_some(),
            "Selected resource"
        );

        let title = composition
            .episode_title()
            .map_or_else(|| urn.to_string(), str::to_string);

        if !selection.manifest_type.is_adaptive() {
            return Ok(emit(title, selection.url, selection.manifest_type, None, Vec::new()));
        }

        let mut url = self.authorizer.authorize(&selection.url).await;
        if let Some(segment) = located.segment {
            url = apply_marks(
                &url,
                segment.mark_in,
                segment.mark_out,
                self.playback.zero_mark_is_absent,
            );
        }

        let subtitles = if self.playback.subtitles {
            self.subtitles.resolve(&selection.url, &urn.to_string()).await
        } else {
            Vec::new()
        };

        Ok(emit(title, url, selection.manifest_type, selection.license, subtitles))
    }

    /// Resolve and hand the item to `host`. Returns whether playback started.
    pub async fn play(
        &self,
        host: &dyn PlaybackHost,
        identifier: &str,
        preference: &SelectionPreference,
    ) -> bool {
        match self.resolve_stream(identifier, preference).await {
            Ok(item) => {
                info!(title = %item.title, manifest = item.manifest_type.as_str(), "Playing");
                host.resolve(item);
                true
            }
            Err(e) => {
                warn!(identifier, error = %e, "Cannot resolve stream");
                if e.is_fetch_failure() {
                    host.notify_user(&format!("Cannot open media composition: {e}"));
                }
                false
            }
        }
    }

    /// Authorized HLS item for a livestream URL.
    pub async fn play_livestream(&self, url: &str) -> PlayableItem {
        let url = self.authorizer.authorize(url).await;
        emit(LIVE_TITLE, url, ManifestType::Hls, None, Vec::new())
    }

    /// Render the episode menu for `identifier` into `sink`; returns the
    /// number of rendered entries.
    pub async fn list_episode(
        &self,
        identifier: &str,
        options: &EpisodeOptions,
        sink: &dyn ItemSink,
    ) -> Result<usize, ResolveError> {
        let (identifier, urn) = self.qualify(identifier, options.audio);
        let composition = self.source.fetch(&urn).await?;
        let entries = episode_entries(&composition, identifier.local_id(), options)?;

        for entry in &entries {
            if entry.is_folder {
                sink.render_folder(entry);
            } else {
                sink.render_item(entry);
            }
        }
        Ok(entries.len())
    }

    /// Episode options for a menu request, following the playback settings.
    #[must_use]
    pub const fn episode_options(&self, audio: bool, segment_option: bool) -> EpisodeOptions {
        EpisodeOptions {
            include_segments: self.playback.segments,
            segment_option,
            audio,
            subtitles: self.playback.subtitles,
        }
    }
}

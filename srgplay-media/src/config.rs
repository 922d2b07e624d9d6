use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::selector::SelectionPreference;

/// Resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub playback: PlaybackConfig,
    pub logging: LoggingConfig,
}

/// Which integration layer request shape is used to fetch compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `mediaComposition/byUrn/<urn>`
    #[default]
    Urn,
    /// `<bu>/mediaComposition/<type>/<id>.json`
    Legacy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Broadcaster domain; `il.` and `tp.` are prefixed for the services.
    pub host: String,
    /// Business unit used for raw ids (srf, rts, rsi, rtr, swi).
    pub business_unit: String,
    pub source: SourceKind,
    /// Overrides `https://il.<host>/integrationlayer/2.0`.
    pub integration_layer_url: Option<String>,
    /// Overrides `http://tp.<host>/akahd/token`.
    pub token_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "srgssr.ch".to_string(),
            business_unit: "srf".to_string(),
            source: SourceKind::Urn,
            integration_layer_url: None,
            token_url: None,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn integration_layer_base(&self) -> String {
        self.integration_layer_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://il.{}/integrationlayer/2.0", self.host))
    }

    #[must_use]
    pub fn token_endpoint(&self) -> String {
        self.token_url
            .clone()
            .unwrap_or_else(|| format!("http://tp.{}/akahd/token", self.host))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:59.0) Gecko/20100101 Firefox/59.0"
                .to_string(),
        }
    }
}

/// Playback settings that the host exposes to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub prefer_hd: bool,
    /// Resolve WebVTT subtitles for video streams.
    pub subtitles: bool,
    /// Where assembled `urn*.vtt` files are written.
    pub subtitle_dir: PathBuf,
    /// A segment mark that rounds to zero seconds disables the time window.
    pub zero_mark_is_absent: bool,
    /// List segments below their episode in episode menus.
    pub segments: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            prefer_hd: true,
            subtitles: false,
            subtitle_dir: std::env::temp_dir(),
            zero_mark_is_absent: true,
            segments: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // SRGPLAY_API__BUSINESS_UNIT, SRGPLAY_PLAYBACK__PREFER_HD, ...
        builder = builder.add_source(
            Environment::with_prefix("SRGPLAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Selection preference for one request.
    #[must_use]
    pub const fn preference(&self, audio: bool) -> SelectionPreference {
        SelectionPreference {
            prefer_hd: self.playback.prefer_hd,
            audio,
        }
    }
}

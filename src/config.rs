//! Configuration management for the chat widget

use std::path::PathBuf;

use serde::Deserialize;

use crate::{Error, Result};

/// Default message endpoint base URL
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Default recognition/synthesis language (BCP 47)
const DEFAULT_LANGUAGE: &str = "fr-FR";

/// Widget configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the message endpoint (`/send_message` is appended)
    pub endpoint_url: String,

    /// Fixed recognition and synthesis language
    pub language: String,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Voice processing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceConfig {
    /// Enable voice input/output
    pub enabled: bool,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: String,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: String,

    /// TTS model (e.g. "tts-1", "eleven_multilingual_v2")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stt_provider: "whisper".to_string(),
            stt_model: "whisper-1".to_string(),
            tts_provider: "openai".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper STT and TTS)
    pub openai: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<String>,
}

/// On-disk configuration file shape (`causerie.toml`)
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    endpoint_url: Option<String>,
    language: Option<String>,
    voice: Option<VoiceConfig>,
}

/// Return the XDG config file path (`~/.config/causerie/causerie.toml` on Linux)
#[must_use]
pub fn config_file_path() -> PathBuf {
    directories::ProjectDirs::from("dev", "causerie", "causerie").map_or_else(
        || PathBuf::from("causerie.toml"),
        |d| d.config_dir().join("causerie.toml"),
    )
}

impl Config {
    /// Load configuration from the default config file and environment
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be parsed
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from an explicit file path and environment
    ///
    /// A missing file is not an error; env vars override file values.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let file = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            let parsed: ConfigFile = toml::from_str(&raw)?;
            tracing::debug!(path = %path.display(), "loaded config file");
            parsed
        } else {
            ConfigFile::default()
        };

        let api_keys = ApiKeys {
            openai: std::env::var("OPENAI_API_KEY").ok(),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY").ok(),
            deepgram: std::env::var("DEEPGRAM_API_KEY").ok(),
        };

        let endpoint_url = std::env::var("CAUSERIE_ENDPOINT")
            .ok()
            .or(file.endpoint_url)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let config = Self {
            endpoint_url,
            language: file.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            voice: file.voice.unwrap_or_default(),
            api_keys,
        };

        config.validate()?;
        Ok(config)
    }

    /// ISO 639-1 language code derived from the configured BCP 47 tag
    ///
    /// Cloud STT APIs take the short code ("fr"), not the full tag ("fr-FR").
    #[must_use]
    pub fn short_language(&self) -> &str {
        self.language.split('-').next().unwrap_or(&self.language)
    }

    fn validate(&self) -> Result<()> {
        if self.endpoint_url.is_empty() {
            return Err(Error::Config("endpoint URL must not be empty".to_string()));
        }
        if !(0.25..=4.0).contains(&self.voice.tts_speed) {
            return Err(Error::Config(format!(
                "tts_speed {} outside 0.25..=4.0",
                self.voice.tts_speed
            )));
        }
        Ok(())
    }
}

//! Voice input and output
//!
//! The widget consumes speech through two injected collaborator traits:
//! [`SpeechRecognizer`] (one utterance in, final transcript out) and
//! [`SpeechSynthesizer`] (plain text in, audible playback out). The concrete
//! adapters here wire microphone capture, utterance segmentation and cloud
//! STT/TTS behind those traits; tests substitute their own.

mod capture;
mod playback;
mod segmenter;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, input_available, samples_to_wav};
pub use playback::{AudioPlayback, output_available};
pub use segmenter::{SegmenterState, UtteranceSegmenter};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;

use std::time::Duration;

use async_trait::async_trait;

use crate::{Config, Error, Result};

/// Polling interval while listening
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Maximum listening window for one utterance
const MAX_LISTEN: Duration = Duration::from_secs(15);

/// Speech input collaborator
///
/// `recognize` captures one utterance and returns the final transcript, the
/// single best alternative only. An empty string means recognition ended
/// without a usable result; an error means recognition itself failed.
#[async_trait(?Send)]
pub trait SpeechRecognizer {
    /// Capture one utterance and transcribe it
    ///
    /// # Errors
    ///
    /// Returns error if capture or transcription fails
    async fn recognize(&mut self) -> Result<String>;
}

/// Speech output collaborator
#[async_trait(?Send)]
pub trait SpeechSynthesizer {
    /// Speak the given plain text aloud
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;
}

/// Microphone-backed recognizer: capture, segmentation, cloud STT
pub struct Microphone {
    capture: AudioCapture,
    stt: SpeechToText,
}

impl Microphone {
    /// Build a recognizer from configuration
    ///
    /// # Errors
    ///
    /// Returns error if no input device is available, the configured provider
    /// is unknown, or its API key is missing
    pub fn from_config(config: &Config) -> Result<Self> {
        let language = config.short_language().to_string();
        let stt = match config.voice.stt_provider.as_str() {
            "whisper" => SpeechToText::new_whisper(
                config.api_keys.openai.clone().unwrap_or_default(),
                config.voice.stt_model.clone(),
                language,
            )?,
            "deepgram" => SpeechToText::new_deepgram(
                config.api_keys.deepgram.clone().unwrap_or_default(),
                config.voice.stt_model.clone(),
                language,
            )?,
            other => {
                return Err(Error::Config(format!("unknown STT provider: {other}")));
            }
        };

        Ok(Self {
            capture: AudioCapture::new()?,
            stt,
        })
    }
}

#[async_trait(?Send)]
impl SpeechRecognizer for Microphone {
    async fn recognize(&mut self) -> Result<String> {
        let mut segmenter = UtteranceSegmenter::new();

        self.capture.clear_buffer();
        self.capture.start()?;

        let deadline = tokio::time::Instant::now() + MAX_LISTEN;
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let chunk = self.capture.take_buffer();
            if segmenter.push(&chunk) {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::debug!("listening window elapsed");
                break;
            }
        }

        self.capture.stop();

        if !segmenter.heard_speech() {
            // Ended without a result; the widget resets to idle
            return Ok(String::new());
        }

        let utterance = segmenter.take_utterance();
        let wav = samples_to_wav(&utterance, SAMPLE_RATE)?;
        self.stt.transcribe(&wav).await
    }
}

/// Speaker-backed synthesizer: cloud TTS, MP3 decode, playback
pub struct Speaker {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

impl Speaker {
    /// Build a synthesizer from configuration
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available, the configured
    /// provider is unknown, or its API key is missing
    pub fn from_config(config: &Config) -> Result<Self> {
        let tts = match config.voice.tts_provider.as_str() {
            "openai" => TextToSpeech::new_openai(
                config.api_keys.openai.clone().unwrap_or_default(),
                config.voice.tts_voice.clone(),
                config.voice.tts_speed,
                config.voice.tts_model.clone(),
            )?,
            "elevenlabs" => TextToSpeech::new_elevenlabs(
                config.api_keys.elevenlabs.clone().unwrap_or_default(),
                config.voice.tts_voice.clone(),
                config.voice.tts_model.clone(),
            )?,
            other => {
                return Err(Error::Config(format!("unknown TTS provider: {other}")));
            }
        };

        Ok(Self {
            tts,
            playback: AudioPlayback::new()?,
        })
    }
}

#[async_trait(?Send)]
impl SpeechSynthesizer for Speaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let audio = self.tts.synthesize(text).await?;
        self.playback.play_mp3(&audio).await
    }
}

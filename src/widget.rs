//! Chat widget controller
//!
//! One explicitly constructed widget instance owns the transcript, the input
//! controls and the injected collaborators (transport, recognizer,
//! synthesizer). Exactly one request is in flight at a time, tracked by a
//! single-slot guard; every dispatch ends by re-enabling the controls and
//! returning focus to the text field, whatever the outcome.

use crate::endpoint::MessageEndpoint;
use crate::render;
use crate::transcript::Transcript;
use crate::voice::{SpeechRecognizer, SpeechSynthesizer};
use crate::Error;

/// Status line strings (the widget UI is French, like the assistant persona)
pub mod status {
    /// Idle prompt next to the microphone button
    pub const IDLE: &str = "ou cliquez sur le micro";
    /// Recognition in progress
    pub const LISTENING: &str = "Écoute en cours...";
    /// Transcript received, awaiting the endpoint
    pub const PROCESSING: &str = "Traitement de votre message...";
    /// Recognition failed, retry possible
    pub const VOICE_ERROR: &str = "Erreur vocale. Réessayez.";
    /// No recognition capability on this platform
    pub const VOICE_UNAVAILABLE: &str = "Fonction vocale non supportée.";
}

/// Prefix of an inline endpoint-error message
const ERROR_PREFIX: &str = "Erreur : ";

/// Prefix of an inline transport-failure message
const CONNECTION_ERROR_PREFIX: &str = "Erreur de connexion : ";

/// Fallback when the endpoint supplied no error detail
const UNKNOWN_ERROR: &str = "Erreur inconnue";

/// Recognition lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionState {
    /// Not listening
    Idle,
    /// Microphone active, waiting for the final transcript
    Listening,
    /// Transcript received, dispatch under way
    Processing,
}

/// Input control state: enablement, focus and buffers
#[derive(Debug)]
pub struct Controls {
    /// Whether the text field accepts input
    pub input_enabled: bool,
    /// Whether the microphone button accepts clicks
    pub mic_enabled: bool,
    /// Whether the text field holds input focus
    pub input_focused: bool,
    /// Current content of the text field
    pub input_buffer: String,
    /// Status line text
    pub status: String,
}

/// Marker occupying the single dispatch slot
#[derive(Debug)]
struct InFlight;

/// The chat widget: captures input, dispatches it, renders and speaks replies
pub struct ChatWidget {
    transcript: Transcript,
    controls: Controls,
    recognition: RecognitionState,
    endpoint: Box<dyn MessageEndpoint>,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    in_flight: Option<InFlight>,
}

impl ChatWidget {
    /// Construct a widget around its collaborators
    ///
    /// A missing recognizer permanently disables the microphone control; a
    /// missing synthesizer makes speech output a silent no-op. The rest of
    /// the widget works either way.
    #[must_use]
    pub fn new(
        endpoint: Box<dyn MessageEndpoint>,
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    ) -> Self {
        let mic_enabled = recognizer.is_some();
        let status = if mic_enabled {
            status::IDLE.to_string()
        } else {
            tracing::warn!("no speech recognition capability, microphone disabled");
            status::VOICE_UNAVAILABLE.to_string()
        };

        Self {
            transcript: Transcript::new(),
            controls: Controls {
                input_enabled: true,
                mic_enabled,
                input_focused: true,
                input_buffer: String::new(),
                status,
            },
            recognition: RecognitionState::Idle,
            endpoint,
            recognizer,
            synthesizer,
            in_flight: None,
        }
    }

    /// Replace the text field content
    pub fn set_input(&mut self, text: &str) {
        self.controls.input_buffer = text.to_string();
    }

    /// Submit the text field content (the Enter-key path)
    pub async fn submit(&mut self) {
        let raw = self.controls.input_buffer.clone();
        self.send(&raw).await;
    }

    /// Send a message string; whitespace-only input is silently ignored
    pub async fn send(&mut self, raw: &str) {
        let message = raw.trim();
        if message.is_empty() {
            return;
        }
        self.dispatch(message.to_string()).await;
    }

    /// Run one voice turn: listen, transcribe, dispatch
    ///
    /// Ignored when the microphone is disabled or recognition is already
    /// under way.
    pub async fn press_microphone(&mut self) {
        if !self.controls.mic_enabled || self.recognition != RecognitionState::Idle {
            tracing::debug!("microphone press ignored");
            return;
        }
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };

        self.recognition = RecognitionState::Listening;
        self.controls.status = status::LISTENING.to_string();

        match recognizer.recognize().await {
            Ok(transcript) if !transcript.trim().is_empty() => {
                self.recognition = RecognitionState::Processing;
                self.controls.status = status::PROCESSING.to_string();
                self.controls.mic_enabled = false;

                self.dispatch(transcript.trim().to_string()).await;

                // Recognition ended and the controls are back; reset to idle
                self.recognition = RecognitionState::Idle;
                self.controls.status = status::IDLE.to_string();
            }
            Ok(_) => {
                // Ended without a usable transcript
                tracing::debug!("recognition ended without result");
                self.recognition = RecognitionState::Idle;
                self.controls.status = status::IDLE.to_string();
            }
            Err(e) => {
                tracing::error!(error = %e, "speech recognition failed");
                self.recognition = RecognitionState::Idle;
                self.controls.status = status::VOICE_ERROR.to_string();
                self.controls.mic_enabled = true;
            }
        }
    }

    /// One dispatch cycle against the endpoint
    async fn dispatch(&mut self, message: String) {
        if self.in_flight.is_some() {
            tracing::debug!("dispatch rejected, request already in flight");
            return;
        }
        self.in_flight = Some(InFlight);

        // Optimistic append, then lock the controls for the roundtrip
        self.transcript.push_user(&message);
        self.controls.input_buffer.clear();
        self.transcript.show_loading();
        self.controls.input_enabled = false;
        self.controls.mic_enabled = false;
        self.controls.input_focused = false;

        match self.endpoint.send(&message).await {
            Ok(reply) => {
                self.transcript.clear_loading();
                self.append_bot(&reply).await;
            }
            Err(Error::Endpoint { status, detail }) => {
                tracing::warn!(status, detail = ?detail, "endpoint rejected message");
                self.transcript.clear_loading();
                let detail = detail.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                self.append_bot(&format!("{ERROR_PREFIX}{detail}")).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "dispatch failed");
                self.transcript.clear_loading();
                let description = match e {
                    Error::Connection(desc) | Error::MalformedResponse(desc) => desc,
                    other => other.to_string(),
                };
                self.append_bot(&format!("{CONNECTION_ERROR_PREFIX}{description}"))
                    .await;
            }
        }

        // Unconditional cleanup: release the slot, restore the controls,
        // return focus to the text field
        self.in_flight = None;
        self.controls.input_enabled = true;
        self.controls.mic_enabled = self.recognizer.is_some();
        self.controls.input_focused = true;
    }

    /// Append a bot message and speak it with the devis markers stripped
    async fn append_bot(&mut self, text: &str) {
        self.transcript.push_bot(text);

        if let Some(synthesizer) = self.synthesizer.as_mut() {
            let spoken = render::strip_document_markers(text);
            if let Err(e) = synthesizer.speak(&spoken).await {
                tracing::warn!(error = %e, "speech synthesis failed");
            }
        }
    }

    /// The session transcript
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The input control state
    #[must_use]
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Current recognition lifecycle state
    #[must_use]
    pub const fn recognition_state(&self) -> RecognitionState {
        self.recognition
    }

    /// Whether a request is currently in flight
    #[must_use]
    pub const fn is_awaiting_response(&self) -> bool {
        self.in_flight.is_some()
    }
}

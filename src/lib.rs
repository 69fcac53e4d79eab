//! Causerie - voice-enabled chat widget client
//!
//! This library provides the chat widget controller:
//! - Input capture (text field or one-shot speech recognition)
//! - Message dispatch to a remote `/send_message` endpoint
//! - Markdown rendering of replies into an ordered transcript
//! - Speech synthesis of replies (devis markers stripped)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      Input                           │
//! │      text field        │       microphone            │
//! └────────────────────────┬────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────┐
//! │                   Chat Widget                        │
//! │  transcript │ controls │ in-flight guard │ render   │
//! └────────────────────────┬────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────┐
//! │                  Collaborators                       │
//! │   endpoint (HTTP)  │  STT (cloud)  │  TTS (cloud)   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The widget is an explicitly constructed instance; transport and speech
//! collaborators are injected behind traits, so tests (and alternative
//! frontends) can substitute their own.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod render;
pub mod transcript;
pub mod voice;
pub mod widget;

pub use config::Config;
pub use endpoint::{HttpEndpoint, MessageEndpoint};
pub use error::{Error, Result};
pub use transcript::{Entry, Message, Sender, Transcript};
pub use voice::{Microphone, Speaker, SpeechRecognizer, SpeechSynthesizer};
pub use widget::{ChatWidget, Controls, RecognitionState};

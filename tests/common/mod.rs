//! Shared test doubles for the widget suites

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use causerie::{Error, MessageEndpoint, Result, SpeechRecognizer, SpeechSynthesizer};

/// Endpoint double replaying scripted outcomes in order
pub struct ScriptedEndpoint {
    script: Mutex<VecDeque<Result<String>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEndpoint {
    #[must_use]
    pub fn new(script: Vec<Result<String>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An endpoint that must never be reached
    #[must_use]
    pub fn unreachable() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl MessageEndpoint for ScriptedEndpoint {
    async fn send(&self, message: &str) -> Result<String> {
        self.calls.lock().unwrap().push(message.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Connection("script exhausted".to_string())))
    }
}

/// Recognizer double replaying scripted transcripts
pub struct ScriptedRecognizer {
    script: VecDeque<Result<String>>,
}

impl ScriptedRecognizer {
    #[must_use]
    pub fn new(script: Vec<Result<String>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

#[async_trait(?Send)]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize(&mut self) -> Result<String> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(Error::Stt("script exhausted".to_string())))
    }
}

/// Synthesizer double recording everything it is asked to speak
#[derive(Default)]
pub struct RecordingSynthesizer {
    pub spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSynthesizer {
    #[must_use]
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                spoken: Arc::clone(&spoken),
            },
            spoken,
        )
    }
}

#[async_trait(?Send)]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

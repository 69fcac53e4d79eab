//! Utterance segmentation
//!
//! Decides when a spoken utterance is complete: energy-based speech
//! detection, a minimum amount of speech, then trailing silence as the
//! endpoint. The widget starts a segmenter on microphone activation and
//! stops feeding it once an utterance completes.

/// Minimum RMS energy to consider a chunk speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum amount of speech for a usable utterance (samples at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800; // 0.3 seconds

/// Trailing silence that ends an utterance (samples)
const SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// Segmenter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// No speech heard yet
    Waiting,
    /// Speech heard, accumulating the utterance
    Speaking,
}

/// Accumulates microphone samples and detects the end of an utterance
#[derive(Debug)]
pub struct UtteranceSegmenter {
    state: SegmenterState,
    buffer: Vec<f32>,
    speech_samples: usize,
    silence_counter: usize,
}

impl Default for UtteranceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceSegmenter {
    /// Create a segmenter in the waiting state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SegmenterState::Waiting,
            buffer: Vec::new(),
            speech_samples: 0,
            silence_counter: 0,
        }
    }

    /// Feed a chunk of samples; returns true once the utterance is complete
    pub fn push(&mut self, samples: &[f32]) -> bool {
        let energy = rms_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            SegmenterState::Waiting => {
                if is_speech {
                    self.state = SegmenterState::Speaking;
                    self.buffer.extend_from_slice(samples);
                    self.speech_samples = samples.len();
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech started");
                }
                false
            }
            SegmenterState::Speaking => {
                self.buffer.extend_from_slice(samples);

                if is_speech {
                    self.speech_samples += samples.len();
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                let complete = self.silence_counter > SILENCE_SAMPLES
                    && self.speech_samples > MIN_SPEECH_SAMPLES;
                if complete {
                    tracing::debug!(samples = self.buffer.len(), "utterance complete");
                } else if self.silence_counter > SILENCE_SAMPLES * 2 {
                    // Too much silence without enough speech: a false start
                    tracing::trace!("false start, resetting");
                    self.reset();
                }
                complete
            }
        }
    }

    /// Take the accumulated utterance, resetting the segmenter
    pub fn take_utterance(&mut self) -> Vec<f32> {
        let samples = std::mem::take(&mut self.buffer);
        self.reset();
        samples
    }

    /// Whether any speech has been heard
    #[must_use]
    pub fn heard_speech(&self) -> bool {
        self.state == SegmenterState::Speaking || !self.buffer.is_empty()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SegmenterState {
        self.state
    }

    /// Reset to the waiting state, discarding buffered audio
    pub fn reset(&mut self) {
        self.state = SegmenterState::Waiting;
        self.buffer.clear();
        self.speech_samples = 0;
        self.silence_counter = 0;
    }
}

/// RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

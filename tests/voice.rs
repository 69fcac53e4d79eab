//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use causerie::voice::{SAMPLE_RATE, SegmenterState, UtteranceSegmenter, samples_to_wav};
use std::io::Cursor;

/// Generate sine wave audio samples
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

#[test]
fn test_segmenter_starts_waiting() {
    let segmenter = UtteranceSegmenter::new();

    assert_eq!(segmenter.state(), SegmenterState::Waiting);
    assert!(!segmenter.heard_speech());
}

#[test]
fn test_silence_does_not_trigger() {
    let mut segmenter = UtteranceSegmenter::new();

    let silence = generate_silence(0.5);
    assert!(!segmenter.push(&silence));
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
    assert!(!segmenter.heard_speech());
}

#[test]
fn test_speech_activity_detection() {
    let mut segmenter = UtteranceSegmenter::new();

    // Silent samples - should not trigger
    let silence = generate_silence(0.1);
    assert!(!segmenter.push(&silence));
    assert_eq!(segmenter.state(), SegmenterState::Waiting);

    // Loud samples - should start accumulating
    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    segmenter.push(&speech);
    assert_eq!(segmenter.state(), SegmenterState::Speaking);

    // More speech followed by silence should complete the utterance
    let more_speech = generate_sine_samples(440.0, 0.3, 0.3);
    segmenter.push(&more_speech);

    let silence = generate_silence(0.6);
    let complete = segmenter.push(&silence);
    assert!(complete); // Utterance complete
}

#[test]
fn test_speech_buffer_accumulation() {
    let mut segmenter = UtteranceSegmenter::new();

    let chunk1 = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.push(&chunk1);

    let chunk2 = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.push(&chunk2);

    // Utterance should contain both chunks
    let utterance = segmenter.take_utterance();
    assert_eq!(utterance.len(), chunk1.len() + chunk2.len());
}

#[test]
fn test_take_utterance_resets() {
    let mut segmenter = UtteranceSegmenter::new();

    let speech = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.push(&speech);
    assert!(segmenter.heard_speech());

    let taken = segmenter.take_utterance();
    assert_eq!(taken.len(), speech.len());

    // Segmenter should be back in the waiting state after take
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
    assert!(!segmenter.heard_speech());
}

#[test]
fn test_short_blip_never_completes() {
    let mut segmenter = UtteranceSegmenter::new();

    // A blip well below the speech minimum
    let blip = generate_sine_samples(440.0, 0.05, 0.3);
    segmenter.push(&blip);
    assert_eq!(segmenter.state(), SegmenterState::Speaking);

    // Long silence without enough speech resets instead of completing
    for _ in 0..20 {
        assert!(!segmenter.push(&generate_silence(0.1)));
    }
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
}

#[test]
fn test_reset_discards_audio() {
    let mut segmenter = UtteranceSegmenter::new();

    let speech = generate_sine_samples(440.0, 0.3, 0.3);
    segmenter.push(&speech);
    assert!(segmenter.heard_speech());

    segmenter.reset();
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
    assert!(segmenter.take_utterance().is_empty());
}

#[test]
fn test_segmenter_reusable_after_take() {
    let mut segmenter = UtteranceSegmenter::new();

    // First utterance
    segmenter.push(&generate_sine_samples(440.0, 0.5, 0.3));
    assert!(segmenter.push(&generate_silence(0.6)));
    let first = segmenter.take_utterance();
    assert!(!first.is_empty());

    // Second utterance through the same segmenter
    segmenter.push(&generate_sine_samples(220.0, 0.5, 0.3));
    assert!(segmenter.push(&generate_silence(0.6)));
    let second = segmenter.take_utterance();
    assert!(!second.is_empty());
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");

    // WAV should have reasonable size
    assert!(wav_data.len() > 44); // WAV header is 44 bytes
}

#[test]
fn test_wav_roundtrip() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    // Read WAV back
    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    // Read samples back
    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
}

//! Widget controller integration tests
//!
//! Exercises the dispatch contract and the recognition lifecycle against
//! scripted collaborators, no network or audio hardware required.

use causerie::widget::status;
use causerie::{ChatWidget, Error, RecognitionState, Sender};

mod common;
use common::{RecordingSynthesizer, ScriptedEndpoint, ScriptedRecognizer};

fn widget_with(endpoint: ScriptedEndpoint) -> ChatWidget {
    ChatWidget::new(Box::new(endpoint), None, None)
}

#[tokio::test]
async fn test_whitespace_only_input_never_dispatches() {
    let endpoint = ScriptedEndpoint::unreachable();
    let calls = endpoint.calls.clone();
    let mut widget = widget_with(endpoint);

    widget.send("").await;
    widget.send("   ").await;
    widget.send("\t\n  \n").await;

    assert!(widget.transcript().is_empty());
    assert!(calls.lock().unwrap().is_empty());
    assert!(widget.controls().input_enabled);
}

#[tokio::test]
async fn test_success_appends_user_then_rendered_bot() {
    let endpoint = ScriptedEndpoint::new(vec![Ok("**Salut** !".to_string())]);
    let calls = endpoint.calls.clone();
    let mut widget = widget_with(endpoint);

    widget.send("  Bonjour  ").await;

    // The dispatched message is trimmed
    assert_eq!(calls.lock().unwrap().as_slice(), ["Bonjour"]);

    let entries = widget.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message.sender, Sender::User);
    assert_eq!(entries[0].message.text, "Bonjour");
    assert_eq!(entries[1].message.sender, Sender::Bot);
    assert!(entries[1].html.contains("<strong>Salut</strong>"));
    assert!(!widget.transcript().is_loading());
}

#[tokio::test]
async fn test_user_text_is_not_rendered_as_markup() {
    let endpoint = ScriptedEndpoint::new(vec![Ok("ok".to_string())]);
    let mut widget = widget_with(endpoint);

    widget.send("<img src=x> **gras**").await;

    let user = &widget.transcript().entries()[0];
    assert!(!user.html.contains("<img"));
    assert!(user.html.contains("&lt;img"));
    assert!(user.html.contains("**gras**"));
}

#[tokio::test]
async fn test_http_error_renders_server_detail() {
    let endpoint = ScriptedEndpoint::new(vec![Err(Error::Endpoint {
        status: 500,
        detail: Some("X".to_string()),
    })]);
    let mut widget = widget_with(endpoint);

    widget.send("Bonjour").await;

    let entries = widget.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].message.sender, Sender::Bot);
    assert_eq!(entries[1].message.text, "Erreur : X");
    assert!(!widget.transcript().is_loading());
}

#[tokio::test]
async fn test_http_error_without_detail_uses_fallback() {
    let endpoint = ScriptedEndpoint::new(vec![Err(Error::Endpoint {
        status: 503,
        detail: None,
    })]);
    let mut widget = widget_with(endpoint);

    widget.send("Bonjour").await;

    let bot = widget.transcript().newest().unwrap();
    assert_eq!(bot.message.text, "Erreur : Erreur inconnue");
}

#[tokio::test]
async fn test_network_failure_renders_description() {
    let endpoint = ScriptedEndpoint::new(vec![Err(Error::Connection(
        "connexion refusée".to_string(),
    ))]);
    let mut widget = widget_with(endpoint);

    widget.send("Bonjour").await;

    let entries = widget.transcript().entries();
    assert_eq!(entries.len(), 2);
    let bot = &entries[1].message;
    assert_eq!(bot.sender, Sender::Bot);
    assert!(bot.text.starts_with("Erreur de connexion : "));
    assert!(bot.text.contains("connexion refusée"));
    assert!(!widget.transcript().is_loading());
}

#[tokio::test]
async fn test_malformed_response_surfaced_like_connection_failure() {
    let endpoint = ScriptedEndpoint::new(vec![Err(Error::MalformedResponse(
        "missing field `response`".to_string(),
    ))]);
    let mut widget = widget_with(endpoint);

    widget.send("Bonjour").await;

    let bot = widget.transcript().newest().unwrap();
    assert!(bot.message.text.starts_with("Erreur de connexion : "));
    assert!(bot.message.text.contains("missing field `response`"));
    assert!(!widget.transcript().is_loading());
}

#[tokio::test]
async fn test_controls_restored_after_every_outcome() {
    let endpoint = ScriptedEndpoint::new(vec![
        Ok("bien".to_string()),
        Err(Error::Endpoint {
            status: 500,
            detail: Some("X".to_string()),
        }),
        Err(Error::Connection("down".to_string())),
    ]);
    let mut widget = widget_with(endpoint);

    for message in ["un", "deux", "trois"] {
        widget.send(message).await;

        let controls = widget.controls();
        assert!(controls.input_enabled);
        assert!(controls.input_focused);
        assert!(controls.input_buffer.is_empty());
        assert!(!widget.is_awaiting_response());
    }
}

#[tokio::test]
async fn test_devis_markers_visible_in_html_but_not_spoken() {
    let reply = "Voici :\n\n---DEVIS START---\nTarte aux Fruits - 5.00€ HT\n---DEVIS END---";
    let endpoint = ScriptedEndpoint::new(vec![Ok(reply.to_string())]);
    let (synth, spoken) = RecordingSynthesizer::new();
    let mut widget = ChatWidget::new(Box::new(endpoint), None, Some(Box::new(synth)));

    widget.send("un devis svp").await;

    let bot = widget.transcript().newest().unwrap();
    assert!(bot.html.contains("---DEVIS START---"));
    assert!(bot.html.contains("---DEVIS END---"));

    let spoken = spoken.lock().unwrap();
    assert_eq!(spoken.len(), 1);
    assert!(!spoken[0].contains("---DEVIS START---"));
    assert!(!spoken[0].contains("---DEVIS END---"));
    assert!(spoken[0].contains("Tarte aux Fruits"));
}

#[tokio::test]
async fn test_error_messages_are_spoken_too() {
    let endpoint = ScriptedEndpoint::new(vec![Err(Error::Endpoint {
        status: 500,
        detail: Some("quota".to_string()),
    })]);
    let (synth, spoken) = RecordingSynthesizer::new();
    let mut widget = ChatWidget::new(Box::new(endpoint), None, Some(Box::new(synth)));

    widget.send("Bonjour").await;

    assert_eq!(spoken.lock().unwrap().as_slice(), ["Erreur : quota"]);
}

#[tokio::test]
async fn test_without_recognizer_microphone_is_disabled() {
    let endpoint = ScriptedEndpoint::unreachable();
    let calls = endpoint.calls.clone();
    let mut widget = widget_with(endpoint);

    assert!(!widget.controls().mic_enabled);
    assert_eq!(widget.controls().status, status::VOICE_UNAVAILABLE);

    // A press is a no-op: no state change, no dispatch
    widget.press_microphone().await;
    assert_eq!(widget.recognition_state(), RecognitionState::Idle);
    assert!(widget.transcript().is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_voice_turn_dispatches_final_transcript() {
    let endpoint = ScriptedEndpoint::new(vec![Ok("Le menu du jour...".to_string())]);
    let calls = endpoint.calls.clone();
    let recognizer = ScriptedRecognizer::new(vec![Ok("Quel est le menu ?".to_string())]);
    let mut widget = ChatWidget::new(Box::new(endpoint), Some(Box::new(recognizer)), None);

    assert!(widget.controls().mic_enabled);
    assert_eq!(widget.controls().status, status::IDLE);

    widget.press_microphone().await;

    assert_eq!(calls.lock().unwrap().as_slice(), ["Quel est le menu ?"]);
    assert_eq!(widget.transcript().len(), 2);
    assert_eq!(widget.recognition_state(), RecognitionState::Idle);
    assert_eq!(widget.controls().status, status::IDLE);
    assert!(widget.controls().mic_enabled);
}

#[tokio::test]
async fn test_recognition_error_resets_for_retry() {
    let endpoint = ScriptedEndpoint::unreachable();
    let calls = endpoint.calls.clone();
    let recognizer = ScriptedRecognizer::new(vec![Err(Error::Stt("no audio".to_string()))]);
    let mut widget = ChatWidget::new(Box::new(endpoint), Some(Box::new(recognizer)), None);

    widget.press_microphone().await;

    assert_eq!(widget.recognition_state(), RecognitionState::Idle);
    assert_eq!(widget.controls().status, status::VOICE_ERROR);
    assert!(widget.controls().mic_enabled);
    assert!(widget.transcript().is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_recognition_without_result_resets_status() {
    let endpoint = ScriptedEndpoint::unreachable();
    let recognizer = ScriptedRecognizer::new(vec![Ok(String::new())]);
    let mut widget = ChatWidget::new(Box::new(endpoint), Some(Box::new(recognizer)), None);

    widget.press_microphone().await;

    assert_eq!(widget.recognition_state(), RecognitionState::Idle);
    assert_eq!(widget.controls().status, status::IDLE);
    assert!(widget.transcript().is_empty());
}

#[tokio::test]
async fn test_submit_sends_and_clears_text_field() {
    let endpoint = ScriptedEndpoint::new(vec![Ok("Salut !".to_string())]);
    let mut widget = widget_with(endpoint);

    widget.set_input("Bonjour");
    widget.submit().await;

    assert!(widget.controls().input_buffer.is_empty());
    assert_eq!(widget.transcript().len(), 2);
}

#[tokio::test]
async fn test_transcript_grows_monotonically() {
    let endpoint = ScriptedEndpoint::new(vec![
        Ok("un".to_string()),
        Err(Error::Connection("down".to_string())),
        Ok("trois".to_string()),
    ]);
    let mut widget = widget_with(endpoint);

    widget.send("a").await;
    widget.send("b").await;
    widget.send("c").await;

    let senders: Vec<Sender> = widget
        .transcript()
        .entries()
        .iter()
        .map(|e| e.message.sender)
        .collect();
    assert_eq!(
        senders,
        vec![
            Sender::User,
            Sender::Bot,
            Sender::User,
            Sender::Bot,
            Sender::User,
            Sender::Bot,
        ]
    );
}

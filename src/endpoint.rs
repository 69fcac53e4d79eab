//! Remote message endpoint transport
//!
//! One dispatch cycle is a single `POST /send_message` carrying the user
//! message as JSON. A 2xx reply carries `{"response": string}`, anything else
//! `{"error": string}`. A body that is not JSON with the expected field is a
//! malformed response, reported as its own error kind.

use async_trait::async_trait;

use crate::{Error, Result};

/// Request body for `POST /send_message`
#[derive(serde::Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
}

/// Success payload from the endpoint
#[derive(serde::Deserialize)]
struct SendMessageResponse {
    response: String,
}

/// Error payload from the endpoint
#[derive(serde::Deserialize)]
struct SendMessageFailure {
    error: Option<String>,
}

/// Transport collaborator: sends one user message, returns the reply text
#[async_trait]
pub trait MessageEndpoint: Send + Sync {
    /// Send a user message and return the assistant reply
    ///
    /// # Errors
    ///
    /// Returns [`Error::Endpoint`] for a non-2xx reply, [`Error::Connection`]
    /// when no response arrives at all, and [`Error::MalformedResponse`] when
    /// the success body cannot be parsed.
    async fn send(&self, message: &str) -> Result<String>;
}

/// HTTP JSON implementation of the message endpoint
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// Create an endpoint client for a base URL
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/send_message", base_url.trim_end_matches('/')),
        }
    }

    /// Full URL requests are posted to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MessageEndpoint for HttpEndpoint {
    async fn send(&self, message: &str) -> Result<String> {
        tracing::debug!(chars = message.len(), url = %self.url, "sending message");

        let response = self
            .client
            .post(&self.url)
            .json(&SendMessageRequest { message })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "request failed");
                Error::Connection(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<SendMessageFailure>(&body)
                .ok()
                .and_then(|f| f.error);
            tracing::warn!(status = %status, detail = ?detail, "endpoint error");
            return Err(Error::Endpoint {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: SendMessageResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "unparseable success body");
            Error::MalformedResponse(e.to_string())
        })?;

        tracing::debug!(chars = parsed.response.len(), "reply received");
        Ok(parsed.response)
    }
}

//! A small client for the generative language API's `generateContent` method.

use std::{fmt::Debug, time::Duration};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The public endpoint of the generative language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// The model that answers chat messages.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// The reply used when the API answers without any candidate text.
pub const FALLBACK_REPLY: &str =
    "No response from bot, most likely server side issue. Please try again later.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach the generative language API.
#[derive(Clone)]
pub struct ChatConfig {
    /// The API key sent with every request. Chat is unavailable without one.
    pub api_key: Option<String>,
    /// The scheme and host of the API, without a trailing path.
    pub base_url: String,
    /// The model name, e.g. "gemini-2.0-flash".
    pub model: String,
}

impl ChatConfig {
    /// A config for the public API and the default model.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Use a different host for the API, e.g. a local stub in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// The API key must not end up in the logs.
impl Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// The text of the first part of the first candidate, if there is one.
    fn into_reply(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Forwards chat messages to the generative language API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: ChatConfig,
    http: reqwest::Client,
}

impl ChatClient {
    /// Create a client with a request timeout.
    pub fn new(config: ChatConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|error| {
                tracing::warn!("Could not build HTTP client with timeout, using defaults: {error}");
                reqwest::Client::new()
            });

        Self { config, http }
    }

    /// Send `message` as a single user turn and return the model's reply.
    ///
    /// The HTTP status of the response is not checked. A body without any
    /// candidate text gives [FALLBACK_REPLY].
    ///
    /// # Errors
    ///
    /// Returns an [Error::ChatApiKeyMissing] if no API key is configured, or an
    /// [Error::ChatRequestFailed] if the request could not be sent or the
    /// response is not JSON.
    pub async fn send(&self, message: &str) -> Result<String, Error> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::ChatApiKeyMissing)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: message }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            // The URL carries the API key.
            .map_err(|error| Error::ChatRequestFailed(error.without_url().to_string()))?;

        tracing::debug!("Generative language API responded with {}", response.status());

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| Error::ChatRequestFailed(error.without_url().to_string()))?;

        Ok(response
            .into_reply()
            .unwrap_or_else(|| FALLBACK_REPLY.to_owned()))
    }
}

/// Language-model gateway: the single point of entry for generative-text calls.
///
/// No other module talks to the model endpoint directly. Callers depend on the
/// `LanguageModel` trait so the orchestrator can be exercised with a scripted model.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub mod mock;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response body could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response did not contain a candidate text")]
    MissingCandidate,
}

/// Sends a prompt to a generative-text model and returns its raw text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn send(&self, prompt: &str) -> Result<String, GatewayError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Gemini `generateContent` client. One POST per call, no retry.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        api_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            model,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn send(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_candidate_text(&raw)?;
        debug!(
            "Model call succeeded: prompt_chars={}, response_chars={}",
            prompt.len(),
            text.len()
        );
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a raw response body.
fn extract_candidate_text(raw: &str) -> Result<String, GatewayError> {
    let parsed: GenerateContentResponse = serde_json::from_str(raw)?;
    parsed
        .first_text()
        .map(str::to_owned)
        .ok_or(GatewayError::MissingCandidate)
}

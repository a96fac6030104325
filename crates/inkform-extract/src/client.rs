//! Async client for the generative text-extraction service.
//!
//! Speaks the OpenAI-compatible chat-completions wire format, which covers
//! the hosted inference endpoints we deploy against. The reconstructed layout
//! grid goes in as the user message; the system prompt pins the two response
//! sections the parser expects.
//!
//! Large-context generation is slow, so the per-request timeout defaults to
//! 120 seconds. The call is the pipeline's only high-latency suspension point
//! and must not block concurrent document pipelines - it is plain async I/O
//! on the shared reqwest client.

use crate::telemetry::{ExtractionSpan, TelemetrySink};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Extraction-service call errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The request never completed (connection refused, DNS, TLS, ...)
    #[error("extraction request failed: {0}")]
    Request(reqwest::Error),

    /// The service answered with a non-success status
    #[error("extraction service error ({status}): {body}")]
    Status {
        /// HTTP status code returned by the service
        status: reqwest::StatusCode,
        /// Response body, for the error report
        body: String,
    },

    /// The reply did not match the chat-completions shape
    #[error("malformed extraction reply: {0}")]
    MalformedReply(String),

    /// The bounded timeout elapsed
    #[error("extraction timed out after {0} seconds")]
    Timeout(u64),
}

/// Configuration for the extraction client.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// Bearer token for the service
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Generation cap
    pub max_tokens: u32,
    /// Sampling temperature (low: the task is transcription, not creativity)
    pub temperature: f64,
}

impl Default for ExtractionConfig {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "Qwen/Qwen2.5-7B-Instruct".to_string(),
            timeout: Duration::from_secs(120),
            max_tokens: 1024,
            temperature: 0.1,
        }
    }
}

impl ExtractionConfig {
    /// Build a config from the environment.
    ///
    /// Reads `INKFORM_API_KEY`, and optionally `INKFORM_EXTRACT_URL` and
    /// `INKFORM_EXTRACT_MODEL`; everything else keeps its default.
    #[must_use = "returns the environment-derived config"]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("INKFORM_API_KEY") {
            config.api_key = key;
        }
        if let Ok(url) = std::env::var("INKFORM_EXTRACT_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("INKFORM_EXTRACT_MODEL") {
            config.model = model;
        }
        config
    }
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Chat-completions response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// HTTP client for the extraction service.
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    client: Client,
    config: ExtractionConfig,
}

impl ExtractionClient {
    /// Create a new client with the given configuration.
    #[must_use = "creates the extraction client"]
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Model identifier this client is configured for.
    #[inline]
    #[must_use = "returns the configured model identifier"]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send the layout context to the service and return its free text.
    ///
    /// The telemetry sink, when present, receives one span per call and is
    /// otherwise ignored - the core passes it through opaquely.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractError`] when the request fails, times out, the
    /// service answers non-2xx, or the reply has no choices.
    pub async fn extract(
        &self,
        context: &str,
        telemetry: Option<&dyn TelemetrySink>,
    ) -> Result<String, ExtractError> {
        let start = Instant::now();

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: EXTRACTION_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: format!("Extract all data from this form:\n\n{context}"),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            model = %self.config.model,
            context_chars = context.len(),
            "invoking extraction service"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Status { status, body });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::MalformedReply(e.to_string()))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ExtractError::MalformedReply("reply has no choices".to_string()))?;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(latency_ms, reply_chars = content.len(), "extraction complete");

        if let Some(sink) = telemetry {
            sink.record(&ExtractionSpan {
                model: self.config.model.clone(),
                latency_ms,
                context_chars: context.chars().count(),
                input_tokens: reply.usage.as_ref().map(|u| u.prompt_tokens),
                output_tokens: reply.usage.as_ref().map(|u| u.completion_tokens),
            });
        }

        Ok(content)
    }

    fn classify(&self, error: reqwest::Error) -> ExtractError {
        if error.is_timeout() {
            ExtractError::Timeout(self.config.timeout.as_secs())
        } else {
            ExtractError::Request(error)
        }
    }
}

/// System prompt pinning the response shape the parser expects.
const EXTRACTION_PROMPT: &str = r#"You are an expert OCR assistant specialized in reading handwritten forms with maximum accuracy.

The user message contains a character grid reconstructing the physical layout of a scanned form: horizontal position in the grid approximates horizontal position on the page.

Respond with exactly two sections:

### PHYSICAL_LAYOUT_RECONSTRUCTION
A markdown table approximating the form's visual layout.

### STRUCTURED_DATABASE_JSON
A single JSON object with the extracted data.

RULES:
1. Only extract what is clearly present - never invent fields
2. Read numbers, names, and addresses character by character
3. For partially readable text, extract what you can see; mark illegible values as "unreadable"
4. Derive JSON field names from the actual labels and headings on the form
5. Preserve the logical grouping of information as JSON nesting
6. The JSON section must contain valid JSON and nothing else"#;

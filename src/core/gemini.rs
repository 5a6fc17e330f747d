//! Streaming client for the Gemini `streamGenerateContent` endpoint.

use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::str::Utf8Error;

use async_trait::async_trait;
use futures_util::{stream, Stream, StreamExt};
use tracing::debug;

use crate::api::{Content, GenerateContentRequest, GenerateContentResponse};
use crate::core::chat_stream::{ChatBackend, FragmentStream};
use crate::core::error::ConnectionError;
use crate::core::sse::{extract_data_payload, SseLineBuffer};
use crate::utils::url::stream_generate_url;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Everything the client needs, resolved once at startup.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub system_instruction: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("system_instruction_len", &self.system_instruction.len())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn build_request(&self, context: Vec<Content>, message: String) -> GenerateContentRequest {
        let system_instruction = if self.config.system_instruction.trim().is_empty() {
            None
        } else {
            Some(Content::instruction(self.config.system_instruction.as_str()))
        };

        let mut contents = context;
        contents.push(Content::user(message));

        GenerateContentRequest {
            system_instruction,
            contents,
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn stream_response(
        &self,
        context: Vec<Content>,
        message: String,
    ) -> Result<FragmentStream, ConnectionError> {
        let url = stream_generate_url(&self.config.base_url, &self.config.model);
        let body = self.build_request(context, message);
        debug!(model = %self.config.model, turns = body.contents.len(), "sending request");

        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ConnectionError::Status {
                status,
                message: summarize_api_error(&error_text),
            });
        }

        Ok(fragment_stream(response.bytes_stream()))
    }
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    lines: SseLineBuffer,
    ready: VecDeque<Result<String, ConnectionError>>,
    finished: bool,
}

impl<S> DecodeState<S> {
    fn handle_line(&mut self, line: Result<String, Utf8Error>) {
        if self.finished {
            return;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                self.fail(ConnectionError::Malformed(format!("invalid UTF-8 in stream: {e}")));
                return;
            }
        };
        let Some(payload) = extract_data_payload(&line) else {
            return;
        };
        match decode_payload(payload) {
            Payload::Fragment(text) => self.ready.push_back(Ok(text)),
            Payload::Empty => {}
            Payload::Done => self.finished = true,
            Payload::Failed(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: ConnectionError) {
        self.ready.push_back(Err(err));
        self.finished = true;
    }
}

/// Turns a raw SSE byte stream into reply fragments. After the first error
/// the stream yields nothing more.
pub(crate) fn fragment_stream<S, B, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        lines: SseLineBuffer::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.ready.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for line in state.lines.push(chunk.as_ref()) {
                        state.handle_line(line);
                    }
                }
                Some(Err(err)) => state.fail(ConnectionError::Interrupted(err.to_string())),
                None => {
                    if let Some(line) = state.lines.finish() {
                        state.handle_line(line);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

const NORMAL_FINISH_REASONS: [&str; 2] = ["STOP", "MAX_TOKENS"];

#[derive(Debug, PartialEq)]
enum Payload {
    Fragment(String),
    Empty,
    Done,
    Failed(ConnectionError),
}

fn decode_payload(payload: &str) -> Payload {
    let payload = payload.trim();
    if payload.is_empty() {
        return Payload::Empty;
    }
    if payload == "[DONE]" {
        return Payload::Done;
    }

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => return Payload::Failed(ConnectionError::Malformed(summarize_api_error(payload))),
    };

    if value.get("error").is_some() {
        return Payload::Failed(ConnectionError::Provider(summarize_api_error(payload)));
    }

    let response: GenerateContentResponse = match serde_json::from_value(value) {
        Ok(response) => response,
        Err(e) => return Payload::Failed(ConnectionError::Malformed(e.to_string())),
    };

    if let Some(reason) = response.block_reason() {
        return Payload::Failed(ConnectionError::Blocked(reason.to_string()));
    }

    let text = response.text();
    if let Some(reason) = response.finish_reason() {
        debug!(finish_reason = reason, "candidate finished");
        // A refusal arrives as a finish reason on a candidate with no text.
        if text.is_empty() && !NORMAL_FINISH_REASONS.contains(&reason) {
            return Payload::Failed(ConnectionError::Blocked(reason.to_string()));
        }
    }

    if text.is_empty() {
        Payload::Empty
    } else {
        Payload::Fragment(text)
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    // The streaming endpoint wraps error bodies in a one-element array.
    let value = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };

    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// One-line description of an error body, for logs and error values.
pub(crate) fn summarize_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Claude Messages API client with tool use.
//
// Tool-enabled turns need complete `tool_use` blocks before anything can
// be dispatched, so responses are consumed as whole messages rather than
// an event stream. Content blocks are parsed leniently from the response
// JSON; unknown block types are skipped.

use serde_json::Value;
use tracing::debug;

use crate::config::Config;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One content block from an assistant message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
}

/// A parsed assistant message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

impl MessageResponse {
    /// All text blocks concatenated, in order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All tool-use blocks, in order.
    pub fn tool_uses(&self) -> Vec<&ContentBlock> {
        self.content
            .iter()
            .filter(|block| matches!(block, ContentBlock::ToolUse { .. }))
            .collect()
    }

    /// The assistant content blocks re-serialized for the conversation
    /// history, so tool results can reference their `tool_use` ids.
    pub fn content_json(&self) -> Value {
        let blocks: Vec<Value> = self
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => serde_json::json!({
                    "type": "text",
                    "text": text,
                }),
                ContentBlock::ToolUse { id, name, input } => serde_json::json!({
                    "type": "tool_use",
                    "id": id,
                    "name": name,
                    "input": input,
                }),
            })
            .collect();
        Value::Array(blocks)
    }
}

// ---------------------------------------------------------------------------
// ClaudeClient
// ---------------------------------------------------------------------------

/// Low-level Claude API client.
pub struct ClaudeClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ClaudeClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: ANTHROPIC_API_URL.to_string(),
            api_key,
            model,
        }
    }

    /// Point the client at a different Messages endpoint. Used by tests
    /// that stand in a local mock server for the API.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Send one request to the Messages API and parse the reply.
    ///
    /// `tools` may be empty, in which case no tool definitions are sent and
    /// the model has to answer in prose.
    pub async fn send_message(
        &self,
        system: &str,
        messages: &[Value],
        tools: &[Value],
        max_tokens: u32,
    ) -> anyhow::Result<MessageResponse> {
        if self.api_key.is_empty() {
            anyhow::bail!("API key not configured");
        }

        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "system": system,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.to_vec());
        }

        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await?;
        if !status.is_success() {
            let message = payload
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            anyhow::bail!("API returned status {status}: {message}");
        }

        let parsed = parse_message(&payload);
        debug!(
            blocks = parsed.content.len(),
            stop_reason = ?parsed.stop_reason,
            "assistant message received"
        );
        Ok(parsed)
    }
}

// ---------------------------------------------------------------------------
// LlmClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that is either an active Claude client or disabled.
pub enum LlmClient {
    /// Claude API is configured and ready.
    Active(ClaudeClient),
    /// LLM functionality is disabled (no API key configured).
    Disabled,
}

impl LlmClient {
    /// Build an `LlmClient` from the application config.
    ///
    /// Returns `Active` if an API key is present in credentials, otherwise
    /// `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match &config.credentials.anthropic_api_key {
            Some(key) if !key.is_empty() => {
                let model = config.llm.model.clone();
                LlmClient::Active(ClaudeClient::new(key.clone(), model))
            }
            _ => LlmClient::Disabled,
        }
    }

    pub async fn send_message(
        &self,
        system: &str,
        messages: &[Value],
        tools: &[Value],
        max_tokens: u32,
    ) -> anyhow::Result<MessageResponse> {
        match self {
            LlmClient::Active(client) => {
                client.send_message(system, messages, tools, max_tokens).await
            }
            LlmClient::Disabled => anyhow::bail!("LLM not configured"),
        }
    }
}

// ---------------------------------------------------------------------------
// Response JSON parsing helpers
// ---------------------------------------------------------------------------

/// Parse a Messages API response body into content blocks and stop reason.
///
/// Expected shape: `{ "content": [ {"type": "text"|"tool_use", ...} ],
/// "stop_reason": "end_turn"|"tool_use"|... }`. Unknown block types are
/// skipped rather than failing the whole message.
pub(crate) fn parse_message(payload: &Value) -> MessageResponse {
    let content = payload
        .get("content")
        .and_then(|c| c.as_array())
        .map(|blocks| blocks.iter().filter_map(parse_content_block).collect())
        .unwrap_or_default();
    let stop_reason = payload
        .get("stop_reason")
        .and_then(|s| s.as_str())
        .map(String::from);
    MessageResponse { content, stop_reason }
}

fn parse_content_block(block: &Value) -> Option<ContentBlock> {
    match block.get("type")?.as_str()? {
        "text" => Some(ContentBlock::Text {
            text: block.get("text")?.as_str()?.to_string(),
        }),
        "tool_use" => Some(ContentBlock::ToolUse {
            id: block.get("id")?.as_str()?.to_string(),
            name: block.get("name")?.as_str()?.to_string(),
            input: block.get("input").cloned().unwrap_or(Value::Null),
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

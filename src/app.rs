// Conversation orchestration: the bounded agent/tool loop.
//
// Each user turn runs at most `max_tool_rounds` tool-calling rounds. While
// rounds remain, the model receives the tool declarations and may answer
// with `tool_use` blocks; every requested call is dispatched and the
// results are appended to the conversation before the next round. Once the
// ceiling is reached the request goes out without tools, forcing a final
// prose answer. The counter is explicit state in the loop, not a property
// of the model.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::Config;
use crate::llm::client::{ContentBlock, LlmClient};
use crate::llm::prompt;
use crate::tools::dispatch::ToolDispatcher;
use crate::tools::tool_definitions;

pub struct Agent {
    llm: LlmClient,
    dispatcher: ToolDispatcher,
    system: String,
    max_tokens: u32,
    max_tool_rounds: usize,
}

impl Agent {
    pub fn new(llm: LlmClient, dispatcher: ToolDispatcher, config: &Config) -> Self {
        Self {
            llm,
            dispatcher,
            system: prompt::system_prompt(),
            max_tokens: config.llm.max_tokens,
            max_tool_rounds: config.llm.max_tool_rounds,
        }
    }

    /// Run one user turn to completion and return the assistant's final
    /// prose answer. `history` accumulates the full conversation, including
    /// tool calls and results, and is reused across turns.
    pub async fn run_turn(
        &self,
        history: &mut Vec<Value>,
        user_input: &str,
    ) -> anyhow::Result<String> {
        history.push(json!({ "role": "user", "content": user_input }));

        let definitions = tool_definitions();
        let mut rounds = 0usize;

        loop {
            let tools: &[Value] = if rounds < self.max_tool_rounds {
                &definitions
            } else {
                debug!("tool round ceiling reached, requesting final answer");
                &[]
            };

            let response = self
                .llm
                .send_message(&self.system, history, tools, self.max_tokens)
                .await?;

            let tool_uses = response.tool_uses();
            let wants_tools =
                response.stop_reason.as_deref() == Some("tool_use") && !tool_uses.is_empty();

            if !wants_tools || rounds >= self.max_tool_rounds {
                let text = response.text();
                history.push(json!({ "role": "assistant", "content": text }));
                return Ok(text);
            }

            rounds += 1;
            info!(round = rounds, calls = tool_uses.len(), "executing tool round");

            let mut results = Vec::with_capacity(tool_uses.len());
            for block in &tool_uses {
                if let ContentBlock::ToolUse { id, name, input } = block {
                    let output = self.dispatcher.execute(name, input).await;
                    results.push(tool_result_block(id, output));
                }
            }

            history.push(json!({ "role": "assistant", "content": response.content_json() }));
            history.push(json!({ "role": "user", "content": results }));
        }
    }
}

/// Wrap one tool output as a `tool_result` content block. String outputs
/// (error and not-found messages) pass through verbatim; structured
/// outputs are serialized as JSON text.
fn tool_result_block(tool_use_id: &str, output: Value) -> Value {
    let content = match output {
        Value::String(message) => message,
        other => other.to_string(),
    };
    json!({
        "type": "tool_result",
        "tool_use_id": tool_use_id,
        "content": content,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::{CredentialsConfig, LlmConfig, ProviderConfig};
    use crate::provider::mock::MockProvider;

    fn test_config() -> Config {
        Config {
            provider: ProviderConfig {
                base_url: "https://api.example.com/v1".into(),
                enable_mocks: true,
                timeout_secs: 15,
            },
            llm: LlmConfig {
                model: "test".into(),
                max_tokens: 512,
                max_tool_rounds: 3,
            },
            credentials: CredentialsConfig::default(),
        }
    }

    // -- tool_result block shape --

    #[test]
    fn string_output_passes_through_verbatim() {
        let block = tool_result_block("toolu_1", Value::String("No players found.".into()));
        assert_eq!(block["type"], "tool_result");
        assert_eq!(block["tool_use_id"], "toolu_1");
        assert_eq!(block["content"], "No players found.");
    }

    #[test]
    fn structured_output_serialized_as_json_text() {
        let block = tool_result_block("toolu_2", json!({ "playerInfo": { "name": "L. Messi" } }));
        let content = block["content"].as_str().unwrap();
        assert!(content.starts_with('{'));
        assert!(content.contains("L. Messi"));
    }

    // -- the tool-round ceiling forces a final no-tools request --

    /// Read one full HTTP request (headers plus content-length body).
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        use tokio::io::AsyncReadExt;

        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_lowercase();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    #[tokio::test]
    async fn tool_hungry_model_forced_to_prose_after_round_ceiling() {
        use tokio::io::AsyncWriteExt;
        use tokio::net::TcpListener;

        use crate::llm::client::ClaudeClient;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // A model that answers every request with a tool_use block. With
        // max_tool_rounds = 3 the agent issues 3 tool rounds plus one final
        // request; only the final one may omit the tool definitions.
        let server = tokio::spawn(async move {
            let mut sent_tools = Vec::new();
            for _ in 0..4 {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                sent_tools.push(request.contains("\"tools\""));

                let body = json!({
                    "content": [
                        { "type": "text", "text": "Here is the analysis." },
                        { "type": "tool_use", "id": "toolu_1", "name": "analyze",
                          "input": { "playerId": 1 } }
                    ],
                    "stop_reason": "tool_use"
                })
                .to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.flush().await.unwrap();
            }
            sent_tools
        });

        let config = test_config();
        let client = ClaudeClient::new("sk-ant-test".into(), "test".into())
            .with_api_url(format!("http://{addr}"));
        let dispatcher = ToolDispatcher::new(Arc::new(MockProvider::new()));
        let agent = Agent::new(LlmClient::Active(client), dispatcher, &config);

        let mut history = Vec::new();
        let answer = agent.run_turn(&mut history, "Analyze Messi").await.unwrap();
        assert_eq!(answer, "Here is the analysis.");

        let sent_tools = server.await.unwrap();
        assert_eq!(sent_tools, vec![true, true, true, false]);

        // 3 tool rounds recorded as assistant content + tool results, then
        // the final prose answer.
        assert_eq!(history.last().unwrap()["role"], "assistant");
        assert_eq!(history.last().unwrap()["content"], "Here is the analysis.");
    }

    // -- disabled LLM fails the turn without touching history state --

    #[tokio::test]
    async fn disabled_llm_errors_and_keeps_user_message() {
        let config = test_config();
        let dispatcher = ToolDispatcher::new(Arc::new(MockProvider::new()));
        let agent = Agent::new(LlmClient::Disabled, dispatcher, &config);

        let mut history = Vec::new();
        let err = agent
            .run_turn(&mut history, "How good is Messi?")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "LLM not configured");

        // The user message is recorded; no assistant message was fabricated.
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["role"], "user");
    }
}

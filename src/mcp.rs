//! JSON-RPC client for the external code-execution/grading service ("MCP").
//!
//! Every call is a `tools/call` request; the service runs the tool and hands
//! back a content payload we pass through mostly untouched. Calls are
//! instrumented and log tool names, latencies, and response sizes (not
//! contents). We never log candidate code.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, instrument};
use uuid::Uuid;

const DEFAULT_MCP_URL: &str = "https://api.stratascratch.com/mcp";

/// Tool failure split by blame: `Upstream` is the service rejecting the call
/// (reported as a client error), `Transport` is our side failing to reach or
/// decode it (reported as a bad gateway).
#[derive(Debug)]
pub enum McpError {
  Upstream(String),
  Transport(String),
}

impl std::fmt::Display for McpError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      McpError::Upstream(m) => write!(f, "MCP error: {}", m),
      McpError::Transport(m) => write!(f, "MCP transport error: {}", m),
    }
  }
}

/// Map a frontend language string to the service's `code_type` integer:
/// 1 = SQL, 2 = Python. Anything unrecognized falls back to SQL, matching the
/// service's default.
pub fn code_type_for(language: &str) -> i64 {
  if language.eq_ignore_ascii_case("python") { 2 } else { 1 }
}

#[derive(Clone)]
pub struct McpClient {
  client: reqwest::Client,
  pub base_url: String,
}

impl McpClient {
  /// Build the client; MCP_BASE_URL env wins over the TOML override.
  pub fn new(base_url_override: Option<String>) -> Result<Self, String> {
    let base_url = std::env::var("MCP_BASE_URL")
      .ok()
      .or(base_url_override)
      .unwrap_or_else(|| DEFAULT_MCP_URL.into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .map_err(|e| format!("Failed to build MCP HTTP client: {}", e))?;

    Ok(Self { client, base_url })
  }

  /// One JSON-RPC `tools/call` round-trip. Returns `result.content` (or `{}`
  /// when the service omits it).
  #[instrument(level = "info", skip(self, arguments), fields(%tool, url = %self.base_url))]
  pub async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, McpError> {
    let req = RpcRequest {
      jsonrpc: "2.0",
      id: Uuid::new_v4().to_string(),
      method: "tools/call",
      params: RpcParams { name: tool, arguments },
    };

    let start = std::time::Instant::now();
    let res = self
      .client
      .post(&self.base_url)
      .header(ACCEPT, "application/json, text/event-stream")
      .header(CONTENT_TYPE, "application/json")
      .header(USER_AGENT, "interview-backend/0.1")
      .json(&req)
      .send()
      .await
      .map_err(|e| McpError::Transport(e.to_string()))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| McpError::Transport(e.to_string()))?;
    if !status.is_success() {
      error!(target: "interview_backend", %tool, %status, "MCP HTTP failure");
      return Err(McpError::Transport(format!("MCP HTTP {}", status)));
    }

    let parsed: RpcResponse =
      serde_json::from_str(&body).map_err(|e| McpError::Transport(format!("Invalid MCP response: {}", e)))?;

    if let Some(err) = parsed.error {
      error!(target: "interview_backend", %tool, error = %err.message, "MCP tool call rejected");
      return Err(McpError::Upstream(err.message));
    }

    let content = parsed.result.and_then(|r| r.content).unwrap_or_else(|| json!({}));
    info!(
      target: "interview_backend",
      %tool,
      elapsed_ms = start.elapsed().as_millis() as u64,
      response_bytes = body.len(),
      "MCP tool call ok"
    );
    Ok(content)
  }

  /// Execute candidate code without scoring.
  pub async fn run_code(&self, code: &str, language: &str, question_id: i64) -> Result<Value, McpError> {
    self
      .call_tool(
        "run_code",
        json!({ "code": code, "code_type": code_type_for(language), "question_id": question_id }),
      )
      .await
  }

  /// Grade a submitted solution.
  pub async fn check_solution(&self, code: &str, language: &str, question_id: i64) -> Result<Value, McpError> {
    self
      .call_tool(
        "check_solution",
        json!({ "code": code, "code_type": code_type_for(language), "question_id": question_id }),
      )
      .await
  }

  /// Fetch table schema + sample rows for a dataset.
  pub async fn dataset_details(
    &self,
    dataset_name: &str,
    question_id: i64,
    code_type: i64,
  ) -> Result<Value, McpError> {
    self
      .call_tool(
        "get_datasets_details",
        json!({ "question_id": question_id, "code_type": code_type, "dataset_name": dataset_name }),
      )
      .await
  }
}

/// Dig the useful payload out of a tool-call content value: the service wraps
/// results in an array of `{type, text}` blocks where the text block usually
/// carries serialized JSON. Falls back to the raw value when the shape is
/// anything else.
pub fn extract_text_content(content: &Value) -> Value {
  if let Some(blocks) = content.as_array() {
    for block in blocks {
      if block.get("type").and_then(Value::as_str) == Some("text") {
        if let Some(text) = block.get("text").and_then(Value::as_str) {
          return serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        }
      }
    }
  }
  content.clone()
}

// --- JSON-RPC DTOs ---

#[derive(Serialize)]
struct RpcRequest<'a> {
  jsonrpc: &'static str,
  id: String,
  method: &'static str,
  params: RpcParams<'a>,
}
#[derive(Serialize)]
struct RpcParams<'a> {
  name: &'a str,
  arguments: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
  #[serde(default)]
  result: Option<RpcResult>,
  #[serde(default)]
  error: Option<RpcError>,
}
#[derive(Deserialize)]
struct RpcResult {
  #[serde(default)]
  content: Option<Value>,
}
#[derive(Deserialize)]
struct RpcError {
  message: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn code_type_maps_python_to_2_and_everything_else_to_1() {
    assert_eq!(code_type_for("python"), 2);
    assert_eq!(code_type_for("Python"), 2);
    assert_eq!(code_type_for("sql"), 1);
    assert_eq!(code_type_for("postgres"), 1);
    assert_eq!(code_type_for(""), 1);
  }

  #[test]
  fn request_envelope_has_jsonrpc_shape() {
    let req = RpcRequest {
      jsonrpc: "2.0",
      id: "abc".into(),
      method: "tools/call",
      params: RpcParams { name: "run_code", arguments: json!({ "code_type": 1 }) },
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["jsonrpc"], "2.0");
    assert_eq!(v["method"], "tools/call");
    assert_eq!(v["params"]["name"], "run_code");
    assert_eq!(v["params"]["arguments"]["code_type"], 1);
  }

  #[test]
  fn rpc_error_wins_over_result() {
    let parsed: RpcResponse =
      serde_json::from_str(r#"{"error":{"code":-32000,"message":"bad code"}}"#).unwrap();
    assert_eq!(parsed.error.unwrap().message, "bad code");

    let parsed: RpcResponse =
      serde_json::from_str(r#"{"result":{"content":[{"type":"text","text":"{}"}]}}"#).unwrap();
    assert!(parsed.error.is_none());
    assert!(parsed.result.unwrap().content.is_some());
  }

  #[test]
  fn text_block_with_json_is_parsed() {
    let content = json!([{ "type": "text", "text": "{\"rows\": [[1, 2]]}" }]);
    let out = extract_text_content(&content);
    assert_eq!(out["rows"][0][1], 2);
  }

  #[test]
  fn text_block_with_plain_text_stays_a_string() {
    let content = json!([{ "type": "image" }, { "type": "text", "text": "syntax error near WHERE" }]);
    let out = extract_text_content(&content);
    assert_eq!(out, Value::String("syntax error near WHERE".into()));
  }

  #[test]
  fn non_array_content_passes_through() {
    let content = json!({ "columns": ["id"] });
    assert_eq!(extract_text_content(&content), content);
  }
}

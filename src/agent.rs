//! Client for the hosted interview-agent runtime.
//!
//! The agent is a Responses-API workflow carrying our interviewer
//! instructions plus a hosted MCP tool descriptor, so tool execution
//! (run_code / check_solution / schema lookups) happens inside the runtime
//! and we get back formatted feedback text. Calls log model, latencies and
//! sizes, never candidate code or the API key.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::protocol::AgentContext;
use crate::util::fill_template;

/// Build the message handed to the agent from the candidate's free text plus
/// the action context. Unknown actions fall through to the raw message.
pub fn build_agent_message(message: &str, context: &AgentContext, prompts: &Prompts) -> String {
  let pairs = [
    ("question_id", context.question_id.as_str()),
    ("language", context.language.as_str()),
    ("code", context.code.as_str()),
    ("message", message),
  ];
  match context.action.as_str() {
    "test" => fill_template(&prompts.test_template, &pairs),
    "submit" => fill_template(&prompts.submit_template, &pairs),
    "hint" => fill_template(&prompts.hint_template, &pairs),
    "question" => fill_template(&prompts.question_template, &pairs),
    _ => message.to_string(),
  }
}

#[derive(Clone)]
pub struct AgentClient {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
  pub workflow_id: String,
  mcp_server_url: String,
}

impl AgentClient {
  /// Construct the client if we find AGENT_API_KEY; otherwise return None and
  /// the routes fall back to direct MCP calls.
  pub fn from_env(mcp_server_url: &str) -> Option<Self> {
    let api_key = std::env::var("AGENT_API_KEY").ok()?;
    let base_url =
      std::env::var("AGENT_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("AGENT_MODEL").unwrap_or_else(|_| "gpt-5.2".into());
    let workflow_id = std::env::var("WORKFLOW_ID").unwrap_or_default();

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model, workflow_id, mcp_server_url: mcp_server_url.to_string() })
  }

  /// One agent round-trip: instructions + message + hosted MCP tool. Returns
  /// the agent's formatted reply text.
  #[instrument(level = "info", skip(self, prompts, message, context), fields(model = %self.model, action = %context.action, message_len = message.len()))]
  pub async fn call(
    &self,
    prompts: &Prompts,
    message: &str,
    context: &AgentContext,
  ) -> Result<String, String> {
    let input = build_agent_message(message, context, prompts);
    let url = format!("{}/responses", self.base_url);

    let req = ResponsesRequest {
      model: self.model.clone(),
      instructions: prompts.agent_instructions.clone(),
      input,
      tools: vec![hosted_mcp_tool(&self.mcp_server_url)],
      metadata: Metadata {
        workflow_id: self.workflow_id.clone(),
        action: context.action.clone(),
      },
    };

    let start = std::time::Instant::now();
    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "interview-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_api_error(&body).unwrap_or(body);
      error!(target: "interview_backend", %status, error = %crate::util::trunc_for_log(&msg, 300), "Agent HTTP failure");
      return Err(format!("Agent HTTP {}: {}", status, msg));
    }

    let body: ResponsesResponse = res.json().await.map_err(|e| e.to_string())?;
    let text = body.output_text();
    if text.is_empty() {
      return Err("Agent returned no output".into());
    }

    info!(
      target: "interview_backend",
      elapsed_ms = start.elapsed().as_millis() as u64,
      reply_len = text.len(),
      "Agent reply received"
    );
    Ok(text)
  }
}

/// Hosted MCP tool descriptor, mirroring the agent-builder workflow: the
/// runtime connects to the grading service itself and auto-approves calls.
fn hosted_mcp_tool(server_url: &str) -> Tool {
  Tool {
    r#type: "mcp".into(),
    server_label: "Strata_Tools".into(),
    server_description: "Code execution and grading tools".into(),
    server_url: server_url.to_string(),
    allowed_tools: vec![
      "check_solution".into(),
      "get_datasets_details".into(),
      "get_educational_questions".into(),
      "run_code".into(),
    ],
    require_approval: "never".into(),
  }
}

// --- Responses-API DTOs ---

#[derive(Serialize)]
struct ResponsesRequest {
  model: String,
  instructions: String,
  input: String,
  tools: Vec<Tool>,
  metadata: Metadata,
}

#[derive(Serialize)]
struct Tool {
  r#type: String,
  server_label: String,
  server_description: String,
  server_url: String,
  allowed_tools: Vec<String>,
  require_approval: String,
}

#[derive(Serialize)]
struct Metadata {
  workflow_id: String,
  action: String,
}

#[derive(Deserialize)]
struct ResponsesResponse {
  #[serde(default)]
  output: Vec<OutputItem>,
}
#[derive(Deserialize)]
struct OutputItem {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  content: Vec<ContentPart>,
}
#[derive(Deserialize)]
struct ContentPart {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  text: String,
}

impl ResponsesResponse {
  /// Concatenate the output_text parts of message items.
  fn output_text(&self) -> String {
    let mut out = String::new();
    for item in &self.output {
      if item.kind != "message" {
        continue;
      }
      for part in &item.content {
        if part.kind == "output_text" {
          out.push_str(&part.text);
        }
      }
    }
    out.trim().to_string()
  }
}

/// Try to extract a clean error message from the runtime's error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ctx(action: &str) -> AgentContext {
    AgentContext {
      action: action.into(),
      question_id: "2010".into(),
      code: "SELECT 1".into(),
      language: "sql".into(),
    }
  }

  #[test]
  fn test_action_builds_a_run_code_request() {
    let msg = build_agent_message("", &ctx("test"), &Prompts::default());
    assert!(msg.starts_with("TEST CODE REQUEST"));
    assert!(msg.contains("Question ID: 2010"));
    assert!(msg.contains("```sql\nSELECT 1\n```"));
    assert!(msg.contains("run_code"));
  }

  #[test]
  fn submit_action_asks_for_grading() {
    let msg = build_agent_message("", &ctx("submit"), &Prompts::default());
    assert!(msg.starts_with("SUBMIT SOLUTION REQUEST"));
    assert!(msg.contains("check_solution"));
  }

  #[test]
  fn hint_and_question_embed_the_candidate_message() {
    let msg = build_agent_message("what does the orders table hold?", &ctx("question"), &Prompts::default());
    assert!(msg.starts_with("CLARIFICATION REQUEST"));
    assert!(msg.contains("what does the orders table hold?"));

    let msg = build_agent_message("stuck on the join", &ctx("hint"), &Prompts::default());
    assert!(msg.starts_with("HINT REQUEST"));
    assert!(msg.contains("stuck on the join"));
  }

  #[test]
  fn unknown_action_passes_the_message_through() {
    let msg = build_agent_message("hello", &ctx("other"), &Prompts::default());
    assert_eq!(msg, "hello");
  }

  #[test]
  fn responses_output_text_joins_message_parts() {
    let body: ResponsesResponse = serde_json::from_str(
      r#"{"output":[
        {"type":"mcp_call","content":[]},
        {"type":"message","content":[{"type":"output_text","text":"Score: 100/100"}]}
      ]}"#,
    )
    .unwrap();
    assert_eq!(body.output_text(), "Score: 100/100");
  }

  #[test]
  fn hosted_tool_descriptor_serializes_expected_fields() {
    let v = serde_json::to_value(hosted_mcp_tool("https://mcp.example/mcp")).unwrap();
    assert_eq!(v["type"], "mcp");
    assert_eq!(v["server_url"], "https://mcp.example/mcp");
    assert_eq!(v["require_approval"], "never");
    assert!(v["allowed_tools"].as_array().unwrap().iter().any(|t| t == "run_code"));
  }
}

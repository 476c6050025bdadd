//! HTTP endpoint handlers. These are thin wrappers that reshape JSON between
//! the browser and the store / external services. Each handler is instrumented
//! and logs parameters and basic result info.
//!
//! Status mapping: upstream tool rejection -> 400, transport failure -> 502,
//! agent failure -> 500. Zero matched questions is a normal empty response.

use std::sync::Arc;

use axum::{
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::domain::Criteria;
use crate::mcp::{code_type_for, extract_text_content, McpError};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { status: "ok" })
}

#[instrument(level = "info", skip(state, body), fields(difficulty = ?body.difficulty, company = ?body.company, language = ?body.language))]
pub async fn http_post_questions(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuestionsIn>,
) -> Response {
  let count = body.question_count.unwrap_or(2);
  let criteria = Criteria {
    difficulty: body.difficulty.map(|s| s.to_lowercase()),
    company: body.company,
    language: body.language.map(|s| s.to_lowercase()),
    // Only free questions are served for now.
    is_premium: Some(false),
  };

  match state.store.sample(&criteria, count) {
    Ok(sampled) => {
      info!(target: "question_bank", requested = count, served = sampled.len(), "Questions served");
      let questions = sampled.iter().map(|q| to_out(q)).collect();
      Json(QuestionsOut { questions }).into_response()
    }
    Err(e) => {
      error!(target: "question_bank", error = %e, "Question sampling failed");
      (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorOut { error: e })).into_response()
    }
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.question_id, language = %body.language, code_len = body.code.len()))]
pub async fn http_post_run_code(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RunCodeIn>,
) -> Response {
  let question_id = match parse_question_id(&body.question_id) {
    Ok(id) => id,
    Err(resp) => return resp,
  };
  match state.mcp.run_code(&body.code, &body.language, question_id).await {
    Ok(content) => Json(content).into_response(),
    Err(e) => mcp_error_response(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.question_id, language = %body.language, code_len = body.code.len()))]
pub async fn http_post_check_solution(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CheckSolutionIn>,
) -> Response {
  let question_id = match parse_question_id(&body.question_id) {
    Ok(id) => id,
    Err(resp) => return resp,
  };
  match state.mcp.check_solution(&body.code, &body.language, question_id).await {
    Ok(content) => Json(content).into_response(),
    Err(e) => mcp_error_response(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(dataset = %body.dataset_name))]
pub async fn http_post_dataset_details(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DatasetDetailsIn>,
) -> Response {
  // Schema lookups tolerate a missing/garbled question id.
  let question_id = body
    .question_id
    .as_deref()
    .and_then(|s| s.trim().parse::<i64>().ok())
    .unwrap_or(0);
  let code_type = code_type_for(body.code_type.as_deref().unwrap_or(""));

  match state.mcp.dataset_details(&body.dataset_name, question_id, code_type).await {
    Ok(content) => Json(content).into_response(),
    Err(e) => mcp_error_response(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(action = body.context.as_ref().map(|c| c.action.as_str()).unwrap_or(""), message_len = body.message.len()))]
pub async fn http_post_agent_message(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AgentIn>,
) -> Response {
  let context = body.context.unwrap_or_default();
  let kind = if context.action == "test" { "test_result" } else { "submission_result" };

  if let Some(agent) = &state.agent {
    return match agent.call(&state.prompts, &body.message, &context).await {
      Ok(reply) => {
        info!(target: "interview_backend", action = %context.action, "Agent reply served");
        Json(AgentOut { kind: kind.into(), content: Value::String(reply) }).into_response()
      }
      Err(e) => {
        error!(target: "interview_backend", action = %context.action, error = %e, "Agent call failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(AgentOut { kind: "error".into(), content: Value::String(format!("Agent error: {}", e)) }),
        )
          .into_response()
      }
    };
  }

  // No hosted agent configured: drive the grading service directly for
  // test/submit. Hints and clarifications need the agent.
  let question_id = context.question_id.trim().parse::<i64>().unwrap_or(0);
  match context.action.as_str() {
    "test" => match state.mcp.run_code(&context.code, &context.language, question_id).await {
      Ok(content) => Json(AgentOut { kind: "test_result".into(), content: extract_text_content(&content) })
        .into_response(),
      Err(e) => agent_fallback_error(e),
    },
    "submit" => match state.mcp.check_solution(&context.code, &context.language, question_id).await {
      Ok(content) => {
        Json(AgentOut { kind: "submission_result".into(), content: extract_text_content(&content) })
          .into_response()
      }
      Err(e) => agent_fallback_error(e),
    },
    _ => Json(AgentOut {
      kind: "agent_response".into(),
      content: Value::String(
        "Agent integration not configured. Set AGENT_API_KEY to enable hints and clarifications.".into(),
      ),
    })
    .into_response(),
  }
}

fn parse_question_id(raw: &str) -> Result<i64, Response> {
  raw.trim().parse::<i64>().map_err(|_| {
    (
      StatusCode::BAD_REQUEST,
      Json(ErrorOut { error: format!("Invalid question_id: {}", raw) }),
    )
      .into_response()
  })
}

fn mcp_error_response(e: McpError) -> Response {
  match e {
    McpError::Upstream(m) => (StatusCode::BAD_REQUEST, Json(ErrorOut { error: m })).into_response(),
    McpError::Transport(m) => (StatusCode::BAD_GATEWAY, Json(ErrorOut { error: m })).into_response(),
  }
}

/// The direct-MCP fallback keeps the chat contract: errors come back as a
/// normal agent message of type "error" rather than an HTTP failure.
fn agent_fallback_error(e: McpError) -> Response {
  Json(AgentOut { kind: "error".into(), content: Value::String(format!("Error: {}", e)) }).into_response()
}

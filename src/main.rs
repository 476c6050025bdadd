//! Mock-Interview Backend
//!
//! - Axum HTTP API (question bank + MCP/agent pass-through)
//! - CSV question bank, preloaded at startup
//! - Optional hosted-agent integration (via environment variables)
//! - Static SPA fallback (./dist/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3001)
//!   QUESTIONS_CSV_PATH : path to the question bank CSV (default ./data/questions.csv)
//!   MCP_BASE_URL    : code execution/grading endpoint (default https://api.stratascratch.com/mcp)
//!   AGENT_API_KEY   : enables the hosted interview agent if present
//!   AGENT_BASE_URL  : default "https://api.openai.com/v1"
//!   AGENT_MODEL     : default "gpt-5.2"
//!   WORKFLOW_ID     : agent workflow id attached to trace metadata
//!   CONFIG_PATH     : path to TOML config (prompts + path/url overrides)
//!   LOG_LEVEL     : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT    : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod store;
mod state;
mod protocol;
mod mcp;
mod agent;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state. A missing/unreadable question bank is a
  // deployment error: fail startup loudly rather than serve empty results.
  let state = match AppState::new() {
    Ok(s) => Arc::new(s),
    Err(e) => {
      error!(target: "interview_backend", error = %e, "Startup failed: question bank unavailable");
      return Err(e.into());
    }
  };

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3001.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3001)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "interview_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}

//! Application state: the question bank, external-service clients, prompts.
//!
//! This module owns:
//!   - the CSV-backed `QuestionStore` (preloaded here, fatal if unreadable)
//!   - the MCP grading-service client
//!   - the optional hosted interview agent
//!
//! Built once at startup and handed to request handlers as an Arc; everything
//! inside is read-only after construction.

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::agent::AgentClient;
use crate::config::{load_config_from_env, Prompts};
use crate::domain::{Criteria, Difficulty};
use crate::mcp::McpClient;
use crate::store::QuestionStore;

pub struct AppState {
  pub store: QuestionStore,
  pub mcp: McpClient,
  pub agent: Option<AgentClient>,
  pub prompts: Prompts,
}

impl AppState {
  /// Build state from env: load config, preload the question bank, build the
  /// external-service clients. Fails when the bank cannot be read.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Result<Self, String> {
    // Load TOML config if provided (prompts + path/url overrides).
    let cfg_opt = load_config_from_env();
    let prompts = cfg_opt
      .as_ref()
      .map(|c| c.prompts.clone())
      .unwrap_or_default();

    let csv_path = std::env::var("QUESTIONS_CSV_PATH")
      .ok()
      .or_else(|| cfg_opt.as_ref().and_then(|c| c.questions_csv.clone()))
      .unwrap_or_else(|| "./data/questions.csv".into());

    let store = QuestionStore::new(&csv_path);
    let total = store.preload()?;
    info!(target: "question_bank", total, path = %csv_path, "Question bank preloaded");
    log_inventory(&store)?;

    let mcp = McpClient::new(cfg_opt.as_ref().and_then(|c| c.mcp_base_url.clone()))?;
    info!(target: "interview_backend", mcp_url = %mcp.base_url, "MCP grading service configured");

    let agent = AgentClient::from_env(&mcp.base_url);
    if let Some(a) = &agent {
      info!(target: "interview_backend", base_url = %a.base_url, model = %a.model, workflow_id = %a.workflow_id, "Interview agent enabled.");
    } else {
      info!(target: "interview_backend", "Interview agent disabled (no AGENT_API_KEY). Test/submit fall back to direct MCP calls.");
    }

    Ok(Self { store, mcp, agent, prompts })
  }
}

/// Startup inventory summary: question counts per difficulty, free vs premium.
fn log_inventory(store: &QuestionStore) -> Result<(), String> {
  let mut counts: HashMap<&'static str, (usize, usize)> = HashMap::new();
  for q in store.filter(&Criteria::default())? {
    let label = match q.difficulty {
      Some(Difficulty::Easy) => "easy",
      Some(Difficulty::Medium) => "medium",
      Some(Difficulty::Hard) => "hard",
      None => "unknown",
    };
    let entry = counts.entry(label).or_insert((0, 0));
    if q.is_premium { entry.1 += 1 } else { entry.0 += 1 }
  }
  for (difficulty, (free, premium)) in counts {
    info!(target: "question_bank", %difficulty, free, premium, "Startup question inventory");
  }
  Ok(())
}

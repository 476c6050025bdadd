//! Loading service configuration (agent prompts + path/url overrides) from TOML.
//!
//! See `AppConfig` and `Prompts` for the expected schema. Everything has a
//! default, so the service runs with no config file at all.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub questions_csv: Option<String>,
  #[serde(default)]
  pub mcp_base_url: Option<String>,
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts used by the hosted interview agent. Defaults match the production
/// agent workflow; override them in TOML to tune tone/structure.
/// Message templates accept `{question_id}`, `{language}`, `{code}` and
/// `{message}` placeholders.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub agent_instructions: String,
  pub test_template: String,
  pub submit_template: String,
  pub hint_template: String,
  pub question_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      agent_instructions: "\
You support candidates during technical interviews. Execute code, evaluate solutions, answer technical questions.

Available MCP tools:
1. run_code - test code without scoring (code, code_type: 1=SQL 2=Python, question_id). Use when the candidate clicks Test.
2. check_solution - grade a solution (same parameters). Use when the candidate clicks Submit.
3. get_datasets_details - table schemas (dataset_name, question_id, code_type). Use when the candidate asks about tables.

Rules:
- NEVER reveal solutions or write code for the candidate.
- Test = practice, Submit = scored.
- Format results as markdown tables; show errors clearly with the failing line.
- When grading, give a score out of 100 and concrete issues, without revealing the answer.
- For hints, guide thinking and suggest concepts only.
- Be concise, professional, supportive. No greetings; jump straight to results."
        .into(),
      test_template: "TEST CODE REQUEST\nQuestion ID: {question_id}\nLanguage: {language}\nCode:\n```{language}\n{code}\n```\n\nExecute this code using run_code tool and return formatted results.".into(),
      submit_template: "SUBMIT SOLUTION REQUEST\nQuestion ID: {question_id}\nLanguage: {language}\nCode:\n```{language}\n{code}\n```\n\nGrade this solution using check_solution tool and provide feedback.".into(),
      hint_template: "HINT REQUEST\nQuestion ID: {question_id}\n{message}\n\nProvide a strategic hint without revealing the solution.".into(),
      question_template: "CLARIFICATION REQUEST\nQuestion ID: {question_id}\n{message}\n\nAnswer the candidate's question about the problem.".into(),
    }
  }
}

/// Attempt to load `AppConfig` from CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "interview_backend", %path, "Loaded service config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "interview_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "interview_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_prompts_carry_placeholders() {
    let p = Prompts::default();
    assert!(p.test_template.contains("{question_id}"));
    assert!(p.test_template.contains("{code}"));
    assert!(p.submit_template.contains("check_solution"));
    assert!(p.hint_template.contains("{message}"));
    assert!(!p.agent_instructions.is_empty());
  }

  #[test]
  fn partial_toml_falls_back_to_defaults() {
    let cfg: AppConfig = toml::from_str(
      r#"
questions_csv = "/srv/bank.csv"
"#,
    )
    .unwrap();
    assert_eq!(cfg.questions_csv.as_deref(), Some("/srv/bank.csv"));
    assert!(cfg.mcp_base_url.is_none());
    assert!(cfg.prompts.question_template.contains("CLARIFICATION"));
  }

  #[test]
  fn prompts_can_be_overridden() {
    let cfg: AppConfig = toml::from_str(
      r#"
[prompts]
agent_instructions = "short"
test_template = "t {code}"
submit_template = "s"
hint_template = "h"
question_template = "q"
"#,
    )
    .unwrap();
    assert_eq!(cfg.prompts.agent_instructions, "short");
    assert_eq!(cfg.prompts.test_template, "t {code}");
  }
}

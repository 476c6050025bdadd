//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Question;

//
// Question bank
//

#[derive(Debug, Deserialize)]
pub struct QuestionsIn {
  pub difficulty: Option<String>,
  pub company: Option<String>,
  pub language: Option<String>,
  #[serde(rename = "questionCount")]
  pub question_count: Option<usize>,
}

/// DTO for one served question. Exposes both the original column names and the
/// aliases the frontend grew to expect (`title`/`question_short`,
/// `description`/`question`, `company`/`companies`, `topics`).
#[derive(Debug, Serialize)]
pub struct QuestionOut {
  pub id: String,
  pub slug: String,
  pub title: String,
  pub question_short: String,
  pub description: String,
  pub question: String,
  pub difficulty: String,
  pub company: String,
  pub companies: String,
  pub topics: String,
  pub tables: Option<Value>,
  pub interview_date: String,
  pub solution_postgres: String,
  pub solution_mysql: String,
  pub solution_python: String,
  pub hints_postgres: String,
  pub hints_python: String,
  pub walkthrough_postgres: String,
  pub walkthrough_python: String,
  pub is_freemium: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionsOut {
  pub questions: Vec<QuestionOut>,
}

/// Convert a bank record to the public DTO, filling the frontend's fallback
/// texts for blank columns.
pub fn to_out(q: &Question) -> QuestionOut {
  let title = if q.question_short.is_empty() { "Question".to_string() } else { q.question_short.clone() };
  let description =
    if q.question.is_empty() { "No description available".to_string() } else { q.question.clone() };
  let company = if q.companies.is_empty() { "N/A".to_string() } else { q.companies.clone() };

  QuestionOut {
    id: q.id.clone(),
    slug: q.id.clone(),
    title,
    question_short: q.question_short.clone(),
    description,
    question: q.question.clone(),
    difficulty: q.difficulty_raw.clone(),
    company,
    companies: q.companies.clone(),
    topics: q.job_positions.clone(),
    tables: q.tables.clone(),
    interview_date: q.interview_date.clone(),
    solution_postgres: q.solution_postgres.clone(),
    solution_mysql: q.solution_mysql.clone(),
    solution_python: q.solution_python.clone(),
    hints_postgres: q.hints_postgres.clone(),
    hints_python: q.hints_python.clone(),
    walkthrough_postgres: q.walkthrough_postgres.clone(),
    walkthrough_python: q.walkthrough_python.clone(),
    is_freemium: q.is_freemium.clone(),
  }
}

//
// Code execution / grading pass-through
//

#[derive(Debug, Deserialize)]
pub struct RunCodeIn {
  pub code: String,
  pub language: String,
  pub question_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckSolutionIn {
  pub code: String,
  pub question_id: String,
  pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct DatasetDetailsIn {
  pub dataset_name: String,
  pub question_id: Option<String>,
  pub code_type: Option<String>,
}

//
// Interview agent
//

#[derive(Debug, Deserialize)]
pub struct AgentIn {
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub context: Option<AgentContext>,
}

/// Context for an agent call: which question, the candidate's code, and the
/// action behind the click (test/submit/hint/question).
#[derive(Debug, Default, Deserialize)]
pub struct AgentContext {
  #[serde(default)]
  pub action: String,
  #[serde(default)]
  pub question_id: String,
  #[serde(default)]
  pub code: String,
  #[serde(default)]
  pub language: String,
}

#[derive(Debug, Serialize)]
pub struct AgentOut {
  #[serde(rename = "type")]
  pub kind: String,
  /// Formatted agent text, or structured tool output on the direct-MCP path.
  pub content: Value,
}

//
// Misc
//

#[derive(Serialize)]
pub struct HealthOut {
  pub status: &'static str,
}

#[derive(Serialize)]
pub struct ErrorOut {
  pub error: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Difficulty;

  fn record() -> Question {
    Question {
      id: "2010".into(),
      question_short: "Monthly orders".into(),
      question: "Count orders per month.".into(),
      difficulty: Some(Difficulty::Medium),
      difficulty_raw: "2".into(),
      companies: "Google, Meta".into(),
      job_positions: "Data Analyst".into(),
      interview_date: "2024-11".into(),
      tables: Some(serde_json::json!([1, 2])),
      solution_postgres: "SELECT 1".into(),
      solution_mysql: String::new(),
      solution_mssql: String::new(),
      solution_oracle: String::new(),
      solution_python: String::new(),
      solution_pyspark: String::new(),
      solution_r: String::new(),
      hints_postgres: "group by".into(),
      hints_python: String::new(),
      walkthrough_postgres: String::new(),
      walkthrough_python: String::new(),
      is_premium: false,
      is_freemium: "True".into(),
    }
  }

  #[test]
  fn to_out_exposes_original_and_aliased_fields() {
    let out = to_out(&record());
    assert_eq!(out.id, "2010");
    assert_eq!(out.slug, "2010");
    assert_eq!(out.title, "Monthly orders");
    assert_eq!(out.question_short, "Monthly orders");
    assert_eq!(out.description, "Count orders per month.");
    assert_eq!(out.difficulty, "2");
    assert_eq!(out.company, "Google, Meta");
    assert_eq!(out.topics, "Data Analyst");
    assert!(out.tables.is_some());
  }

  #[test]
  fn to_out_fills_fallback_texts_for_blank_columns() {
    let mut q = record();
    q.question_short = String::new();
    q.question = String::new();
    q.companies = String::new();
    let out = to_out(&q);
    assert_eq!(out.title, "Question");
    assert_eq!(out.description, "No description available");
    assert_eq!(out.company, "N/A");
    // Aliased originals stay verbatim (empty).
    assert_eq!(out.question_short, "");
    assert_eq!(out.companies, "");
  }

  #[test]
  fn agent_input_tolerates_missing_fields() {
    let body: AgentIn = serde_json::from_str(r#"{"context":{"action":"test"}}"#).unwrap();
    assert_eq!(body.message, "");
    let ctx = body.context.unwrap();
    assert_eq!(ctx.action, "test");
    assert_eq!(ctx.code, "");
  }
}

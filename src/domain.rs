//! Domain models: question records, difficulty/language enums, filter criteria.
//!
//! Records are normalized at parse time (see `store`): the heterogeneous
//! difficulty and premium encodings in the source CSV become a typed enum and
//! a strict bool here, so query sites never do string comparisons. The raw
//! difficulty/company strings are still carried because the HTTP layer exposes
//! them verbatim to the frontend.

use serde::{Deserialize, Serialize};

/// Normalized difficulty level. The source table stores either a numeric code
/// ("1"/"2"/"3") or a label ("Easy"/"Medium"/"Hard"); both map here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  /// Parse one of the two per-record representations (exact match, as the
  /// source data uses fixed spellings).
  pub fn from_code(s: &str) -> Option<Self> {
    match s {
      "1" | "Easy" => Some(Difficulty::Easy),
      "2" | "Medium" => Some(Difficulty::Medium),
      "3" | "Hard" => Some(Difficulty::Hard),
      _ => None,
    }
  }

  /// Parse a filter criterion ("easy"/"medium"/"hard", case-insensitive).
  /// Unrecognized strings yield None, which the filter treats as
  /// matches-nothing rather than an error.
  pub fn from_criterion(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "easy" => Some(Difficulty::Easy),
      "medium" => Some(Difficulty::Medium),
      "hard" => Some(Difficulty::Hard),
      _ => None,
    }
  }
}

/// Language family a question can be solved in. A question "supports" a
/// language when at least one of the corresponding solution columns is
/// non-blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
  Sql,
  Python,
  R,
}

impl Language {
  pub fn from_criterion(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "sql" => Some(Language::Sql),
      "python" => Some(Language::Python),
      "r" => Some(Language::R),
      _ => None,
    }
  }
}

/// One parsed row of the question bank.
#[derive(Clone, Debug)]
pub struct Question {
  pub id: String,
  pub question_short: String,
  pub question: String,

  /// Normalized level; None when neither column carried a recognized code.
  pub difficulty: Option<Difficulty>,
  /// Verbatim `difficulty` column, exposed as-is to the frontend.
  pub difficulty_raw: String,

  /// Free-text, comma/space separated company names (substring-matched).
  pub companies: String,
  pub job_positions: String,
  pub interview_date: String,

  /// Parsed `tables` column; a malformed JSON string normalizes to None.
  pub tables: Option<serde_json::Value>,

  // Per-dialect solution / hint / walkthrough texts. Presence (non-blank)
  // doubles as "question supports this language".
  pub solution_postgres: String,
  pub solution_mysql: String,
  pub solution_mssql: String,
  pub solution_oracle: String,
  pub solution_python: String,
  pub solution_pyspark: String,
  pub solution_r: String,
  pub hints_postgres: String,
  pub hints_python: String,
  pub walkthrough_postgres: String,
  pub walkthrough_python: String,

  pub is_premium: bool,
  pub is_freemium: String,
}

impl Question {
  pub fn supports(&self, lang: Language) -> bool {
    let any = |fields: &[&str]| fields.iter().any(|f| !f.trim().is_empty());
    match lang {
      Language::Sql => any(&[
        self.solution_postgres.as_str(),
        self.solution_mysql.as_str(),
        self.solution_mssql.as_str(),
        self.solution_oracle.as_str(),
      ]),
      Language::Python => any(&[self.solution_python.as_str(), self.solution_pyspark.as_str()]),
      Language::R => any(&[self.solution_r.as_str()]),
    }
  }
}

/// Filter criteria. Every field is independently optional; an absent field is
/// a no-op pass. Difficulty/language stay as strings so that unrecognized
/// values degrade to zero matches instead of failing at the boundary.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
  pub difficulty: Option<String>,
  pub company: Option<String>,
  pub language: Option<String>,
  pub is_premium: Option<bool>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn difficulty_codes_and_labels_map_to_the_same_level() {
    assert_eq!(Difficulty::from_code("1"), Some(Difficulty::Easy));
    assert_eq!(Difficulty::from_code("Easy"), Some(Difficulty::Easy));
    assert_eq!(Difficulty::from_code("2"), Some(Difficulty::Medium));
    assert_eq!(Difficulty::from_code("Hard"), Some(Difficulty::Hard));
    // Record codes are exact: lowercase labels are not valid in the data.
    assert_eq!(Difficulty::from_code("easy"), None);
    assert_eq!(Difficulty::from_code(""), None);
  }

  #[test]
  fn criterion_parsing_is_case_insensitive() {
    assert_eq!(Difficulty::from_criterion("MEDIUM"), Some(Difficulty::Medium));
    assert_eq!(Difficulty::from_criterion("impossible"), None);
    assert_eq!(Language::from_criterion("SQL"), Some(Language::Sql));
    assert_eq!(Language::from_criterion("cobol"), None);
  }
}

//! The CSV question bank: load-once cache, filtering, random sampling.
//!
//! Lifecycle is `new -> preload() -> read-only queries`. The store is owned by
//! `AppState` and handed to request handlers; there is no write path and no
//! cache invalidation. A corrected or added question requires a restart.
//!
//! The CSV splitter deliberately mirrors the bank's producer: a double quote
//! toggles quoted mode (the quote chars never land in values), a comma splits
//! only outside quotes, every field is trimmed. Fields with embedded newlines
//! are not supported by the format and will mis-parse.

use std::cmp;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

use crate::domain::{Criteria, Difficulty, Language, Question};

pub struct QuestionStore {
  path: PathBuf,
  cache: OnceLock<Vec<Question>>,
}

impl QuestionStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), cache: OnceLock::new() }
  }

  /// Eagerly populate the cache. Idempotent; called once at process start.
  /// Returns the number of questions loaded.
  #[instrument(level = "info", skip(self), fields(path = %self.path.display()))]
  pub fn preload(&self) -> Result<usize, String> {
    self.load().map(|qs| qs.len())
  }

  /// Return the cached record sequence, reading the backing file on first
  /// access. Repeated calls alias the same in-memory sequence; callers must
  /// treat the records as immutable.
  fn load(&self) -> Result<&[Question], String> {
    if let Some(cached) = self.cache.get() {
      debug!(target: "question_bank", count = cached.len(), "Using cached questions");
      return Ok(cached);
    }

    let content = std::fs::read_to_string(&self.path)
      .map_err(|e| format!("Failed to read question bank {}: {}", self.path.display(), e))?;
    let questions = parse_csv(&content);
    info!(target: "question_bank", count = questions.len(), path = %self.path.display(), "Loaded and cached questions");

    // Under a concurrent first access the winner's parse is kept and the
    // loser adopts it; the file is never read into the cache twice.
    Ok(self.cache.get_or_init(|| questions))
  }

  /// Apply each supplied criterion as an independent narrowing pass, in fixed
  /// order: difficulty, company, language, premium. An absent criterion is a
  /// no-op pass; an unrecognized difficulty/language value matches nothing.
  /// Original relative order is preserved. Zero matches is a valid outcome,
  /// not an error.
  #[instrument(level = "debug", skip(self, criteria))]
  pub fn filter(&self, criteria: &Criteria) -> Result<Vec<&Question>, String> {
    let mut filtered: Vec<&Question> = self.load()?.iter().collect();
    debug!(target: "question_bank", total = filtered.len(), "Filtering question bank");

    if let Some(d) = &criteria.difficulty {
      let target = Difficulty::from_criterion(d);
      filtered.retain(|q| target.is_some() && q.difficulty == target);
      debug!(target: "question_bank", criterion = %d, remaining = filtered.len(), "After difficulty filter");
    }

    if let Some(company) = &criteria.company {
      let needle = company.to_lowercase();
      filtered.retain(|q| !q.companies.is_empty() && q.companies.to_lowercase().contains(&needle));
      debug!(target: "question_bank", criterion = %company, remaining = filtered.len(), "After company filter");
    }

    if let Some(lang) = &criteria.language {
      let target = Language::from_criterion(lang);
      filtered.retain(|q| target.map(|l| q.supports(l)).unwrap_or(false));
      debug!(target: "question_bank", criterion = %lang, remaining = filtered.len(), "After language filter");
    }

    if let Some(premium) = criteria.is_premium {
      filtered.retain(|q| q.is_premium == premium);
      debug!(target: "question_bank", criterion = premium, remaining = filtered.len(), "After premium filter");
    }

    Ok(filtered)
  }

  /// Uniformly shuffle the filtered set and return the first
  /// `min(count, matches)` records. Non-deterministic across calls; there is
  /// no seeding contract.
  #[instrument(level = "debug", skip(self, criteria))]
  pub fn sample(&self, criteria: &Criteria, count: usize) -> Result<Vec<&Question>, String> {
    let mut matched = self.filter(criteria)?;
    if matched.is_empty() {
      return Ok(matched);
    }
    matched.shuffle(&mut rand::thread_rng());
    matched.truncate(cmp::min(count, matched.len()));
    Ok(matched)
  }
}

/// Parse the whole bank: line 0 is the header row, every subsequent non-blank
/// line is one record keyed by header name.
fn parse_csv(content: &str) -> Vec<Question> {
  let mut lines = content.split('\n');
  let headers: Vec<String> = match lines.next() {
    // Header names are split on bare commas and stripped of quote chars.
    Some(h) => h.split(',').map(|s| s.trim().replace('"', "")).collect(),
    None => return Vec::new(),
  };

  let mut questions = Vec::new();
  for line in lines {
    if line.trim().is_empty() {
      continue;
    }
    let values = split_line(line);
    let mut row = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
      row.insert(header.as_str(), values.get(i).cloned().unwrap_or_default());
    }
    questions.push(question_from_row(&row));
  }
  questions
}

/// Split one data line: a double quote toggles quoted mode and is dropped, a
/// comma separates fields only outside quotes, fields are trimmed.
fn split_line(line: &str) -> Vec<String> {
  let mut values = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;

  for ch in line.chars() {
    if ch == '"' {
      in_quotes = !in_quotes;
    } else if ch == ',' && !in_quotes {
      values.push(current.trim().to_string());
      current.clear();
    } else {
      current.push(ch);
    }
  }
  values.push(current.trim().to_string());
  values
}

/// Build a typed record from a raw row, normalizing the heterogeneous
/// encodings up front: difficulty (numeric code checked before the label
/// column), premium ("True"/"1"/"true" are true, anything else false) and the
/// serialized `tables` JSON (a parse failure means "no schema available").
///
/// A row whose two difficulty columns contradict each other resolves to the
/// numeric code and matches only that level. The bank never produces such
/// rows; this only pins which column wins if one ever appears.
fn question_from_row(row: &HashMap<&str, String>) -> Question {
  let get = |key: &str| row.get(key).cloned().unwrap_or_default();

  let difficulty_raw = get("difficulty");
  let difficulty = Difficulty::from_code(&difficulty_raw)
    .or_else(|| Difficulty::from_code(&get("difficulty_level")));

  let premium_raw = get("is_premium");
  let is_premium = matches!(premium_raw.as_str(), "True" | "1" | "true");

  let tables_raw = get("tables");
  let tables = if tables_raw.is_empty() {
    None
  } else {
    serde_json::from_str(&tables_raw).ok()
  };

  Question {
    id: get("id"),
    question_short: get("question_short"),
    question: get("question"),
    difficulty,
    difficulty_raw,
    companies: get("companies"),
    job_positions: get("job_positions"),
    interview_date: get("interview_date"),
    tables,
    solution_postgres: get("solution_postgres"),
    solution_mysql: get("solution_mysql"),
    solution_mssql: get("solution_mssql"),
    solution_oracle: get("solution_oracle"),
    solution_python: get("solution_python"),
    solution_pyspark: get("solution_pyspark"),
    solution_r: get("solution_r"),
    hints_postgres: get("hints_postgres"),
    hints_python: get("hints_python"),
    walkthrough_postgres: get("walkthrough_postgres"),
    walkthrough_python: get("walkthrough_python"),
    is_premium,
    is_freemium: get("is_freemium"),
  }
}

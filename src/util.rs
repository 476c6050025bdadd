//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
/// The cut is clamped to a char boundary so multi-byte input cannot panic.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_occurrences() {
    let out = fill_template(
      "Question {id}: run {code} for {id}",
      &[("id", "77"), ("code", "SELECT 1")],
    );
    assert_eq!(out, "Question 77: run SELECT 1 for 77");
  }

  #[test]
  fn fill_template_leaves_unknown_keys_alone() {
    let out = fill_template("Hello {name}", &[("other", "x")]);
    assert_eq!(out, "Hello {name}");
  }

  #[test]
  fn trunc_for_log_only_truncates_long_strings() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let long = "a".repeat(32);
    let t = trunc_for_log(&long, 8);
    assert!(t.starts_with("aaaaaaaa"));
    assert!(t.contains("32 bytes total"));
  }

  #[test]
  fn trunc_for_log_clamps_to_char_boundaries() {
    // Upstream error bodies are arbitrary UTF-8; a cut landing inside a
    // multi-byte char must back off instead of panicking.
    let long = format!("a{}", "€".repeat(200));
    let t = trunc_for_log(&long, 300);
    assert!(t.contains("601 bytes total"));
    assert!(t.starts_with('a'));
    assert!(!t.contains('\u{FFFD}'));

    let all_multibyte = "€".repeat(4);
    let t = trunc_for_log(&all_multibyte, 4);
    assert!(t.starts_with('€'));
    assert!(t.contains("12 bytes total"));
  }
}

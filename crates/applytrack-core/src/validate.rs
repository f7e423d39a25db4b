//! Field-level validation errors and the checks shared by every input type.
//!
//! Messages use the wording existing API clients match on
//! (`"This field is required."` and friends).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Key for errors that concern the record as a whole.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";

/// Whether an input must carry every required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
  /// `POST` and `PUT`: required fields must be present.
  Full,
  /// `PATCH`: any subset of fields.
  Partial,
}

// ─── ValidationErrors ────────────────────────────────────────────────────────

/// Field name → messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// Fold `other`'s messages into `self`.
  pub fn merge(&mut self, other: Self) {
    for (field, messages) in other.0 {
      self.0.entry(field).or_default().extend(messages);
    }
  }

  /// `Ok(value)` when no error was recorded.
  pub fn finish<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl std::fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// Deserialise a field that may be absent, `null`, or a value into
/// `Option<Option<T>>`. Use with `#[serde(default, deserialize_with = ...)]`
/// so that an absent key stays `None` while `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

// ─── Field checks ────────────────────────────────────────────────────────────

pub fn invalid_pk(id: i64) -> String {
  format!("Invalid pk \"{id}\" - object does not exist.")
}

fn max_length(max: usize) -> String {
  format!("Ensure this field has no more than {max} characters.")
}

/// A required, non-blank string. Returns the value when it passed.
pub(crate) fn required_text(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<String>,
  mode: WriteMode,
  max: usize,
) -> Option<String> {
  match value {
    None => {
      if mode == WriteMode::Full {
        errors.add(field, REQUIRED);
      }
      None
    }
    Some(v) if v.trim().is_empty() => {
      errors.add(field, BLANK);
      None
    }
    Some(v) => optional_text(errors, field, Some(v), max),
  }
}

/// A string that may be blank but is bounded in length.
pub(crate) fn optional_text(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<String>,
  max: usize,
) -> Option<String> {
  let v = value?;
  if v.chars().count() > max {
    errors.add(field, max_length(max));
    return None;
  }
  Some(v)
}

/// A nullable URL field: blank clears it, anything else must look like a URL.
pub(crate) fn optional_url(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<Option<String>>,
  max: usize,
) -> Option<Option<String>> {
  let v = match value? {
    None => return Some(None),
    Some(v) if v.trim().is_empty() => return Some(None),
    Some(v) => v,
  };
  let v = optional_text(errors, field, Some(v), max)?;
  if !looks_like_url(&v) {
    errors.add(field, "Enter a valid URL.");
    return None;
  }
  Some(Some(v))
}

/// A blank-able email field.
pub(crate) fn optional_email(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<String>,
  max: usize,
) -> Option<String> {
  let v = optional_text(errors, field, value, max)?;
  if !v.is_empty() && !looks_like_email(&v) {
    errors.add(field, "Enter a valid email address.");
    return None;
  }
  Some(v)
}

/// A nullable `YYYY-MM-DD` date. Blank is treated like `null`.
pub(crate) fn optional_date(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<Option<String>>,
) -> Option<Option<NaiveDate>> {
  match value? {
    None => Some(None),
    Some(v) if v.trim().is_empty() => Some(None),
    Some(v) => match NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d") {
      Ok(d) => Some(Some(d)),
      Err(_) => {
        errors.add(
          field,
          "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
        );
        None
      }
    },
  }
}

pub(crate) fn looks_like_url(value: &str) -> bool {
  let Some((scheme, rest)) = value.split_once("://") else {
    return false;
  };
  if !matches!(
    scheme.to_ascii_lowercase().as_str(),
    "http" | "https" | "ftp" | "ftps"
  ) {
    return false;
  }
  let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
  let host = host.rsplit('@').next().unwrap_or_default();
  let host = host.split(':').next().unwrap_or_default();
  !host.is_empty()
    && !value.chars().any(char::is_whitespace)
    && (host == "localhost" || host.contains('.'))
    && !host.starts_with('.')
    && !host.ends_with('.')
}

pub(crate) fn looks_like_email(value: &str) -> bool {
  let Some((local, domain)) = value.rsplit_once('@') else {
    return false;
  };
  !local.is_empty()
    && !local.contains('@')
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
    && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_lists_every_message() {
    let mut errors = ValidationErrors::new();
    errors.add("status", "bad");
    errors.add("company_id", REQUIRED);
    assert_eq!(
      errors.to_string(),
      "company_id: This field is required.; status: bad"
    );
  }

  #[test]
  fn finish_passes_value_through_when_clean() {
    assert_eq!(ValidationErrors::new().finish(7), Ok(7));
    assert!(ValidationErrors::single("x", "y").finish(7).is_err());
  }

  #[test]
  fn required_text_only_demands_presence_in_full_mode() {
    let mut errors = ValidationErrors::new();
    assert_eq!(required_text(&mut errors, "name", None, WriteMode::Partial, 10), None);
    assert!(errors.is_empty());

    assert_eq!(required_text(&mut errors, "name", None, WriteMode::Full, 10), None);
    assert_eq!(errors.messages("name"), [REQUIRED]);
  }

  #[test]
  fn required_text_rejects_blank_and_long_values() {
    let mut errors = ValidationErrors::new();
    required_text(&mut errors, "a", Some("   ".into()), WriteMode::Partial, 10);
    required_text(&mut errors, "b", Some("x".repeat(11)), WriteMode::Full, 10);
    assert_eq!(errors.messages("a"), [BLANK]);
    assert_eq!(
      errors.messages("b"),
      ["Ensure this field has no more than 10 characters."]
    );
  }

  #[test]
  fn url_check() {
    assert!(looks_like_url("https://tech.sol"));
    assert!(looks_like_url("http://localhost:8000/jobs?id=1"));
    assert!(!looks_like_url("tech.sol"));
    assert!(!looks_like_url("https://"));
    assert!(!looks_like_url("mailto://a b.com"));
  }

  #[test]
  fn email_check() {
    assert!(looks_like_email("e.musterfrau@tech.sol"));
    assert!(!looks_like_email("e.musterfrau"));
    assert!(!looks_like_email("a@b"));
    assert!(!looks_like_email("@tech.sol"));
  }

  #[test]
  fn blank_url_and_date_clear_the_field() {
    let mut errors = ValidationErrors::new();
    assert_eq!(
      optional_url(&mut errors, "website", Some(Some(String::new())), 200),
      Some(None)
    );
    assert_eq!(
      optional_date(&mut errors, "applied_on", Some(Some(String::new()))),
      Some(None)
    );
    assert!(errors.is_empty());
  }

  #[test]
  fn malformed_date_is_reported() {
    let mut errors = ValidationErrors::new();
    let parsed = optional_date(&mut errors, "applied_on", Some(Some("26.10.2023".into())));
    assert_eq!(parsed, None);
    assert!(errors.contains("applied_on"));
  }
}

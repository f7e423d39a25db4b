//! Error types for `applytrack-core`.

use serde::Serialize;
use thiserror::Error;

use crate::validate::ValidationErrors;

/// The kinds of record the tracker stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
  Company,
  Contact,
  Application,
  Note,
  User,
}

impl std::fmt::Display for Entity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Self::Company => "company",
      Self::Contact => "contact",
      Self::Application => "application",
      Self::Note => "note",
      Self::User => "user",
    })
  }
}

/// Why a request could not be tied to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
  /// No `Authorization` header, or one that is not `Token <key>`.
  #[error("authentication credentials were not provided")]
  MissingCredentials,
  /// Well-formed credentials that map to no identity.
  #[error("invalid token")]
  InvalidToken,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// Either missing, or owned by someone else. The two are deliberately
  /// indistinguishable.
  #[error("{entity} {id} not found")]
  NotFound { entity: Entity, id: i64 },

  #[error("permission denied: {0}")]
  Permission(String),

  #[error("{0}")]
  Authentication(AuthFailure),

  #[error("storage error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: Entity, id: i64) -> Self {
    Self::NotFound { entity, id }
  }

  /// Shorthand for a single-field validation failure.
  pub fn invalid(field: &str, message: impl Into<String>) -> Self {
    Self::Validation(ValidationErrors::single(field, message))
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

impl From<AuthFailure> for Error {
  fn from(failure: AuthFailure) -> Self { Self::Authentication(failure) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

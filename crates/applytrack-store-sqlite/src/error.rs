//! Error type for `applytrack-store-sqlite`.

use applytrack_core::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain outcome (validation, not found, permission) decided by the
  /// store. Passed through unchanged to callers.
  #[error("{0}")]
  Core(#[from] applytrack_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown application status in database: {0:?}")]
  UnknownStatus(String),
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Core(errors.into()) }
}

impl From<Error> for applytrack_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      other => applytrack_core::Error::Backend(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

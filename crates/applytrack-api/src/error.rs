//! API error type and [`axum::response::IntoResponse`] implementation.

use applytrack_core::{AuthFailure, Entity, ValidationErrors};
use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("{entity} {id} not found")]
  NotFound { entity: Entity, id: i64 },

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("unauthorized: {0}")]
  Unauthorized(AuthFailure),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store failure onto the response it deserves.
  pub fn from_store<E: Into<applytrack_core::Error>>(e: E) -> Self {
    let core: applytrack_core::Error = e.into();
    core.into()
  }

  pub fn not_found(entity: Entity, id: i64) -> Self { Self::NotFound { entity, id } }
}

impl From<applytrack_core::Error> for ApiError {
  fn from(e: applytrack_core::Error) -> Self {
    use applytrack_core::Error as Core;
    match e {
      Core::Validation(errors) => Self::Validation(errors),
      Core::NotFound { entity, id } => Self::NotFound { entity, id },
      Core::Permission(message) => Self::Forbidden(message),
      Core::Authentication(failure) => Self::Unauthorized(failure),
      Core::Backend(inner) => Self::Store(inner),
    }
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

/// Reported on a field whose JSON value has the wrong type.
pub const INCORRECT_TYPE: &str = "Incorrect type.";

/// The field path a JSON data error names, such as `company_id` or
/// `notes[0].text`. `None` when the error concerns the body as a whole.
fn failing_field(message: &str) -> Option<&str> {
  let (_, detail) = message.split_once("target type: ")?;
  let (path, _) = detail.split_once(": ")?;
  (!path.is_empty() && !path.contains(char::is_whitespace)).then_some(path)
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    match rejection {
      JsonRejection::JsonDataError(e) => {
        let message = e.body_text();
        match failing_field(&message) {
          Some(field) => Self::Validation(ValidationErrors::single(field, INCORRECT_TYPE)),
          None => Self::BadRequest(message),
        }
      }
      other => Self::BadRequest(other.body_text()),
    }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(errors) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation failed", "fields": errors })),
      )
        .into_response(),
      ApiError::NotFound { entity, id } => (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{entity} {id} not found") })),
      )
        .into_response(),
      ApiError::Forbidden(message) => {
        (StatusCode::FORBIDDEN, Json(json!({ "error": message }))).into_response()
      }
      ApiError::Unauthorized(failure) => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": failure.to_string() })),
        )
          .into_response();
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        res
      }
      ApiError::BadRequest(message) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn data_errors_name_their_field() {
    let prefix = "Failed to deserialize the JSON body into the target type";
    assert_eq!(
      failing_field(&format!(
        "{prefix}: company_id: invalid type: string \"abc\", expected i64 at line 1 column 37"
      )),
      Some("company_id")
    );
    assert_eq!(
      failing_field(&format!("{prefix}: notes[0].text: invalid type: integer `5`")),
      Some("notes[0].text")
    );
    assert_eq!(
      failing_field(&format!("{prefix}: invalid type: sequence, expected struct")),
      None
    );
  }
}

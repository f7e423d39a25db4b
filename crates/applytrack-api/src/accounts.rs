//! Handlers for account endpoints. Neither requires a token.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/registration` | Body: `{username, email, password, repeated_password}`; 201 |
//! | `POST` | `/login` | Body: `{email, password}`; 200 |
//!
//! Both answer with `{"token", "username", "email"}`. An account holds a
//! single token: logging in issues a fresh one and the previous one stops
//! working.

use std::sync::Arc;

use applytrack_core::{
  ValidationErrors,
  identity::{
    INVALID_CREDENTIALS, LoginInput, NewUser, RegistrationInput, TokenGrant,
  },
  store::TrackerStore,
  validate::NON_FIELD_ERRORS,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
  auth::{digest_token, generate_token, hash_password, issue_token, verify_password},
  error::ApiError,
  extract::JsonBody,
};

/// `POST /registration`
pub async fn register<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<RegistrationInput>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let registration = body.validate()?;
  let token = generate_token();
  let user = store
    .register_user(
      NewUser {
        username:      registration.username,
        email:         registration.email,
        password_hash: hash_password(&registration.password)?,
      },
      digest_token(&token),
    )
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(user = %user.id, "account registered");
  Ok((
    StatusCode::CREATED,
    Json(TokenGrant { token, username: user.username, email: user.email }),
  ))
}

/// `POST /login`
pub async fn login<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<LoginInput>,
) -> Result<Json<TokenGrant>, ApiError>
where
  S: TrackerStore,
{
  let login = body.validate()?;
  let Some(credentials) = store
    .find_credentials(login.email.clone())
    .await
    .map_err(ApiError::from_store)?
    .filter(|c| verify_password(&login.password, &c.password_hash))
  else {
    tracing::warn!(email = %login.email, "failed login");
    return Err(ValidationErrors::single(NON_FIELD_ERRORS, INVALID_CREDENTIALS).into());
  };

  let user = credentials.user;
  let token = issue_token(store.as_ref(), user.id).await?;
  tracing::debug!(user = %user.id, "issued token");
  Ok(Json(TokenGrant { token, username: user.username, email: user.email }))
}

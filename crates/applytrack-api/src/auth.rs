//! Token-auth extractor, token issuance, and password hashing.
//!
//! Clients send `Authorization: Token <key>` (`Bearer <key>` is accepted
//! too). Only the SHA-256 digest of a key is stored.

use std::sync::Arc;

use applytrack_core::{AuthFailure, UserId, identity::User, store::TrackerStore};
use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};

use crate::error::ApiError;

/// Number of random bytes in an issued key (40 hex characters).
const TOKEN_BYTES: usize = 20;

/// The authenticated requester. Present in a handler means the request
/// carried a valid token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
  pub fn id(&self) -> UserId { self.0.id }
}

/// Pull the key out of an `Authorization` header.
pub fn token_from_headers(headers: &HeaderMap) -> Result<&str, AuthFailure> {
  let value = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(AuthFailure::MissingCredentials)?;

  let (scheme, key) = value
    .trim()
    .split_once(' ')
    .ok_or(AuthFailure::MissingCredentials)?;
  if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
    return Err(AuthFailure::MissingCredentials);
  }

  let key = key.trim();
  if key.is_empty() || key.contains(' ') {
    return Err(AuthFailure::InvalidToken);
  }
  Ok(key)
}

/// Hex SHA-256 of a key; the form tokens are stored and looked up in.
pub fn digest_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// A fresh random key.
pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// Issue a new key for `user`, replacing the one it held.
pub async fn issue_token<S: TrackerStore>(store: &S, user: UserId) -> Result<String, ApiError> {
  let token = generate_token();
  store
    .store_token(user, digest_token(&token))
    .await
    .map_err(ApiError::from_store)?;
  Ok(token)
}

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| ApiError::Store(e.to_string().into()))?;
  Ok(hash.to_string())
}

/// `true` when `password` matches the stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

impl<S> FromRequestParts<Arc<S>> for CurrentUser
where
  S: TrackerStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    store: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = token_from_headers(&parts.headers).map_err(ApiError::Unauthorized)?;
    let user = store
      .resolve_token(digest_token(token))
      .await
      .map_err(ApiError::from_store)?
      .ok_or(ApiError::Unauthorized(AuthFailure::InvalidToken))?;
    Ok(CurrentUser(user))
  }
}

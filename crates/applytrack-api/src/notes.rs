//! Handlers for `/notes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/notes` | Optional `?application_id=`, `?search=`; newest first |
//! | `POST` | `/notes` | Body: `{application_id, text}`; 201; 403 for a foreign application |
//! | `GET`  | `/notes/{id}` | |
//! | `PUT`  | `/notes/{id}` | Full update |
//! | `PATCH` | `/notes/{id}` | Partial update; moving to a foreign application is 403 |
//! | `DELETE` | `/notes/{id}` | 204 |

use std::sync::Arc;

use applytrack_core::{
  Entity, WriteMode,
  note::{Note, NoteFilter, NoteInput},
  store::TrackerStore,
};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use crate::{
  auth::CurrentUser,
  error::ApiError,
  extract::{JsonBody, QueryParams},
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub application_id: Option<i64>,
  pub search:         Option<String>,
}

/// `GET /notes[?application_id=<id>][&search=<term>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Note>>, ApiError>
where
  S: TrackerStore + 'static,
{
  let filter = NoteFilter { application_id: params.application_id, search: params.search };
  let notes = store
    .list_notes(user.id(), filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(notes))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /notes`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  JsonBody(body): JsonBody<NoteInput>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore + 'static,
{
  let note = store
    .create_note(user.id(), body.into_new()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /notes/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError>
where
  S: TrackerStore + 'static,
{
  let note = store
    .get_note(user.id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::not_found(Entity::Note, id))?;
  Ok(Json(note))
}

// ─── Update ──────────────────────────────────────────────────────────────────

async fn update<S>(
  store: &S,
  user: CurrentUser,
  id: i64,
  body: NoteInput,
  mode: WriteMode,
) -> Result<Json<Note>, ApiError>
where
  S: TrackerStore,
{
  let note = store
    .update_note(user.id(), id, body.into_patch(mode)?)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(note))
}

/// `PUT /notes/{id}`
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<NoteInput>,
) -> Result<Json<Note>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Full).await
}

/// `PATCH /notes/{id}`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<NoteInput>,
) -> Result<Json<Note>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Partial).await
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /notes/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore + 'static,
{
  store
    .delete_note(user.id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for `/applications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/applications` | Optional `?status=`, `?company_id=`, `?search=` |
//! | `POST` | `/applications` | Body: [`ApplicationInput`]; 201; may carry `notes` |
//! | `GET`  | `/applications/{id}` | Embeds company, contact and notes |
//! | `PUT`  | `/applications/{id}` | Full update; `notes`, if present, is reconciled |
//! | `PATCH` | `/applications/{id}` | Partial update; same `notes` handling |
//! | `DELETE` | `/applications/{id}` | 204; deletes the notes with it |
//!
//! A `notes` list on update is the complete desired set: entries with an `id`
//! rewrite that note, entries without one are created, and notes left out are
//! deleted. Omitting `notes` leaves them alone.

use std::sync::Arc;

use applytrack_core::{
  Entity, WriteMode,
  application::{ApplicationFilter, ApplicationInput, ApplicationStatus, ApplicationView},
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
  pub status:     Option<String>,
  pub company_id: Option<i64>,
  pub search:     Option<String>,
}

impl ListParams {
  fn into_filter(self) -> Result<ApplicationFilter, ApiError> {
    let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
      Some(s) => Some(ApplicationStatus::parse_field(s, "status")?),
      None => None,
    };
    Ok(ApplicationFilter { status, company_id: self.company_id, search: self.search })
  }
}

/// `GET /applications[?status=<STATUS>][&company_id=<id>][&search=<term>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<ApplicationView>>, ApiError>
where
  S: TrackerStore + 'static,
{
  let applications = store
    .list_applications(user.id(), params.into_filter()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(applications))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /applications`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  JsonBody(body): JsonBody<ApplicationInput>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore + 'static,
{
  let changes = body.validate(WriteMode::Full)?;
  let application = store
    .create_application(user.id(), changes)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(application)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /applications/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<Json<ApplicationView>, ApiError>
where
  S: TrackerStore + 'static,
{
  let application = store
    .get_application(user.id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::not_found(Entity::Application, id))?;
  Ok(Json(application))
}

// ─── Update ──────────────────────────────────────────────────────────────────

async fn update<S>(
  store: &S,
  user: CurrentUser,
  id: i64,
  body: ApplicationInput,
  mode: WriteMode,
) -> Result<Json<ApplicationView>, ApiError>
where
  S: TrackerStore,
{
  let changes = body.validate(mode)?;
  let application = store
    .update_application(user.id(), id, changes)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(application))
}

/// `PUT /applications/{id}`
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<ApplicationInput>,
) -> Result<Json<ApplicationView>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Full).await
}

/// `PATCH /applications/{id}`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<ApplicationInput>,
) -> Result<Json<ApplicationView>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Partial).await
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /applications/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore + 'static,
{
  store
    .delete_application(user.id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for `/contacts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/contacts` | Optional `?company_id=`, `?search=` |
//! | `POST` | `/contacts` | Body: [`ContactInput`]; 201 |
//! | `GET`  | `/contacts/{id}` | Embeds the company |
//! | `PUT`  | `/contacts/{id}` | Full update |
//! | `PATCH` | `/contacts/{id}` | Partial update |
//! | `DELETE` | `/contacts/{id}` | 204; applications keep existing without a contact |

use std::sync::Arc;

use applytrack_core::{
  Entity, WriteMode,
  contact::{ContactFilter, ContactInput, ContactView},
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
  pub company_id: Option<i64>,
  pub search:     Option<String>,
}

/// `GET /contacts[?company_id=<id>][&search=<term>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<ContactView>>, ApiError>
where
  S: TrackerStore + 'static,
{
  let filter = ContactFilter { company_id: params.company_id, search: params.search };
  let contacts = store
    .list_contacts(user.id(), filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(contacts))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /contacts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  JsonBody(body): JsonBody<ContactInput>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore + 'static,
{
  let contact = store
    .create_contact(user.id(), body.into_new()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<Json<ContactView>, ApiError>
where
  S: TrackerStore + 'static,
{
  let contact = store
    .get_contact(user.id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::not_found(Entity::Contact, id))?;
  Ok(Json(contact))
}

// ─── Update ──────────────────────────────────────────────────────────────────

async fn update<S>(
  store: &S,
  user: CurrentUser,
  id: i64,
  body: ContactInput,
  mode: WriteMode,
) -> Result<Json<ContactView>, ApiError>
where
  S: TrackerStore,
{
  let contact = store
    .update_contact(user.id(), id, body.into_patch(mode)?)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(contact))
}

/// `PUT /contacts/{id}`
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<ContactInput>,
) -> Result<Json<ContactView>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Full).await
}

/// `PATCH /contacts/{id}`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<ContactInput>,
) -> Result<Json<ContactView>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Partial).await
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /contacts/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore + 'static,
{
  store
    .delete_contact(user.id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

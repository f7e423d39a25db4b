//! Handlers for `/companies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/companies` | Optional `?search=`; ordered by name |
//! | `POST` | `/companies` | Body: [`CompanyInput`]; 201 |
//! | `GET`  | `/companies/{id}` | 404 if missing or not owned |
//! | `PUT`  | `/companies/{id}` | Full update |
//! | `PATCH` | `/companies/{id}` | Partial update |
//! | `DELETE` | `/companies/{id}` | 204; cascades to contacts and applications |

use std::sync::Arc;

use applytrack_core::{
  Entity, WriteMode,
  company::{Company, CompanyFilter, CompanyInput},
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
  pub search: Option<String>,
}

/// `GET /companies[?search=<term>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Company>>, ApiError>
where
  S: TrackerStore + 'static,
{
  let companies = store
    .list_companies(user.id(), CompanyFilter { search: params.search })
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(companies))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /companies`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  JsonBody(body): JsonBody<CompanyInput>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore + 'static,
{
  let company = store
    .create_company(user.id(), body.into_new()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(company)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /companies/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<Json<Company>, ApiError>
where
  S: TrackerStore + 'static,
{
  let company = store
    .get_company(user.id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::not_found(Entity::Company, id))?;
  Ok(Json(company))
}

// ─── Update ──────────────────────────────────────────────────────────────────

async fn update<S>(
  store: &S,
  user: CurrentUser,
  id: i64,
  body: CompanyInput,
  mode: WriteMode,
) -> Result<Json<Company>, ApiError>
where
  S: TrackerStore,
{
  let company = store
    .update_company(user.id(), id, body.into_patch(mode)?)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(company))
}

/// `PUT /companies/{id}`
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<CompanyInput>,
) -> Result<Json<Company>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Full).await
}

/// `PATCH /companies/{id}`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<CompanyInput>,
) -> Result<Json<Company>, ApiError>
where
  S: TrackerStore + 'static,
{
  update(store.as_ref(), user, id, body, WriteMode::Partial).await
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /companies/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore + 'static,
{
  store
    .delete_company(user.id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

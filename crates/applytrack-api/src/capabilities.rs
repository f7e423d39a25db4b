//! `GET /capabilities`: the static listing/filter/search table for admin
//! tooling.

use applytrack_core::{
  capability::{CAPABILITIES, Capability},
  store::TrackerStore,
};
use axum::Json;

use crate::auth::CurrentUser;

/// `GET /capabilities`
///
/// Generic over the store only so the token check can resolve against it.
pub async fn handler<S>(_user: CurrentUser) -> Json<&'static [Capability]>
where
  S: TrackerStore + 'static,
{
  Json(CAPABILITIES)
}

//! JSON REST API for applytrack.
//!
//! Exposes an axum [`Router`] backed by any
//! [`applytrack_core::store::TrackerStore`]. Every entity route requires a
//! token (see [`auth`]); TLS and tracing layers are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", applytrack_api::api_router(store.clone()))
//! ```

pub mod accounts;
pub mod applications;
pub mod auth;
pub mod capabilities;
pub mod companies;
pub mod contacts;
pub mod error;
pub mod extract;
pub mod notes;

use std::sync::Arc;

use applytrack_core::store::TrackerStore;
use axum::{
  Router,
  routing::{get, post},
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TrackerStore + 'static,
{
  Router::new()
    // Accounts
    .route("/registration", post(accounts::register::<S>))
    .route("/login", post(accounts::login::<S>))
    // Companies
    .route("/companies", get(companies::list::<S>).post(companies::create::<S>))
    .route(
      "/companies/{id}",
      get(companies::get_one::<S>)
        .put(companies::replace::<S>)
        .patch(companies::patch::<S>)
        .delete(companies::delete_one::<S>),
    )
    // Contacts
    .route("/contacts", get(contacts::list::<S>).post(contacts::create::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::replace::<S>)
        .patch(contacts::patch::<S>)
        .delete(contacts::delete_one::<S>),
    )
    // Applications
    .route(
      "/applications",
      get(applications::list::<S>).post(applications::create::<S>),
    )
    .route(
      "/applications/{id}",
      get(applications::get_one::<S>)
        .put(applications::replace::<S>)
        .patch(applications::patch::<S>)
        .delete(applications::delete_one::<S>),
    )
    // Notes
    .route("/notes", get(notes::list::<S>).post(notes::create::<S>))
    .route(
      "/notes/{id}",
      get(notes::get_one::<S>)
        .put(notes::replace::<S>)
        .patch(notes::patch::<S>)
        .delete(notes::delete_one::<S>),
    )
    // Admin tooling
    .route("/capabilities", get(capabilities::handler::<S>))
    .with_state(store)
}

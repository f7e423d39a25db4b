//! Core types and trait definitions for the applytrack job-application
//! tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the domain records, input validation, the note reconciliation planner, and
//! the [`store::TrackerStore`] trait that every backend implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod application;
pub mod capability;
pub mod company;
pub mod contact;
pub mod error;
pub mod identity;
pub mod note;
pub mod store;
pub mod transfer;
pub mod validate;

pub use error::{AuthFailure, Entity, Error, Result};
pub use identity::UserId;
pub use validate::{ValidationErrors, WriteMode};

//! The `TrackerStore` trait: the ownership-scoped query layer.
//!
//! The trait is implemented by storage backends (e.g.
//! `applytrack-store-sqlite`). Higher layers (`applytrack-api`,
//! `applytrack-server`) depend on this abstraction, not on any concrete
//! backend.
//!
//! Every entity method takes the requesting [`UserId`] explicitly and only
//! ever sees records that identity owns, directly or through the parent
//! application (notes). A record owned by someone else is reported exactly
//! like a missing one. Foreign keys named in inputs are resolved through the
//! same scoping, so a request can never attach to another user's data.

use std::future::Future;

use crate::{
  UserId,
  application::{ApplicationChanges, ApplicationFilter, ApplicationView},
  company::{Company, CompanyFilter, CompanyPatch, NewCompany},
  contact::{ContactFilter, ContactPatch, ContactView, NewContact},
  identity::{NewUser, User, UserCredentials},
  note::{NewNote, Note, NoteFilter, NotePatch},
  transfer::{Snapshot, TransferSummary},
};

/// Abstraction over an applytrack store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`). Backend errors convert into the
/// domain [`crate::Error`], which carries the validation / not-found /
/// permission distinction the transport maps onto status codes.
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Persist a new account. Fails with a validation error when the username
  /// or email is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Persist a new account together with the digest of its first token, in
  /// one transaction. Nothing is written when either insert fails.
  fn register_user(
    &self,
    input: NewUser,
    token_digest: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up an account and its password hash by email address.
  fn find_credentials(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + '_;

  /// Make `token_digest` the token of `user`. An account holds one token;
  /// any earlier one stops resolving.
  fn store_token(
    &self,
    user: UserId,
    token_digest: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Map a token digest to its account. `None` for unknown digests.
  fn resolve_token(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Companies ─────────────────────────────────────────────────────────

  /// The owner's companies, ordered by name.
  fn list_companies(
    &self,
    owner: UserId,
    filter: CompanyFilter,
  ) -> impl Future<Output = Result<Vec<Company>, Self::Error>> + Send + '_;

  /// `None` when the company is missing or not owned by `owner`.
  fn get_company(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  /// Fails with a validation error on `name` if `owner` already has a
  /// company of that name.
  fn create_company(
    &self,
    owner: UserId,
    input: NewCompany,
  ) -> impl Future<Output = Result<Company, Self::Error>> + Send + '_;

  fn update_company(
    &self,
    owner: UserId,
    id: i64,
    patch: CompanyPatch,
  ) -> impl Future<Output = Result<Company, Self::Error>> + Send + '_;

  /// Deletes the company's contacts, applications and their notes with it.
  fn delete_company(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Contacts ──────────────────────────────────────────────────────────

  fn list_contacts(
    &self,
    owner: UserId,
    filter: ContactFilter,
  ) -> impl Future<Output = Result<Vec<ContactView>, Self::Error>> + Send + '_;

  fn get_contact(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<Option<ContactView>, Self::Error>> + Send + '_;

  /// `input.company_id` must name a company of `owner`.
  fn create_contact(
    &self,
    owner: UserId,
    input: NewContact,
  ) -> impl Future<Output = Result<ContactView, Self::Error>> + Send + '_;

  fn update_contact(
    &self,
    owner: UserId,
    id: i64,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<ContactView, Self::Error>> + Send + '_;

  /// Applications that referenced the contact keep existing with their
  /// contact cleared.
  fn delete_contact(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  fn list_applications(
    &self,
    owner: UserId,
    filter: ApplicationFilter,
  ) -> impl Future<Output = Result<Vec<ApplicationView>, Self::Error>> + Send + '_;

  fn get_application(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<Option<ApplicationView>, Self::Error>> + Send + '_;

  /// `changes` must have passed a full validation. Any notes it carries are
  /// created with the application.
  fn create_application(
    &self,
    owner: UserId,
    changes: ApplicationChanges,
  ) -> impl Future<Output = Result<ApplicationView, Self::Error>> + Send + '_;

  /// Apply scalar changes and, when `changes.notes` is present, reconcile the
  /// application's notes against it. Both happen in one transaction.
  fn update_application(
    &self,
    owner: UserId,
    id: i64,
    changes: ApplicationChanges,
  ) -> impl Future<Output = Result<ApplicationView, Self::Error>> + Send + '_;

  fn delete_application(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Notes ─────────────────────────────────────────────────────────────

  /// Newest first.
  fn list_notes(
    &self,
    owner: UserId,
    filter: NoteFilter,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  fn get_note(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  /// Fails with a permission error when `input.application_id` is not an
  /// application of `owner`.
  fn create_note(
    &self,
    owner: UserId,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  fn update_note(
    &self,
    owner: UserId,
    id: i64,
    patch: NotePatch,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  fn delete_note(
    &self,
    owner: UserId,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Bulk transfer ─────────────────────────────────────────────────────
  //
  // Operator tools: these span all owners and are not exposed over HTTP.

  fn export_snapshot(
    &self,
  ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;

  /// Upsert every record by id, parents before children, in one
  /// transaction.
  fn import_snapshot(
    &self,
    snapshot: Snapshot,
  ) -> impl Future<Output = Result<TransferSummary, Self::Error>> + Send + '_;
}

//! [`SqliteStore`]: the SQLite implementation of [`TrackerStore`].

use std::path::Path;

use applytrack_core::{
  Entity, UserId,
  application::{Application, ApplicationChanges, ApplicationFilter, ApplicationView},
  company::{Company, CompanyFilter, CompanyPatch, NewCompany},
  contact::{ContactFilter, ContactPatch, ContactView, NewContact},
  identity::{NewUser, User, UserCredentials},
  note::{NewNote, Note, NoteFilter, NotePatch, NotePlan, reconcile},
  store::TrackerStore,
  transfer::{Snapshot, TransferSummary},
  validate::REQUIRED,
};
use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::{
  Error, Result,
  encode::now,
  queries::{self, not_found},
  schema::SCHEMA,
};

const FORBIDDEN: &str = "You do not have permission to perform this action.";

fn forbidden() -> Error { applytrack_core::Error::Permission(FORBIDDEN.to_owned()).into() }

/// `Ok` when a delete removed a row, `NotFound` otherwise.
fn deleted(removed: bool, entity: Entity, id: i64) -> Result<()> {
  if removed { Ok(()) } else { Err(not_found(entity, id)) }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An applytrack store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the database thread.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside a transaction on the database thread. The transaction
  /// commits only when `f` succeeds; otherwise dropping it rolls back.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let out = f(&tx);
        if out.is_ok() {
          tx.commit()?;
        }
        Ok(out)
      })
      .await?
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = self
      .write(move |tx| queries::insert_user(tx, input, now()))
      .await?;
    debug!(user = %user.id, "registered user");
    Ok(user)
  }

  async fn register_user(&self, input: NewUser, token_digest: String) -> Result<User> {
    let user = self
      .write(move |tx| {
        let at = now();
        let user = queries::insert_user(tx, input, at)?;
        queries::replace_token(tx, user.id, &token_digest, at)?;
        Ok(user)
      })
      .await?;
    debug!(user = %user.id, "registered user with token");
    Ok(user)
  }

  async fn find_credentials(&self, email: String) -> Result<Option<UserCredentials>> {
    self
      .read(move |conn| queries::select_credentials(conn, &email))
      .await
  }

  async fn store_token(&self, user: UserId, token_digest: String) -> Result<()> {
    self
      .write(move |tx| queries::replace_token(tx, user, &token_digest, now()))
      .await
  }

  async fn resolve_token(&self, token_digest: String) -> Result<Option<User>> {
    self
      .read(move |conn| queries::select_token_user(conn, &token_digest))
      .await
  }

  // ── Companies ─────────────────────────────────────────────────────────

  async fn list_companies(
    &self,
    owner: UserId,
    filter: CompanyFilter,
  ) -> Result<Vec<Company>> {
    self
      .read(move |conn| queries::select_companies(conn, owner, &filter))
      .await
  }

  async fn get_company(&self, owner: UserId, id: i64) -> Result<Option<Company>> {
    self
      .read(move |conn| queries::select_company(conn, owner, id))
      .await
  }

  async fn create_company(&self, owner: UserId, input: NewCompany) -> Result<Company> {
    self
      .write(move |tx| queries::insert_company(tx, owner, input))
      .await
  }

  async fn update_company(
    &self,
    owner: UserId,
    id: i64,
    patch: CompanyPatch,
  ) -> Result<Company> {
    self
      .write(move |tx| {
        let mut company = queries::select_company(tx, owner, id)?
          .ok_or_else(|| not_found(Entity::Company, id))?;
        patch.apply(&mut company);
        queries::write_company(tx, owner, &company)?;
        Ok(company)
      })
      .await
  }

  async fn delete_company(&self, owner: UserId, id: i64) -> Result<()> {
    self
      .write(move |tx| {
        let removed = queries::delete_owned(tx, "companies", owner, id)?;
        deleted(removed, Entity::Company, id)
      })
      .await
  }

  // ── Contacts ──────────────────────────────────────────────────────────

  async fn list_contacts(
    &self,
    owner: UserId,
    filter: ContactFilter,
  ) -> Result<Vec<ContactView>> {
    self
      .read(move |conn| queries::select_contacts(conn, owner, &filter))
      .await
  }

  async fn get_contact(&self, owner: UserId, id: i64) -> Result<Option<ContactView>> {
    self
      .read(move |conn| queries::select_contact(conn, owner, id))
      .await
  }

  async fn create_contact(&self, owner: UserId, input: NewContact) -> Result<ContactView> {
    self
      .write(move |tx| queries::insert_contact(tx, owner, input))
      .await
  }

  async fn update_contact(
    &self,
    owner: UserId,
    id: i64,
    patch: ContactPatch,
  ) -> Result<ContactView> {
    self
      .write(move |tx| {
        let mut contact = queries::select_contact(tx, owner, id)?
          .ok_or_else(|| not_found(Entity::Contact, id))?
          .contact;
        patch.apply(&mut contact);
        queries::write_contact(tx, owner, &contact)?;
        queries::select_contact(tx, owner, id)?
          .ok_or_else(|| not_found(Entity::Contact, id))
      })
      .await
  }

  async fn delete_contact(&self, owner: UserId, id: i64) -> Result<()> {
    self
      .write(move |tx| {
        let removed = queries::delete_owned(tx, "contacts", owner, id)?;
        deleted(removed, Entity::Contact, id)
      })
      .await
  }

  // ── Applications ──────────────────────────────────────────────────────

  async fn list_applications(
    &self,
    owner: UserId,
    filter: ApplicationFilter,
  ) -> Result<Vec<ApplicationView>> {
    self
      .read(move |conn| queries::select_applications(conn, owner, &filter))
      .await
  }

  async fn get_application(
    &self,
    owner: UserId,
    id: i64,
  ) -> Result<Option<ApplicationView>> {
    self
      .read(move |conn| {
        queries::select_application(conn, owner, id)?
          .map(|application| queries::expand(conn, application))
          .transpose()
      })
      .await
  }

  async fn create_application(
    &self,
    owner: UserId,
    changes: ApplicationChanges,
  ) -> Result<ApplicationView> {
    self
      .write(move |tx| {
        let mut errors = queries::check_application_references(tx, owner, &changes)?;
        let incoming = changes.notes.as_deref().unwrap_or_default();
        let plan = match reconcile(&[], incoming) {
          Ok(plan) => plan,
          Err(e) => {
            errors.merge(e);
            NotePlan::default()
          }
        };
        let Some(company_id) = changes.company_id else {
          errors.add("company_id", REQUIRED);
          return Err(errors.into());
        };
        errors.finish(())?;

        let at = now();
        let mut application = Application {
          id: 0,
          owner,
          job_title: String::new(),
          company_id,
          contact_id: None,
          status: Default::default(),
          applied_on: None,
          interview_on: None,
          offer_on: None,
          rejected_on: None,
          follow_up_on: None,
          job_posting_link: None,
          salary_expectation: None,
          created_at: at,
          updated_at: at,
        };
        changes.apply(&mut application);
        application.id = queries::insert_application(tx, &application)?;
        queries::apply_note_plan(tx, application.id, plan, at)?;
        debug!(application = application.id, owner = %owner, "created application");
        queries::expand(tx, application)
      })
      .await
  }

  async fn update_application(
    &self,
    owner: UserId,
    id: i64,
    changes: ApplicationChanges,
  ) -> Result<ApplicationView> {
    self
      .write(move |tx| {
        let mut application = queries::select_application(tx, owner, id)?
          .ok_or_else(|| not_found(Entity::Application, id))?;

        let mut errors = queries::check_application_references(tx, owner, &changes)?;
        let plan = match &changes.notes {
          Some(incoming) => {
            let current = queries::notes_of(tx, id)?;
            match reconcile(&current, incoming) {
              Ok(plan) => Some(plan),
              Err(e) => {
                errors.merge(e);
                None
              }
            }
          }
          None => None,
        };
        errors.finish(())?;

        let at = now();
        changes.apply(&mut application);
        application.updated_at = at;
        queries::write_application(tx, &application)?;

        if let Some(plan) = plan {
          debug!(
            application = id,
            updated = plan.updates.len(),
            inserted = plan.inserts.len(),
            deleted = plan.deletions.len(),
            "reconciled notes"
          );
          queries::apply_note_plan(tx, id, plan, at)?;
        }
        queries::expand(tx, application)
      })
      .await
  }

  async fn delete_application(&self, owner: UserId, id: i64) -> Result<()> {
    self
      .write(move |tx| {
        let removed = queries::delete_owned(tx, "applications", owner, id)?;
        deleted(removed, Entity::Application, id)
      })
      .await
  }

  // ── Notes ─────────────────────────────────────────────────────────────

  async fn list_notes(&self, owner: UserId, filter: NoteFilter) -> Result<Vec<Note>> {
    self
      .read(move |conn| queries::select_notes(conn, owner, &filter))
      .await
  }

  async fn get_note(&self, owner: UserId, id: i64) -> Result<Option<Note>> {
    self
      .read(move |conn| queries::select_note(conn, owner, id))
      .await
  }

  async fn create_note(&self, owner: UserId, input: NewNote) -> Result<Note> {
    self
      .write(move |tx| {
        if !queries::owns_application(tx, owner, input.application_id)? {
          return Err(forbidden());
        }
        queries::insert_note(tx, input.application_id, input.text, now())
      })
      .await
  }

  async fn update_note(&self, owner: UserId, id: i64, patch: NotePatch) -> Result<Note> {
    self
      .write(move |tx| {
        let mut note = queries::select_note(tx, owner, id)?
          .ok_or_else(|| not_found(Entity::Note, id))?;
        if let Some(application_id) = patch.application_id {
          if !queries::owns_application(tx, owner, application_id)? {
            return Err(forbidden());
          }
          note.application_id = application_id;
        }
        if let Some(text) = patch.text {
          note.text = text;
        }
        queries::write_note(tx, &note)?;
        Ok(note)
      })
      .await
  }

  async fn delete_note(&self, owner: UserId, id: i64) -> Result<()> {
    self
      .write(move |tx| {
        let removed = queries::delete_note(tx, owner, id)?;
        deleted(removed, Entity::Note, id)
      })
      .await
  }

  // ── Bulk transfer ─────────────────────────────────────────────────────

  async fn export_snapshot(&self) -> Result<Snapshot> {
    self
      .read(|conn| {
        Ok(Snapshot {
          companies:    queries::all_companies(conn)?,
          contacts:     queries::all_contacts(conn)?,
          applications: queries::all_applications(conn)?,
          notes:        queries::all_notes(conn)?,
        })
      })
      .await
  }

  async fn import_snapshot(&self, snapshot: Snapshot) -> Result<TransferSummary> {
    self
      .write(move |tx| {
        for company in &snapshot.companies {
          queries::upsert_company(tx, company)?;
        }
        for contact in &snapshot.contacts {
          queries::upsert_contact(tx, contact)?;
        }
        for application in &snapshot.applications {
          queries::upsert_application(tx, application)?;
        }
        for note in &snapshot.notes {
          queries::upsert_note(tx, note)?;
        }
        Ok(snapshot.summary())
      })
      .await
  }
}

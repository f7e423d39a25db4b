//! Synchronous, owner-scoped SQL used inside `tokio_rusqlite` closures.
//!
//! Every function takes a plain [`Connection`] so it can run either directly
//! or on a [`rusqlite::Transaction`] (which derefs to one). Entity lookups take
//! the requesting [`UserId`] and put it in the `WHERE` clause; the `*_by_id`
//! helpers are unscoped and only follow foreign keys out of a record that was
//! itself resolved through a scoped lookup.

use std::collections::HashMap;

use applytrack_core::{
  Entity, UserId, ValidationErrors,
  application::{Application, ApplicationChanges, ApplicationFilter, ApplicationView},
  company::{Company, CompanyFilter, NewCompany},
  contact::{Contact, ContactFilter, ContactView, NewContact},
  identity::{NewUser, User, UserCredentials},
  note::{Note, NoteFilter, NotePlan},
  validate::invalid_pk,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, Params, Row, params, params_from_iter};

use crate::{
  Error, Result,
  encode::{
    APPLICATION_COLUMNS, COMPANY_COLUMNS, CONTACT_COLUMNS, NOTE_COLUMNS,
    RawApplication, RawNote, encode_date, encode_dt, encode_status, read_company,
    read_contact,
  },
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

pub fn not_found(entity: Entity, id: i64) -> Error {
  applytrack_core::Error::not_found(entity, id).into()
}

/// `LIKE` pattern for a substring search; `None` for an absent or blank term.
/// Matched with `ESCAPE '\'`.
fn like_pattern(search: Option<&str>) -> Option<String> {
  let term = search?.trim();
  if term.is_empty() {
    return None;
  }
  let escaped = term
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  Some(format!("%{escaped}%"))
}

fn exists(conn: &Connection, sql: &str, params: impl Params) -> Result<bool> {
  Ok(conn.query_row(sql, params, |_| Ok(())).optional()?.is_some())
}

fn collect<T>(
  conn: &Connection,
  sql: &str,
  params: impl Params,
  map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map(params, map)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── Accounts ────────────────────────────────────────────────────────────────

pub fn insert_user(conn: &Connection, input: NewUser, now: DateTime<Utc>) -> Result<User> {
  let mut errors = ValidationErrors::new();
  if exists(conn, "SELECT 1 FROM users WHERE username = ?1", params![input.username])? {
    errors.add("username", "A user with that username already exists.");
  }
  if exists(conn, "SELECT 1 FROM users WHERE email = ?1", params![input.email])? {
    errors.add("email", "A user with that email address already exists.");
  }
  errors.finish(())?;

  conn.execute(
    "INSERT INTO users (username, email, password_hash, created_at)
     VALUES (?1, ?2, ?3, ?4)",
    params![input.username, input.email, input.password_hash, encode_dt(now)],
  )?;
  Ok(User {
    id:       UserId(conn.last_insert_rowid()),
    username: input.username,
    email:    input.email,
  })
}

pub fn select_credentials(conn: &Connection, email: &str) -> Result<Option<UserCredentials>> {
  let found = conn
    .query_row(
      "SELECT id, username, email, password_hash FROM users WHERE email = ?1",
      params![email],
      |r| {
        Ok(UserCredentials {
          user:          User {
            id:       UserId(r.get(0)?),
            username: r.get(1)?,
            email:    r.get(2)?,
          },
          password_hash: r.get(3)?,
        })
      },
    )
    .optional()?;
  Ok(found)
}

/// Replace whatever token `user` held with `digest`.
pub fn replace_token(
  conn: &Connection,
  user: UserId,
  digest: &str,
  now: DateTime<Utc>,
) -> Result<()> {
  conn.execute("DELETE FROM tokens WHERE user_id = ?1", params![user.0])?;
  conn.execute(
    "INSERT INTO tokens (digest, user_id, created_at) VALUES (?1, ?2, ?3)",
    params![digest, user.0, encode_dt(now)],
  )?;
  Ok(())
}

pub fn select_token_user(conn: &Connection, digest: &str) -> Result<Option<User>> {
  let found = conn
    .query_row(
      "SELECT u.id, u.username, u.email
       FROM tokens t JOIN users u ON u.id = t.user_id
       WHERE t.digest = ?1",
      params![digest],
      |r| {
        Ok(User {
          id:       UserId(r.get(0)?),
          username: r.get(1)?,
          email:    r.get(2)?,
        })
      },
    )
    .optional()?;
  Ok(found)
}

// ─── Companies ───────────────────────────────────────────────────────────────

pub fn select_companies(
  conn: &Connection,
  owner: UserId,
  filter: &CompanyFilter,
) -> Result<Vec<Company>> {
  let sql = format!(
    "SELECT {COMPANY_COLUMNS} FROM companies co
     WHERE co.user_id = ?1
       AND (?2 IS NULL OR co.name LIKE ?2 ESCAPE '\\' OR co.industry LIKE ?2 ESCAPE '\\')
     ORDER BY co.name, co.id"
  );
  let pattern = like_pattern(filter.search.as_deref());
  collect(conn, &sql, params![owner.0, pattern], |r| read_company(r, 0))
}

pub fn select_company(conn: &Connection, owner: UserId, id: i64) -> Result<Option<Company>> {
  let sql =
    format!("SELECT {COMPANY_COLUMNS} FROM companies co WHERE co.id = ?1 AND co.user_id = ?2");
  let found = conn
    .query_row(&sql, params![id, owner.0], |r| read_company(r, 0))
    .optional()?;
  Ok(found)
}

fn company_by_id(conn: &Connection, id: i64) -> Result<Company> {
  let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies co WHERE co.id = ?1");
  conn
    .query_row(&sql, params![id], |r| read_company(r, 0))
    .optional()?
    .ok_or_else(|| not_found(Entity::Company, id))
}

/// Reject a name `owner` already uses for another company.
fn check_company_name(
  conn: &Connection,
  owner: UserId,
  name: &str,
  except: Option<i64>,
) -> Result<()> {
  let taken = exists(
    conn,
    "SELECT 1 FROM companies
     WHERE user_id = ?1 AND name = ?2 AND (?3 IS NULL OR id != ?3)",
    params![owner.0, name, except],
  )?;
  if taken {
    let message = "A company with this name already exists.";
    return Err(applytrack_core::Error::invalid("name", message).into());
  }
  Ok(())
}

pub fn insert_company(conn: &Connection, owner: UserId, input: NewCompany) -> Result<Company> {
  check_company_name(conn, owner, &input.name, None)?;
  conn.execute(
    "INSERT INTO companies (user_id, name, website, industry) VALUES (?1, ?2, ?3, ?4)",
    params![owner.0, input.name, input.website, input.industry],
  )?;
  Ok(Company {
    id:       conn.last_insert_rowid(),
    owner:    Some(owner),
    name:     input.name,
    website:  input.website,
    industry: input.industry,
  })
}

pub fn write_company(conn: &Connection, owner: UserId, company: &Company) -> Result<()> {
  check_company_name(conn, owner, &company.name, Some(company.id))?;
  conn.execute(
    "UPDATE companies SET name = ?1, website = ?2, industry = ?3
     WHERE id = ?4 AND user_id = ?5",
    params![company.name, company.website, company.industry, company.id, owner.0],
  )?;
  Ok(())
}

/// Delete a directly owned row. Returns whether a row went away.
pub fn delete_owned(conn: &Connection, table: &str, owner: UserId, id: i64) -> Result<bool> {
  let sql = format!("DELETE FROM {table} WHERE id = ?1 AND user_id = ?2");
  Ok(conn.execute(&sql, params![id, owner.0])? > 0)
}

// ─── Contacts ────────────────────────────────────────────────────────────────

fn contact_view_select() -> String {
  format!(
    "SELECT {CONTACT_COLUMNS}, {COMPANY_COLUMNS}
     FROM contacts ct JOIN companies co ON co.id = ct.company_id"
  )
}

fn read_contact_view(row: &Row<'_>) -> rusqlite::Result<ContactView> {
  Ok(ContactView {
    contact: read_contact(row, 0)?,
    company: read_company(row, 8)?,
  })
}

pub fn select_contacts(
  conn: &Connection,
  owner: UserId,
  filter: &ContactFilter,
) -> Result<Vec<ContactView>> {
  let sql = format!(
    "{}
     WHERE ct.user_id = ?1
       AND (?2 IS NULL OR ct.company_id = ?2)
       AND (?3 IS NULL
            OR ct.first_name LIKE ?3 ESCAPE '\\'
            OR ct.last_name LIKE ?3 ESCAPE '\\'
            OR ct.email LIKE ?3 ESCAPE '\\'
            OR co.name LIKE ?3 ESCAPE '\\')
     ORDER BY ct.last_name, ct.first_name, ct.id",
    contact_view_select()
  );
  let pattern = like_pattern(filter.search.as_deref());
  collect(conn, &sql, params![owner.0, filter.company_id, pattern], read_contact_view)
}

pub fn select_contact(conn: &Connection, owner: UserId, id: i64) -> Result<Option<ContactView>> {
  let sql = format!("{} WHERE ct.id = ?1 AND ct.user_id = ?2", contact_view_select());
  let found = conn
    .query_row(&sql, params![id, owner.0], read_contact_view)
    .optional()?;
  Ok(found)
}

fn contact_by_id(conn: &Connection, id: i64) -> Result<Option<ContactView>> {
  let sql = format!("{} WHERE ct.id = ?1", contact_view_select());
  Ok(conn.query_row(&sql, params![id], read_contact_view).optional()?)
}

fn owns(conn: &Connection, table: &str, owner: UserId, id: i64) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {table} WHERE id = ?1 AND user_id = ?2");
  exists(conn, &sql, params![id, owner.0])
}

/// Record an `Invalid pk` error on `field` unless `owner` owns row `id` of
/// `table`.
fn check_reference(
  conn: &Connection,
  errors: &mut ValidationErrors,
  table: &str,
  field: &str,
  owner: UserId,
  id: i64,
) -> Result<()> {
  if !owns(conn, table, owner, id)? {
    errors.add(field, invalid_pk(id));
  }
  Ok(())
}

pub fn insert_contact(conn: &Connection, owner: UserId, input: NewContact) -> Result<ContactView> {
  let mut errors = ValidationErrors::new();
  check_reference(conn, &mut errors, "companies", "company_id", owner, input.company_id)?;
  errors.finish(())?;

  conn.execute(
    "INSERT INTO contacts
       (user_id, company_id, first_name, last_name, email, phone, position)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    params![
      owner.0,
      input.company_id,
      input.first_name,
      input.last_name,
      input.email,
      input.phone,
      input.position,
    ],
  )?;
  let id = conn.last_insert_rowid();
  select_contact(conn, owner, id)?.ok_or_else(|| not_found(Entity::Contact, id))
}

pub fn write_contact(conn: &Connection, owner: UserId, contact: &Contact) -> Result<()> {
  let mut errors = ValidationErrors::new();
  check_reference(conn, &mut errors, "companies", "company_id", owner, contact.company_id)?;
  errors.finish(())?;

  conn.execute(
    "UPDATE contacts
     SET company_id = ?1, first_name = ?2, last_name = ?3,
         email = ?4, phone = ?5, position = ?6
     WHERE id = ?7 AND user_id = ?8",
    params![
      contact.company_id,
      contact.first_name,
      contact.last_name,
      contact.email,
      contact.phone,
      contact.position,
      contact.id,
      owner.0,
    ],
  )?;
  Ok(())
}

// ─── Applications ────────────────────────────────────────────────────────────

/// Company columns of a contact's own employer, joined as `cc`.
const CONTACT_COMPANY_COLUMNS: &str = "cc.id, cc.user_id, cc.name, cc.website, cc.industry";

/// One listed row: the application, its company, and its contact if any.
fn read_listed_application(
  row: &Row<'_>,
) -> rusqlite::Result<(RawApplication, Company, Option<ContactView>)> {
  let contact = match row.get::<_, Option<i64>>(20)? {
    Some(_) => Some(ContactView {
      contact: read_contact(row, 20)?,
      company: read_company(row, 28)?,
    }),
    None => None,
  };
  Ok((RawApplication::from_row(row)?, read_company(row, 15)?, contact))
}

/// The owner's applications with company and contact joined in and notes
/// loaded in one further query.
pub fn select_applications(
  conn: &Connection,
  owner: UserId,
  filter: &ApplicationFilter,
) -> Result<Vec<ApplicationView>> {
  let sql = format!(
    "SELECT {APPLICATION_COLUMNS}, {COMPANY_COLUMNS}, {CONTACT_COLUMNS}, {CONTACT_COMPANY_COLUMNS}
     FROM applications a
     JOIN companies co ON co.id = a.company_id
     LEFT JOIN contacts ct ON ct.id = a.contact_id
     LEFT JOIN companies cc ON cc.id = ct.company_id
     WHERE a.user_id = ?1
       AND (?2 IS NULL OR a.status = ?2)
       AND (?3 IS NULL OR a.company_id = ?3)
       AND (?4 IS NULL OR a.job_title LIKE ?4 ESCAPE '\\' OR co.name LIKE ?4 ESCAPE '\\')
     ORDER BY a.created_at DESC, a.id DESC"
  );
  let status = filter.status.map(encode_status);
  let pattern = like_pattern(filter.search.as_deref());
  let rows = collect(
    conn,
    &sql,
    params![owner.0, status, filter.company_id, pattern],
    read_listed_application,
  )?;

  let ids: Vec<i64> = rows.iter().map(|(raw, ..)| raw.id).collect();
  let mut notes = notes_of_many(conn, &ids)?;
  rows
    .into_iter()
    .map(|(raw, company, contact)| -> Result<ApplicationView> {
      let application = raw.into_application()?;
      let notes = notes.remove(&application.id).unwrap_or_default();
      Ok(ApplicationView::new(application, company, contact, notes))
    })
    .collect()
}

pub fn select_application(
  conn: &Connection,
  owner: UserId,
  id: i64,
) -> Result<Option<Application>> {
  let sql = format!(
    "SELECT {APPLICATION_COLUMNS} FROM applications a WHERE a.id = ?1 AND a.user_id = ?2"
  );
  conn
    .query_row(&sql, params![id, owner.0], RawApplication::from_row)
    .optional()?
    .map(RawApplication::into_application)
    .transpose()
}

/// Newest first.
pub fn notes_of(conn: &Connection, application_id: i64) -> Result<Vec<Note>> {
  let sql = format!(
    "SELECT {NOTE_COLUMNS} FROM notes n
     WHERE n.application_id = ?1
     ORDER BY n.created_at DESC, n.id DESC"
  );
  let raws = collect(conn, &sql, params![application_id], RawNote::from_row)?;
  raws.into_iter().map(RawNote::into_note).collect()
}

/// Notes of every application in `ids`, grouped by application, newest
/// first within each group.
fn notes_of_many(conn: &Connection, ids: &[i64]) -> Result<HashMap<i64, Vec<Note>>> {
  let mut grouped: HashMap<i64, Vec<Note>> = HashMap::new();
  if ids.is_empty() {
    return Ok(grouped);
  }
  let placeholders = vec!["?"; ids.len()].join(", ");
  let sql = format!(
    "SELECT {NOTE_COLUMNS} FROM notes n
     WHERE n.application_id IN ({placeholders})
     ORDER BY n.created_at DESC, n.id DESC"
  );
  for raw in collect(conn, &sql, params_from_iter(ids), RawNote::from_row)? {
    let note = raw.into_note()?;
    grouped.entry(note.application_id).or_default().push(note);
  }
  Ok(grouped)
}

/// Embed company, contact and notes.
pub fn expand(conn: &Connection, application: Application) -> Result<ApplicationView> {
  let company = company_by_id(conn, application.company_id)?;
  let contact = match application.contact_id {
    Some(id) => contact_by_id(conn, id)?,
    None => None,
  };
  let notes = notes_of(conn, application.id)?;
  Ok(ApplicationView::new(application, company, contact, notes))
}

/// Collect `Invalid pk` errors for the company and contact an application
/// change points at.
pub fn check_application_references(
  conn: &Connection,
  owner: UserId,
  changes: &ApplicationChanges,
) -> Result<ValidationErrors> {
  let mut errors = ValidationErrors::new();
  if let Some(company_id) = changes.company_id {
    check_reference(conn, &mut errors, "companies", "company_id", owner, company_id)?;
  }
  if let Some(Some(contact_id)) = changes.contact_id {
    check_reference(conn, &mut errors, "contacts", "contact_id", owner, contact_id)?;
  }
  Ok(errors)
}

pub fn insert_application(conn: &Connection, application: &Application) -> Result<i64> {
  conn.execute(
    "INSERT INTO applications
       (user_id, job_title, company_id, contact_id, status, applied_on,
        interview_on, offer_on, rejected_on, follow_up_on, job_posting_link,
        salary_expectation, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    params![
      application.owner.0,
      application.job_title,
      application.company_id,
      application.contact_id,
      encode_status(application.status),
      application.applied_on.map(encode_date),
      application.interview_on.map(encode_date),
      application.offer_on.map(encode_date),
      application.rejected_on.map(encode_date),
      application.follow_up_on.map(encode_date),
      application.job_posting_link,
      application.salary_expectation,
      encode_dt(application.created_at),
      encode_dt(application.updated_at),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn write_application(conn: &Connection, application: &Application) -> Result<()> {
  conn.execute(
    "UPDATE applications
     SET job_title = ?1, company_id = ?2, contact_id = ?3, status = ?4,
         applied_on = ?5, interview_on = ?6, offer_on = ?7, rejected_on = ?8,
         follow_up_on = ?9, job_posting_link = ?10, salary_expectation = ?11,
         updated_at = ?12
     WHERE id = ?13 AND user_id = ?14",
    params![
      application.job_title,
      application.company_id,
      application.contact_id,
      encode_status(application.status),
      application.applied_on.map(encode_date),
      application.interview_on.map(encode_date),
      application.offer_on.map(encode_date),
      application.rejected_on.map(encode_date),
      application.follow_up_on.map(encode_date),
      application.job_posting_link,
      application.salary_expectation,
      encode_dt(application.updated_at),
      application.id,
      application.owner.0,
    ],
  )?;
  Ok(())
}

pub fn apply_note_plan(
  conn: &Connection,
  application_id: i64,
  plan: NotePlan,
  now: DateTime<Utc>,
) -> Result<()> {
  for update in plan.updates {
    conn.execute(
      "UPDATE notes SET text = ?1 WHERE id = ?2 AND application_id = ?3",
      params![update.text, update.id, application_id],
    )?;
  }
  for text in plan.inserts {
    insert_note(conn, application_id, text, now)?;
  }
  for id in plan.deletions {
    conn.execute(
      "DELETE FROM notes WHERE id = ?1 AND application_id = ?2",
      params![id, application_id],
    )?;
  }
  Ok(())
}

// ─── Notes ───────────────────────────────────────────────────────────────────

pub fn select_notes(conn: &Connection, owner: UserId, filter: &NoteFilter) -> Result<Vec<Note>> {
  let sql = format!(
    "SELECT {NOTE_COLUMNS}
     FROM notes n JOIN applications a ON a.id = n.application_id
     WHERE a.user_id = ?1
       AND (?2 IS NULL OR n.application_id = ?2)
       AND (?3 IS NULL OR n.text LIKE ?3 ESCAPE '\\' OR a.job_title LIKE ?3 ESCAPE '\\')
     ORDER BY n.created_at DESC, n.id DESC"
  );
  let pattern = like_pattern(filter.search.as_deref());
  let raws = collect(
    conn,
    &sql,
    params![owner.0, filter.application_id, pattern],
    RawNote::from_row,
  )?;
  raws.into_iter().map(RawNote::into_note).collect()
}

pub fn select_note(conn: &Connection, owner: UserId, id: i64) -> Result<Option<Note>> {
  let sql = format!(
    "SELECT {NOTE_COLUMNS}
     FROM notes n JOIN applications a ON a.id = n.application_id
     WHERE n.id = ?1 AND a.user_id = ?2"
  );
  conn
    .query_row(&sql, params![id, owner.0], RawNote::from_row)
    .optional()?
    .map(RawNote::into_note)
    .transpose()
}

pub fn owns_application(conn: &Connection, owner: UserId, id: i64) -> Result<bool> {
  owns(conn, "applications", owner, id)
}

pub fn insert_note(
  conn: &Connection,
  application_id: i64,
  text: String,
  now: DateTime<Utc>,
) -> Result<Note> {
  conn.execute(
    "INSERT INTO notes (application_id, text, created_at) VALUES (?1, ?2, ?3)",
    params![application_id, text, encode_dt(now)],
  )?;
  Ok(Note {
    id: conn.last_insert_rowid(),
    application_id,
    text,
    created_at: now,
  })
}

pub fn write_note(conn: &Connection, note: &Note) -> Result<()> {
  conn.execute(
    "UPDATE notes SET application_id = ?1, text = ?2 WHERE id = ?3",
    params![note.application_id, note.text, note.id],
  )?;
  Ok(())
}

pub fn delete_note(conn: &Connection, owner: UserId, id: i64) -> Result<bool> {
  let deleted = conn.execute(
    "DELETE FROM notes
     WHERE id = ?1
       AND application_id IN (SELECT id FROM applications WHERE user_id = ?2)",
    params![id, owner.0],
  )?;
  Ok(deleted > 0)
}

// ─── Bulk transfer ───────────────────────────────────────────────────────────

pub fn all_companies(conn: &Connection) -> Result<Vec<Company>> {
  let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies co ORDER BY co.id");
  collect(conn, &sql, params![], |r| read_company(r, 0))
}

pub fn all_contacts(conn: &Connection) -> Result<Vec<Contact>> {
  let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts ct ORDER BY ct.id");
  collect(conn, &sql, params![], |r| read_contact(r, 0))
}

pub fn all_applications(conn: &Connection) -> Result<Vec<Application>> {
  let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications a ORDER BY a.id");
  let raws = collect(conn, &sql, params![], RawApplication::from_row)?;
  raws.into_iter().map(RawApplication::into_application).collect()
}

pub fn all_notes(conn: &Connection) -> Result<Vec<Note>> {
  let sql = format!("SELECT {NOTE_COLUMNS} FROM notes n ORDER BY n.id");
  let raws = collect(conn, &sql, params![], RawNote::from_row)?;
  raws.into_iter().map(RawNote::into_note).collect()
}

pub fn upsert_company(conn: &Connection, c: &Company) -> Result<()> {
  conn.execute(
    "INSERT INTO companies (id, user_id, name, website, industry)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT (id) DO UPDATE SET
       user_id = excluded.user_id, name = excluded.name,
       website = excluded.website, industry = excluded.industry",
    params![c.id, c.owner.map(|o| o.0), c.name, c.website, c.industry],
  )?;
  Ok(())
}

pub fn upsert_contact(conn: &Connection, c: &Contact) -> Result<()> {
  conn.execute(
    "INSERT INTO contacts
       (id, user_id, company_id, first_name, last_name, email, phone, position)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
     ON CONFLICT (id) DO UPDATE SET
       user_id = excluded.user_id, company_id = excluded.company_id,
       first_name = excluded.first_name, last_name = excluded.last_name,
       email = excluded.email, phone = excluded.phone, position = excluded.position",
    params![
      c.id,
      c.owner.map(|o| o.0),
      c.company_id,
      c.first_name,
      c.last_name,
      c.email,
      c.phone,
      c.position,
    ],
  )?;
  Ok(())
}

pub fn upsert_application(conn: &Connection, a: &Application) -> Result<()> {
  conn.execute(
    "INSERT INTO applications
       (id, user_id, job_title, company_id, contact_id, status, applied_on,
        interview_on, offer_on, rejected_on, follow_up_on, job_posting_link,
        salary_expectation, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
     ON CONFLICT (id) DO UPDATE SET
       user_id = excluded.user_id, job_title = excluded.job_title,
       company_id = excluded.company_id, contact_id = excluded.contact_id,
       status = excluded.status, applied_on = excluded.applied_on,
       interview_on = excluded.interview_on, offer_on = excluded.offer_on,
       rejected_on = excluded.rejected_on, follow_up_on = excluded.follow_up_on,
       job_posting_link = excluded.job_posting_link,
       salary_expectation = excluded.salary_expectation,
       created_at = excluded.created_at, updated_at = excluded.updated_at",
    params![
      a.id,
      a.owner.0,
      a.job_title,
      a.company_id,
      a.contact_id,
      encode_status(a.status),
      a.applied_on.map(encode_date),
      a.interview_on.map(encode_date),
      a.offer_on.map(encode_date),
      a.rejected_on.map(encode_date),
      a.follow_up_on.map(encode_date),
      a.job_posting_link,
      a.salary_expectation,
      encode_dt(a.created_at),
      encode_dt(a.updated_at),
    ],
  )?;
  Ok(())
}

pub fn upsert_note(conn: &Connection, n: &Note) -> Result<()> {
  conn.execute(
    "INSERT INTO notes (id, application_id, text, created_at)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (id) DO UPDATE SET
       application_id = excluded.application_id, text = excluded.text,
       created_at = excluded.created_at",
    params![n.id, n.application_id, n.text, encode_dt(n.created_at)],
  )?;
  Ok(())
}

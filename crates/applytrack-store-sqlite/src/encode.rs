//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that text ordering matches time ordering. Calendar dates are
//! stored as `YYYY-MM-DD`.

use applytrack_core::{
  UserId,
  application::{Application, ApplicationStatus},
  company::Company,
  contact::Contact,
  note::Note,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// The current instant at the precision the columns keep.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── ApplicationStatus ───────────────────────────────────────────────────────

pub fn encode_status(s: ApplicationStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<ApplicationStatus> {
  s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
}

// ─── Plain rows ──────────────────────────────────────────────────────────────
//
// Companies and contacts hold no encoded columns and map straight from a row.
// `offset` is the index of the first column, for joined selects.

pub const COMPANY_COLUMNS: &str = "co.id, co.user_id, co.name, co.website, co.industry";

pub fn read_company(row: &Row<'_>, offset: usize) -> rusqlite::Result<Company> {
  Ok(Company {
    id:       row.get(offset)?,
    owner:    row.get::<_, Option<i64>>(offset + 1)?.map(UserId),
    name:     row.get(offset + 2)?,
    website:  row.get(offset + 3)?,
    industry: row.get(offset + 4)?,
  })
}

pub const CONTACT_COLUMNS: &str = "ct.id, ct.user_id, ct.company_id, ct.first_name, \
                                   ct.last_name, ct.email, ct.phone, ct.position";

pub fn read_contact(row: &Row<'_>, offset: usize) -> rusqlite::Result<Contact> {
  Ok(Contact {
    id:         row.get(offset)?,
    owner:      row.get::<_, Option<i64>>(offset + 1)?.map(UserId),
    company_id: row.get(offset + 2)?,
    first_name: row.get(offset + 3)?,
    last_name:  row.get(offset + 4)?,
    email:      row.get(offset + 5)?,
    phone:      row.get(offset + 6)?,
    position:   row.get(offset + 7)?,
  })
}

// ─── Encoded rows ────────────────────────────────────────────────────────────

pub const APPLICATION_COLUMNS: &str = "a.id, a.user_id, a.job_title, a.company_id, \
                                       a.contact_id, a.status, a.applied_on, \
                                       a.interview_on, a.offer_on, a.rejected_on, \
                                       a.follow_up_on, a.job_posting_link, \
                                       a.salary_expectation, a.created_at, a.updated_at";

/// Raw values read directly from an `applications` row.
pub struct RawApplication {
  pub id:                 i64,
  pub user_id:            i64,
  pub job_title:          String,
  pub company_id:         i64,
  pub contact_id:         Option<i64>,
  pub status:             String,
  pub applied_on:         Option<String>,
  pub interview_on:       Option<String>,
  pub offer_on:           Option<String>,
  pub rejected_on:        Option<String>,
  pub follow_up_on:       Option<String>,
  pub job_posting_link:   Option<String>,
  pub salary_expectation: Option<u32>,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawApplication {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      user_id:            row.get(1)?,
      job_title:          row.get(2)?,
      company_id:         row.get(3)?,
      contact_id:         row.get(4)?,
      status:             row.get(5)?,
      applied_on:         row.get(6)?,
      interview_on:       row.get(7)?,
      offer_on:           row.get(8)?,
      rejected_on:        row.get(9)?,
      follow_up_on:       row.get(10)?,
      job_posting_link:   row.get(11)?,
      salary_expectation: row.get(12)?,
      created_at:         row.get(13)?,
      updated_at:         row.get(14)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      id:                 self.id,
      owner:              UserId(self.user_id),
      job_title:          self.job_title,
      company_id:         self.company_id,
      contact_id:         self.contact_id,
      status:             decode_status(&self.status)?,
      applied_on:         decode_opt_date(self.applied_on)?,
      interview_on:       decode_opt_date(self.interview_on)?,
      offer_on:           decode_opt_date(self.offer_on)?,
      rejected_on:        decode_opt_date(self.rejected_on)?,
      follow_up_on:       decode_opt_date(self.follow_up_on)?,
      job_posting_link:   self.job_posting_link,
      salary_expectation: self.salary_expectation,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_dt(&self.updated_at)?,
    })
  }
}

pub const NOTE_COLUMNS: &str = "n.id, n.application_id, n.text, n.created_at";

/// Raw values read directly from a `notes` row.
pub struct RawNote {
  pub id:             i64,
  pub application_id: i64,
  pub text:           String,
  pub created_at:     String,
}

impl RawNote {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      application_id: row.get(1)?,
      text:           row.get(2)?,
      created_at:     row.get(3)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:             self.id,
      application_id: self.application_id,
      text:           self.text,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_sort_as_text() {
    let earlier = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
      .unwrap()
      .with_timezone(&Utc);
    let later = earlier + chrono::Duration::microseconds(500);
    assert!(encode_dt(earlier) < encode_dt(later));
    assert_eq!(encode_dt(earlier), "2024-01-01T10:00:00.000000Z");
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }

  #[test]
  fn unknown_status_is_an_error() {
    assert!(matches!(decode_status("LOST"), Err(Error::UnknownStatus(_))));
    assert_eq!(decode_status("OFFER").unwrap(), ApplicationStatus::Offer);
  }
}

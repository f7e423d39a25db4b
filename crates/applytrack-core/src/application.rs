//! Job applications, their status machine labels, and their write inputs.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  UserId,
  company::Company,
  contact::ContactView,
  note::{Note, NoteDescriptor},
  validate::{
    REQUIRED, ValidationErrors, WriteMode, double_option, optional_date,
    optional_url, required_text,
  },
};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where an application stands. New applications start as [`Self::Draft`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
  #[default]
  Draft,
  Applied,
  Interview,
  Offer,
  Rejected,
  Withdrawn,
}

impl ApplicationStatus {
  pub const ALL: [Self; 6] = [
    Self::Draft,
    Self::Applied,
    Self::Interview,
    Self::Offer,
    Self::Rejected,
    Self::Withdrawn,
  ];

  /// The wire and column representation.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Draft => "DRAFT",
      Self::Applied => "APPLIED",
      Self::Interview => "INTERVIEW",
      Self::Offer => "OFFER",
      Self::Rejected => "REJECTED",
      Self::Withdrawn => "WITHDRAWN",
    }
  }

  /// Human-readable label shown as `status_display`.
  pub fn label(self) -> &'static str {
    match self {
      Self::Draft => "Entwurf",
      Self::Applied => "Beworben",
      Self::Interview => "Interview",
      Self::Offer => "Angebot erhalten",
      Self::Rejected => "Abgelehnt",
      Self::Withdrawn => "Zurückgezogen",
    }
  }

  /// Parse a client-supplied value, reporting failures against `field`.
  pub fn parse_field(value: &str, field: &str) -> Result<Self, ValidationErrors> {
    value
      .parse()
      .map_err(|message: String| ValidationErrors::single(field, message))
  }
}

impl FromStr for ApplicationStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| format!("\"{s}\" is not a valid choice."))
  }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// Largest salary figure accepted, matching a signed 32-bit column.
pub const MAX_SALARY: i64 = 2_147_483_647;

/// A job application. The owner is never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
  pub id:                 i64,
  pub owner:              UserId,
  pub job_title:          String,
  pub company_id:         i64,
  /// Cleared, not cascaded, when the contact is deleted.
  pub contact_id:         Option<i64>,
  #[serde(default)]
  pub status:             ApplicationStatus,
  pub applied_on:         Option<NaiveDate>,
  pub interview_on:       Option<NaiveDate>,
  pub offer_on:           Option<NaiveDate>,
  pub rejected_on:        Option<NaiveDate>,
  pub follow_up_on:       Option<NaiveDate>,
  pub job_posting_link:   Option<String>,
  pub salary_expectation: Option<u32>,
  /// Server-assigned; never changes after creation.
  pub created_at:         DateTime<Utc>,
  /// Server-assigned on every write.
  pub updated_at:         DateTime<Utc>,
}

/// The read model returned by the API: an application with its company,
/// contact and notes embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
  #[serde(flatten)]
  pub application:    Application,
  pub status_display: &'static str,
  pub company:        Company,
  pub contact:        Option<ContactView>,
  /// Newest first.
  pub notes:          Vec<Note>,
}

impl ApplicationView {
  pub fn new(
    application: Application,
    company: Company,
    contact: Option<ContactView>,
    notes: Vec<Note>,
  ) -> Self {
    Self {
      status_display: application.status.label(),
      application,
      company,
      contact,
      notes,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST`, `PUT` and `PATCH` on applications.
///
/// Nullable fields use a double `Option` so that an absent key (leave alone)
/// can be told apart from `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationInput {
  pub job_title:          Option<String>,
  pub company_id:         Option<i64>,
  #[serde(default, deserialize_with = "double_option")]
  pub contact_id:         Option<Option<i64>>,
  pub status:             Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub applied_on:         Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub interview_on:       Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub offer_on:           Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub rejected_on:        Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub follow_up_on:       Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub job_posting_link:   Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub salary_expectation: Option<Option<i64>>,
  /// `None` leaves notes untouched; `Some(vec![])` deletes them all.
  pub notes:              Option<Vec<NoteDescriptor>>,
}

/// Validated changes to an application. Used both for creation (after a
/// [`WriteMode::Full`] validation) and for updates. `None` leaves a field
/// alone.
#[derive(Debug, Clone, Default)]
pub struct ApplicationChanges {
  pub job_title:          Option<String>,
  pub company_id:         Option<i64>,
  pub contact_id:         Option<Option<i64>>,
  pub status:             Option<ApplicationStatus>,
  pub applied_on:         Option<Option<NaiveDate>>,
  pub interview_on:       Option<Option<NaiveDate>>,
  pub offer_on:           Option<Option<NaiveDate>>,
  pub rejected_on:        Option<Option<NaiveDate>>,
  pub follow_up_on:       Option<Option<NaiveDate>>,
  pub job_posting_link:   Option<Option<String>>,
  pub salary_expectation: Option<Option<u32>>,
  pub notes:              Option<Vec<NoteDescriptor>>,
}

impl ApplicationInput {
  pub fn validate(self, mode: WriteMode) -> Result<ApplicationChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if mode == WriteMode::Full && self.company_id.is_none() {
      errors.add("company_id", REQUIRED);
    }

    let status = match self.status.as_deref().map(str::parse::<ApplicationStatus>) {
      None => None,
      Some(Ok(s)) => Some(s),
      Some(Err(message)) => {
        errors.add("status", message);
        None
      }
    };

    let salary_expectation = match self.salary_expectation {
      Some(Some(v)) if v < 0 => {
        errors.add(
          "salary_expectation",
          "Ensure this value is greater than or equal to 0.",
        );
        None
      }
      Some(Some(v)) if v > MAX_SALARY => {
        errors.add(
          "salary_expectation",
          format!("Ensure this value is less than or equal to {MAX_SALARY}."),
        );
        None
      }
      // Bounds were checked above.
      other => other.map(|v| v.and_then(|v| u32::try_from(v).ok())),
    };

    let changes = ApplicationChanges {
      job_title: required_text(&mut errors, "job_title", self.job_title, mode, 255),
      company_id: self.company_id,
      contact_id: self.contact_id,
      status,
      applied_on: optional_date(&mut errors, "applied_on", self.applied_on),
      interview_on: optional_date(&mut errors, "interview_on", self.interview_on),
      offer_on: optional_date(&mut errors, "offer_on", self.offer_on),
      rejected_on: optional_date(&mut errors, "rejected_on", self.rejected_on),
      follow_up_on: optional_date(&mut errors, "follow_up_on", self.follow_up_on),
      job_posting_link: optional_url(
        &mut errors,
        "job_posting_link",
        self.job_posting_link,
        200,
      ),
      salary_expectation,
      notes: self.notes,
    };
    errors.finish(changes)
  }
}

impl ApplicationChanges {
  /// Copy every present scalar field onto `application`. Notes and the
  /// timestamps are the store's business.
  pub fn apply(&self, application: &mut Application) {
    if let Some(v) = &self.job_title {
      application.job_title = v.clone();
    }
    if let Some(v) = self.company_id {
      application.company_id = v;
    }
    if let Some(v) = self.contact_id {
      application.contact_id = v;
    }
    if let Some(v) = self.status {
      application.status = v;
    }
    if let Some(v) = self.applied_on {
      application.applied_on = v;
    }
    if let Some(v) = self.interview_on {
      application.interview_on = v;
    }
    if let Some(v) = self.offer_on {
      application.offer_on = v;
    }
    if let Some(v) = self.rejected_on {
      application.rejected_on = v;
    }
    if let Some(v) = self.follow_up_on {
      application.follow_up_on = v;
    }
    if let Some(v) = &self.job_posting_link {
      application.job_posting_link = v.clone();
    }
    if let Some(v) = self.salary_expectation {
      application.salary_expectation = v;
    }
  }
}

/// Parameters for [`crate::store::TrackerStore::list_applications`].
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
  pub status:     Option<ApplicationStatus>,
  pub company_id: Option<i64>,
  /// Substring match over job title and company name.
  pub search:     Option<String>,
}

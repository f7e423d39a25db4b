//! Whole-store snapshots used by the export and import commands.

use serde::{Deserialize, Serialize};

use crate::{application::Application, company::Company, contact::Contact, note::Note};

/// Every company, contact, application and note, across all owners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
  #[serde(default)]
  pub companies:    Vec<Company>,
  #[serde(default)]
  pub contacts:     Vec<Contact>,
  #[serde(default)]
  pub applications: Vec<Application>,
  #[serde(default)]
  pub notes:        Vec<Note>,
}

/// Record counts, logged by both commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
  pub companies:    usize,
  pub contacts:     usize,
  pub applications: usize,
  pub notes:        usize,
}

impl Snapshot {
  pub fn summary(&self) -> TransferSummary {
    TransferSummary {
      companies:    self.companies.len(),
      contacts:     self.contacts.len(),
      applications: self.applications.len(),
      notes:        self.notes.len(),
    }
  }
}

//! Notes and the reconciliation planner used by application updates.
//!
//! A note has no owner of its own; it belongs to whoever owns its
//! application. When an application update carries a `notes` list, the
//! persisted notes are brought into line with it by [`reconcile`]: matching
//! identifiers are rewritten in place, descriptors without an identifier
//! become new notes, and every note the list no longer mentions is deleted.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{REQUIRED, ValidationErrors, WriteMode};

/// A free-text note attached to an application. Newest first by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub id:             i64,
  pub application_id: i64,
  pub text:           String,
  /// Server-assigned; never changes after creation.
  pub created_at:     DateTime<Utc>,
}

/// One element of the `notes` list in an application update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteDescriptor {
  /// Identifier of an existing note to rewrite; absent for a new note.
  #[serde(default)]
  pub id:   Option<i64>,
  #[serde(default)]
  pub text: Option<String>,
}

// ─── Standalone note writes ──────────────────────────────────────────────────

/// JSON body accepted by `POST`, `PUT` and `PATCH` on `/notes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteInput {
  pub application_id: Option<i64>,
  pub text:           Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNote {
  pub application_id: i64,
  pub text:           String,
}

#[derive(Debug, Clone, Default)]
pub struct NotePatch {
  /// Move the note to another application of the same owner.
  pub application_id: Option<i64>,
  pub text:           Option<String>,
}

impl NoteInput {
  pub fn into_patch(self, mode: WriteMode) -> Result<NotePatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if mode == WriteMode::Full {
      if self.application_id.is_none() {
        errors.add("application_id", REQUIRED);
      }
      if self.text.is_none() {
        errors.add("text", REQUIRED);
      }
    }
    errors.finish(NotePatch {
      application_id: self.application_id,
      text:           self.text,
    })
  }

  pub fn into_new(self) -> Result<NewNote, ValidationErrors> {
    let patch = self.into_patch(WriteMode::Full)?;
    Ok(NewNote {
      application_id: patch.application_id.unwrap_or_default(),
      text:           patch.text.unwrap_or_default(),
    })
  }
}

/// Parameters for [`crate::store::TrackerStore::list_notes`].
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
  pub application_id: Option<i64>,
  /// Substring match over the note text and the application's job title.
  pub search:         Option<String>,
}

// ─── Reconciliation ──────────────────────────────────────────────────────────

/// An in-place text rewrite of an existing note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
  pub id:   i64,
  pub text: String,
}

/// The writes needed to bring an application's notes in line with an
/// incoming list. Produced by [`reconcile`], applied by the store inside the
/// same transaction as the application's own fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePlan {
  /// Existing notes whose text changes.
  pub updates:   Vec<NoteUpdate>,
  /// Texts of notes to create, in input order.
  pub inserts:   Vec<String>,
  /// Existing notes absent from the incoming list.
  pub deletions: Vec<i64>,
}

impl NotePlan {
  pub fn is_empty(&self) -> bool {
    self.updates.is_empty() && self.inserts.is_empty() && self.deletions.is_empty()
  }
}

/// Compute the writes that transition `current` (the application's notes)
/// to `incoming`.
///
/// A descriptor naming an identifier that is not among `current` is rejected:
/// it is either stale or belongs to another application, and the whole plan
/// fails with a validation error on `notes`.
pub fn reconcile(
  current: &[Note],
  incoming: &[NoteDescriptor],
) -> Result<NotePlan, ValidationErrors> {
  let by_id: HashMap<i64, &Note> = current.iter().map(|n| (n.id, n)).collect();

  let mut errors = ValidationErrors::new();
  let mut retained: HashSet<i64> = HashSet::new();
  // Desired text per retained note; the last descriptor for an id wins.
  let mut desired: HashMap<i64, String> = HashMap::new();
  let mut touched: Vec<i64> = Vec::new();
  let mut inserts = Vec::new();

  for descriptor in incoming {
    match descriptor.id {
      Some(id) => match by_id.get(&id) {
        Some(note) => {
          if retained.insert(id) {
            touched.push(id);
          }
          let text = descriptor.text.clone().unwrap_or_else(|| note.text.clone());
          desired.insert(id, text);
        }
        None => {
          errors.add("notes", format!("Note {id} does not belong to this application."));
        }
      },
      None => inserts.push(descriptor.text.clone().unwrap_or_default()),
    }
  }

  let updates = touched
    .into_iter()
    .filter_map(|id| {
      let text = desired.remove(&id)?;
      (by_id[&id].text != text).then_some(NoteUpdate { id, text })
    })
    .collect();

  let deletions = current
    .iter()
    .map(|n| n.id)
    .filter(|id| !retained.contains(id))
    .collect();

  errors.finish(NotePlan { updates, inserts, deletions })
}

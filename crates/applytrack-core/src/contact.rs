//! Contacts: people at a company.

use serde::{Deserialize, Serialize};

use crate::{
  UserId,
  company::Company,
  validate::{
    REQUIRED, ValidationErrors, WriteMode, optional_email, optional_text,
    required_text,
  },
};

/// A contact person. Deleting the company deletes the contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:         i64,
  pub owner:      Option<UserId>,
  pub company_id: i64,
  pub first_name: String,
  pub last_name:  String,
  #[serde(default)]
  pub email:      String,
  #[serde(default)]
  pub phone:      String,
  #[serde(default)]
  pub position:   String,
}

/// A contact together with its company, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ContactView {
  #[serde(flatten)]
  pub contact: Contact,
  pub company: Company,
}

/// JSON body accepted by `POST`, `PUT` and `PATCH` on contacts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
  pub company_id: Option<i64>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub position:   Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
  pub company_id: i64,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone:      String,
  pub position:   String,
}

#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
  pub company_id: Option<i64>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub position:   Option<String>,
}

impl ContactInput {
  pub fn into_patch(self, mode: WriteMode) -> Result<ContactPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if mode == WriteMode::Full && self.company_id.is_none() {
      errors.add("company_id", REQUIRED);
    }
    let patch = ContactPatch {
      company_id: self.company_id,
      first_name: required_text(&mut errors, "first_name", self.first_name, mode, 100),
      last_name:  required_text(&mut errors, "last_name", self.last_name, mode, 100),
      email:      optional_email(&mut errors, "email", self.email, 254),
      phone:      optional_text(&mut errors, "phone", self.phone, 50),
      position:   optional_text(&mut errors, "position", self.position, 100),
    };
    errors.finish(patch)
  }

  pub fn into_new(self) -> Result<NewContact, ValidationErrors> {
    let patch = self.into_patch(WriteMode::Full)?;
    Ok(NewContact {
      company_id: patch.company_id.unwrap_or_default(),
      first_name: patch.first_name.unwrap_or_default(),
      last_name:  patch.last_name.unwrap_or_default(),
      email:      patch.email.unwrap_or_default(),
      phone:      patch.phone.unwrap_or_default(),
      position:   patch.position.unwrap_or_default(),
    })
  }
}

impl ContactPatch {
  pub fn apply(self, contact: &mut Contact) {
    if let Some(v) = self.company_id {
      contact.company_id = v;
    }
    if let Some(v) = self.first_name {
      contact.first_name = v;
    }
    if let Some(v) = self.last_name {
      contact.last_name = v;
    }
    if let Some(v) = self.email {
      contact.email = v;
    }
    if let Some(v) = self.phone {
      contact.phone = v;
    }
    if let Some(v) = self.position {
      contact.position = v;
    }
  }
}

/// Parameters for [`crate::store::TrackerStore::list_contacts`].
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
  /// Restrict to contacts of this company. A company the requester does not
  /// own simply yields nothing.
  pub company_id: Option<i64>,
  /// Substring match over first name, last name, email and company name.
  pub search:     Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_write_requires_company_and_names() {
    let errors = ContactInput::default().into_new().unwrap_err();
    assert!(errors.contains("company_id"));
    assert!(errors.contains("first_name"));
    assert!(errors.contains("last_name"));
  }

  #[test]
  fn blank_email_is_allowed_but_garbage_is_not() {
    let mut input = ContactInput {
      company_id: Some(1),
      first_name: Some("Erika".into()),
      last_name:  Some("Musterfrau".into()),
      email:      Some(String::new()),
      ..Default::default()
    };
    assert!(input.clone().into_new().is_ok());

    input.email = Some("not-an-email".into());
    assert!(input.into_new().unwrap_err().contains("email"));
  }
}

//! Companies, the employers a user applies to.

use serde::{Deserialize, Serialize};

use crate::{
  UserId,
  validate::{
    ValidationErrors, WriteMode, double_option, optional_text, optional_url,
    required_text,
  },
};

/// A company record. `(owner, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
  pub id:       i64,
  /// `None` only for legacy rows; such rows are invisible to scoped queries.
  pub owner:    Option<UserId>,
  pub name:     String,
  pub website:  Option<String>,
  #[serde(default)]
  pub industry: String,
}

/// JSON body accepted by `POST`, `PUT` and `PATCH` on companies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyInput {
  pub name:     Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub website:  Option<Option<String>>,
  pub industry: Option<String>,
}

/// A validated company to be created for some owner.
#[derive(Debug, Clone)]
pub struct NewCompany {
  pub name:     String,
  pub website:  Option<String>,
  pub industry: String,
}

/// Validated changes to an existing company; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
  pub name:     Option<String>,
  pub website:  Option<Option<String>>,
  pub industry: Option<String>,
}

impl CompanyInput {
  pub fn into_patch(self, mode: WriteMode) -> Result<CompanyPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let patch = CompanyPatch {
      name:     required_text(&mut errors, "name", self.name, mode, 200),
      website:  optional_url(&mut errors, "website", self.website, 200),
      industry: optional_text(&mut errors, "industry", self.industry, 100),
    };
    errors.finish(patch)
  }

  pub fn into_new(self) -> Result<NewCompany, ValidationErrors> {
    let patch = self.into_patch(WriteMode::Full)?;
    Ok(NewCompany {
      name:     patch.name.unwrap_or_default(),
      website:  patch.website.flatten(),
      industry: patch.industry.unwrap_or_default(),
    })
  }
}

impl CompanyPatch {
  pub fn apply(self, company: &mut Company) {
    if let Some(name) = self.name {
      company.name = name;
    }
    if let Some(website) = self.website {
      company.website = website;
    }
    if let Some(industry) = self.industry {
      company.industry = industry;
    }
  }
}

/// Parameters for [`crate::store::TrackerStore::list_companies`].
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
  /// Case-insensitive substring match over name and industry.
  pub search: Option<String>,
}

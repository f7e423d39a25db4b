//! Static capability table for admin tooling.
//!
//! For each entity: which fields a listing shows, which query parameters
//! narrow it, and which fields the `search` parameter matches. The SQLite
//! backend's search predicates cover exactly the `searchable` fields listed
//! here.

use serde::Serialize;

use crate::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capability {
  pub entity:     Entity,
  pub listable:   &'static [&'static str],
  pub filterable: &'static [&'static str],
  pub searchable: &'static [&'static str],
}

pub const CAPABILITIES: &[Capability] = &[
  Capability {
    entity:     Entity::Company,
    listable:   &["name", "industry", "website"],
    filterable: &[],
    searchable: &["name", "industry"],
  },
  Capability {
    entity:     Entity::Contact,
    listable:   &["first_name", "last_name", "company", "position", "email"],
    filterable: &["company_id"],
    searchable: &["first_name", "last_name", "email", "company.name"],
  },
  Capability {
    entity:     Entity::Application,
    listable:   &["job_title", "company", "status", "applied_on", "created_at"],
    filterable: &["status", "company_id"],
    searchable: &["job_title", "company.name"],
  },
  Capability {
    entity:     Entity::Note,
    listable:   &["text", "application", "created_at"],
    filterable: &["application_id"],
    searchable: &["text", "application.job_title"],
  },
];

pub fn capability(entity: Entity) -> Option<&'static Capability> {
  CAPABILITIES.iter().find(|c| c.entity == entity)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_scoped_entity_has_one_entry() {
    for entity in [Entity::Company, Entity::Contact, Entity::Application, Entity::Note] {
      assert_eq!(
        CAPABILITIES.iter().filter(|c| c.entity == entity).count(),
        1,
        "{entity}"
      );
    }
    assert!(capability(Entity::User).is_none());
  }

  #[test]
  fn filterable_fields_are_query_parameters() {
    let apps = capability(Entity::Application).unwrap();
    assert_eq!(apps.filterable, ["status", "company_id"]);
  }
}

//! Integration tests for `SqliteStore` against an in-memory database.

use applytrack_core::{
  Entity, Error as CoreError, UserId,
  application::{ApplicationChanges, ApplicationFilter, ApplicationStatus},
  company::{CompanyFilter, CompanyPatch, NewCompany},
  contact::{ContactFilter, NewContact},
  identity::NewUser,
  note::{NewNote, NoteDescriptor, NoteFilter, NotePatch},
  store::TrackerStore,
  validate::invalid_pk,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str) -> UserId {
  s.create_user(NewUser {
    username:      name.into(),
    email:         format!("{name}@tech.sol"),
    password_hash: "$argon2id$stub".into(),
  })
  .await
  .unwrap()
  .id
}

async fn company(s: &SqliteStore, owner: UserId, name: &str) -> i64 {
  s.create_company(owner, NewCompany {
    name:     name.into(),
    website:  Some("https://tech.sol".into()),
    industry: "Software".into(),
  })
  .await
  .unwrap()
  .id
}

async fn contact(s: &SqliteStore, owner: UserId, company_id: i64) -> i64 {
  s.create_contact(owner, NewContact {
    company_id,
    first_name: "Erika".into(),
    last_name: "Musterfrau".into(),
    email: "e.musterfrau@tech.sol".into(),
    phone: String::new(),
    position: "HR Manager".into(),
  })
  .await
  .unwrap()
  .contact
  .id
}

fn application(company_id: i64, job_title: &str) -> ApplicationChanges {
  ApplicationChanges {
    job_title: Some(job_title.into()),
    company_id: Some(company_id),
    ..Default::default()
  }
}

fn existing(id: i64, text: &str) -> NoteDescriptor {
  NoteDescriptor { id: Some(id), text: Some(text.into()) }
}

fn fresh(text: &str) -> NoteDescriptor {
  NoteDescriptor { id: None, text: Some(text.into()) }
}

fn core(e: Error) -> CoreError { e.into() }

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_is_a_validation_error() {
  let s = store().await;
  user(&s, "erika").await;

  let err = s
    .create_user(NewUser {
      username:      "someone-else".into(),
      email:         "erika@tech.sol".into(),
      password_hash: "x".into(),
    })
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Validation(errors) => assert!(errors.contains("email")),
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn tokens_resolve_to_their_user() {
  let s = store().await;
  let id = user(&s, "erika").await;

  s.store_token(id, "digest-1".into()).await.unwrap();
  s.store_token(id, "digest-2".into()).await.unwrap();

  let resolved = s.resolve_token("digest-2".into()).await.unwrap().unwrap();
  assert_eq!(resolved.id, id);
  assert_eq!(resolved.username, "erika");
  assert!(s.resolve_token("unknown".into()).await.unwrap().is_none());

  // A newer token replaces the older one.
  assert!(s.resolve_token("digest-1".into()).await.unwrap().is_none());

  let creds = s
    .find_credentials("erika@tech.sol".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(creds.user.id, id);
  assert_eq!(creds.password_hash, "$argon2id$stub");
}

#[tokio::test]
async fn registration_stores_account_and_token_together() {
  let s = store().await;
  let erika = s
    .register_user(
      NewUser {
        username:      "erika".into(),
        email:         "erika@tech.sol".into(),
        password_hash: "x".into(),
      },
      "digest-erika".into(),
    )
    .await
    .unwrap();
  let resolved = s.resolve_token("digest-erika".into()).await.unwrap().unwrap();
  assert_eq!(resolved.id, erika.id);

  // The token insert fails on a digest collision, so the account goes too.
  let err = s
    .register_user(
      NewUser {
        username:      "max".into(),
        email:         "max@tech.sol".into(),
        password_hash: "x".into(),
      },
      "digest-erika".into(),
    )
    .await;
  assert!(err.is_err());
  assert!(s.find_credentials("max@tech.sol".into()).await.unwrap().is_none());
  let still = s.resolve_token("digest-erika".into()).await.unwrap().unwrap();
  assert_eq!(still.id, erika.id);

  // Nothing was left behind, so the same registration can be retried.
  s.register_user(
    NewUser {
      username:      "max".into(),
      email:         "max@tech.sol".into(),
      password_hash: "x".into(),
    },
    "digest-max".into(),
  )
  .await
  .unwrap();
}

// ─── Companies ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn company_names_are_unique_per_owner() {
  let s = store().await;
  let a = user(&s, "a").await;
  let b = user(&s, "b").await;
  company(&s, a, "Tech Solutions").await;

  let err = s
    .create_company(a, NewCompany {
      name:     "Tech Solutions".into(),
      website:  None,
      industry: String::new(),
    })
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Validation(errors) => assert!(errors.contains("name")),
    other => panic!("expected validation error, got {other:?}"),
  }

  // A different owner may reuse the name.
  company(&s, b, "Tech Solutions").await;
}

#[tokio::test]
async fn companies_list_by_name_and_search() {
  let s = store().await;
  let a = user(&s, "a").await;
  company(&s, a, "Zeta").await;
  company(&s, a, "Alpha").await;

  let all = s.list_companies(a, CompanyFilter::default()).await.unwrap();
  let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["Alpha", "Zeta"]);

  let hits = s
    .list_companies(a, CompanyFilter { search: Some("zet".into()) })
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Zeta");
}

#[tokio::test]
async fn company_patch_keeps_absent_fields() {
  let s = store().await;
  let a = user(&s, "a").await;
  let id = company(&s, a, "Tech Solutions").await;

  let updated = s
    .update_company(a, id, CompanyPatch {
      industry: Some("Consulting".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.name, "Tech Solutions");
  assert_eq!(updated.industry, "Consulting");
  assert_eq!(updated.website.as_deref(), Some("https://tech.sol"));
}

// ─── Ownership isolation ─────────────────────────────────────────────────────

#[tokio::test]
async fn foreign_application_is_invisible() {
  let s = store().await;
  let a = user(&s, "a").await;
  let b = user(&s, "b").await;
  let company_id = company(&s, a, "Tech Solutions").await;
  let app = s
    .create_application(a, application(company_id, "Senior Python Developer"))
    .await
    .unwrap();
  let id = app.application.id;

  assert!(
    s.list_applications(b, ApplicationFilter::default())
      .await
      .unwrap()
      .is_empty()
  );
  assert!(s.get_application(b, id).await.unwrap().is_none());

  let err = s
    .update_application(b, id, ApplicationChanges::default())
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::NotFound { entity: Entity::Application, .. }
  ));

  let err = s.delete_application(b, id).await.unwrap_err();
  assert!(matches!(core(err), CoreError::NotFound { .. }));

  // Still there for its owner.
  assert!(s.get_application(a, id).await.unwrap().is_some());
}

#[tokio::test]
async fn foreign_company_reference_is_an_invalid_pk() {
  let s = store().await;
  let a = user(&s, "a").await;
  let b = user(&s, "b").await;
  let theirs = company(&s, b, "Other Corp").await;

  let err = s
    .create_application(a, application(theirs, "Manager"))
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Validation(errors) => {
      assert_eq!(errors.messages("company_id"), [invalid_pk(theirs)]);
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn application_without_contact_embeds_null_contact() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;

  let view = s
    .create_application(a, application(company_id, "Senior Python Developer"))
    .await
    .unwrap();
  assert!(view.contact.is_none());
  assert_eq!(view.company.name, "Tech Solutions");
  assert_eq!(view.application.status, ApplicationStatus::Draft);
  assert_eq!(view.status_display, "Entwurf");
}

#[tokio::test]
async fn listed_applications_embed_company_contact_and_notes() {
  let s = store().await;
  let a = user(&s, "a").await;
  let employer = company(&s, a, "Tech Solutions").await;
  let agency = company(&s, a, "Recruiting GmbH").await;
  let recruiter = contact(&s, a, agency).await;

  let mut with_contact = application(employer, "Senior Python Developer");
  with_contact.contact_id = Some(Some(recruiter));
  with_contact.notes = Some(vec![fresh("first")]);
  let first = s.create_application(a, with_contact).await.unwrap().application.id;
  s.create_note(a, NewNote { application_id: first, text: "second".into() })
    .await
    .unwrap();

  let second = s
    .create_application(a, application(agency, "Data Engineer"))
    .await
    .unwrap()
    .application
    .id;

  let listed = s
    .list_applications(a, ApplicationFilter::default())
    .await
    .unwrap();
  assert_eq!(listed.len(), 2);

  for view in &listed {
    let single = s
      .get_application(a, view.application.id)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(view.application, single.application);
    assert_eq!(view.company, single.company);
    assert_eq!(view.notes, single.notes);
    assert_eq!(
      view.contact.as_ref().map(|c| (&c.contact, &c.company)),
      single.contact.as_ref().map(|c| (&c.contact, &c.company))
    );
  }

  let by_id = |id: i64| listed.iter().find(|v| v.application.id == id).unwrap();
  let joined = by_id(first);
  assert_eq!(joined.company.name, "Tech Solutions");
  let embedded = joined.contact.as_ref().unwrap();
  assert_eq!(embedded.contact.id, recruiter);
  assert_eq!(embedded.company.name, "Recruiting GmbH");
  let texts: Vec<&str> = joined.notes.iter().map(|n| n.text.as_str()).collect();
  assert_eq!(texts, ["second", "first"]);

  let bare = by_id(second);
  assert!(bare.contact.is_none());
  assert!(bare.notes.is_empty());
}

#[tokio::test]
async fn application_without_company_is_rejected() {
  let s = store().await;
  let a = user(&s, "a").await;

  let err = s
    .create_application(a, ApplicationChanges {
      job_title: Some("Invalid Application".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Validation(errors) => assert!(errors.contains("company_id")),
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn applications_filter_by_status_and_search() {
  let s = store().await;
  let a = user(&s, "a").await;
  let tech = company(&s, a, "Tech Solutions").await;
  let other = company(&s, a, "Innovate").await;

  let mut changes = application(tech, "Senior Python Developer");
  changes.status = Some(ApplicationStatus::Applied);
  s.create_application(a, changes).await.unwrap();
  s.create_application(a, application(other, "Data Engineer"))
    .await
    .unwrap();

  let applied = s
    .list_applications(a, ApplicationFilter {
      status: Some(ApplicationStatus::Applied),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(applied.len(), 1);
  assert_eq!(applied[0].application.job_title, "Senior Python Developer");

  let by_company_name = s
    .list_applications(a, ApplicationFilter {
      search: Some("innov".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_company_name.len(), 1);
  assert_eq!(by_company_name[0].application.job_title, "Data Engineer");
}

#[tokio::test]
async fn partial_update_clears_nullable_fields() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;
  let contact_id = contact(&s, a, company_id).await;

  let mut changes = application(company_id, "Senior Python Developer");
  changes.contact_id = Some(Some(contact_id));
  changes.salary_expectation = Some(Some(80_000));
  let created = s.create_application(a, changes).await.unwrap();
  assert_eq!(created.contact.as_ref().map(|c| c.contact.id), Some(contact_id));

  let updated = s
    .update_application(a, created.application.id, ApplicationChanges {
      contact_id: Some(None),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(updated.contact.is_none());
  assert_eq!(updated.application.salary_expectation, Some(80_000));
  assert_eq!(updated.application.created_at, created.application.created_at);
  assert!(updated.application.updated_at >= created.application.updated_at);
}

// ─── Note reconciliation ─────────────────────────────────────────────────────

#[tokio::test]
async fn reconciliation_updates_inserts_and_deletes() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;

  let mut changes = application(company_id, "Senior Python Developer");
  changes.notes = Some(vec![fresh("a"), fresh("b")]);
  let created = s.create_application(a, changes).await.unwrap();
  let id = created.application.id;
  let mut ids: Vec<i64> = created.notes.iter().map(|n| n.id).collect();
  ids.sort();
  let (first, second) = (ids[0], ids[1]);

  let updated = s
    .update_application(a, id, ApplicationChanges {
      notes: Some(vec![existing(first, "a2"), fresh("c")]),
      ..Default::default()
    })
    .await
    .unwrap();

  let mut notes: Vec<(i64, String)> = updated
    .notes
    .iter()
    .map(|n| (n.id, n.text.clone()))
    .collect();
  notes.sort();
  assert_eq!(notes.len(), 2);
  assert_eq!(notes[0], (first, "a2".to_owned()));
  assert_eq!(notes[1].1, "c");
  assert!(notes[1].0 > second);

  // The rewritten note kept its creation time.
  let original = created.notes.iter().find(|n| n.id == first).unwrap();
  let rewritten = updated.notes.iter().find(|n| n.id == first).unwrap();
  assert_eq!(original.created_at, rewritten.created_at);
}

#[tokio::test]
async fn reapplying_the_same_list_is_idempotent() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;

  let mut changes = application(company_id, "Senior Python Developer");
  changes.notes = Some(vec![fresh("first"), fresh("second")]);
  let created = s.create_application(a, changes).await.unwrap();
  let id = created.application.id;

  let list: Vec<NoteDescriptor> = created
    .notes
    .iter()
    .map(|n| existing(n.id, &n.text))
    .collect();
  let once = s
    .update_application(a, id, ApplicationChanges {
      notes: Some(list.clone()),
      ..Default::default()
    })
    .await
    .unwrap();
  let twice = s
    .update_application(a, id, ApplicationChanges {
      notes: Some(list),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(once.notes, created.notes);
  assert_eq!(twice.notes, created.notes);
}

#[tokio::test]
async fn absent_notes_are_untouched_and_empty_list_deletes() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;

  let mut changes = application(company_id, "Senior Python Developer");
  changes.notes = Some(vec![fresh("keep")]);
  let id = s.create_application(a, changes).await.unwrap().application.id;

  let untouched = s
    .update_application(a, id, ApplicationChanges {
      status: Some(ApplicationStatus::Interview),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(untouched.notes.len(), 1);

  let cleared = s
    .update_application(a, id, ApplicationChanges {
      notes: Some(vec![]),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(cleared.notes.is_empty());
  assert_eq!(cleared.application.status, ApplicationStatus::Interview);
}

#[tokio::test]
async fn unknown_note_id_rolls_back_the_whole_update() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;

  let mut changes = application(company_id, "Senior Python Developer");
  changes.notes = Some(vec![fresh("a")]);
  let created = s.create_application(a, changes).await.unwrap();
  let id = created.application.id;
  let note_id = created.notes[0].id;

  let err = s
    .update_application(a, id, ApplicationChanges {
      job_title: Some("Changed".into()),
      notes: Some(vec![existing(note_id, "a2"), existing(9_999, "x"), fresh("new")]),
      ..Default::default()
    })
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Validation(errors) => assert!(errors.contains("notes")),
    other => panic!("expected validation error, got {other:?}"),
  }

  let after = s.get_application(a, id).await.unwrap().unwrap();
  assert_eq!(after.application.job_title, "Senior Python Developer");
  assert_eq!(after.notes, created.notes);
}

#[tokio::test]
async fn notes_of_another_application_cannot_be_claimed() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;

  let mut first = application(company_id, "First");
  first.notes = Some(vec![fresh("mine")]);
  let first = s.create_application(a, first).await.unwrap();
  let second = s
    .create_application(a, application(company_id, "Second"))
    .await
    .unwrap();

  let err = s
    .update_application(a, second.application.id, ApplicationChanges {
      notes: Some(vec![existing(first.notes[0].id, "stolen")]),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::Validation(_)));

  let first_after = s.get_application(a, first.application.id).await.unwrap().unwrap();
  assert_eq!(first_after.notes[0].text, "mine");
}

// ─── Standalone notes ────────────────────────────────────────────────────────

#[tokio::test]
async fn note_on_foreign_application_is_forbidden() {
  let s = store().await;
  let a = user(&s, "a").await;
  let b = user(&s, "b").await;
  let company_id = company(&s, a, "Tech Solutions").await;
  let app_id = s
    .create_application(a, application(company_id, "Senior Python Developer"))
    .await
    .unwrap()
    .application
    .id;

  let err = s
    .create_note(b, NewNote { application_id: app_id, text: "sneaky".into() })
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::Permission(_)));

  let err = s
    .create_note(a, NewNote { application_id: 9_999, text: "x".into() })
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::Permission(_)));

  let note = s
    .create_note(a, NewNote { application_id: app_id, text: "ok".into() })
    .await
    .unwrap();
  assert!(s.get_note(b, note.id).await.unwrap().is_none());
  assert!(matches!(
    core(s.delete_note(b, note.id).await.unwrap_err()),
    CoreError::NotFound { entity: Entity::Note, .. }
  ));
}

#[tokio::test]
async fn moving_a_note_to_a_foreign_application_is_forbidden() {
  let s = store().await;
  let a = user(&s, "a").await;
  let b = user(&s, "b").await;
  let mine = company(&s, a, "Mine").await;
  let theirs = company(&s, b, "Theirs").await;
  let my_app = s.create_application(a, application(mine, "Mine")).await.unwrap();
  let their_app = s.create_application(b, application(theirs, "Theirs")).await.unwrap();

  let note = s
    .create_note(a, NewNote {
      application_id: my_app.application.id,
      text:           "hello".into(),
    })
    .await
    .unwrap();

  let err = s
    .update_note(a, note.id, NotePatch {
      application_id: Some(their_app.application.id),
      text:           None,
    })
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::Permission(_)));

  let edited = s
    .update_note(a, note.id, NotePatch { application_id: None, text: Some("edited".into()) })
    .await
    .unwrap();
  assert_eq!(edited.text, "edited");
  assert_eq!(edited.created_at, note.created_at);
}

#[tokio::test]
async fn notes_list_newest_first_and_search_job_title() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;
  let app_id = s
    .create_application(a, application(company_id, "Senior Python Developer"))
    .await
    .unwrap()
    .application
    .id;

  let older = s
    .create_note(a, NewNote { application_id: app_id, text: "first".into() })
    .await
    .unwrap();
  let newer = s
    .create_note(a, NewNote { application_id: app_id, text: "second".into() })
    .await
    .unwrap();

  let listed = s.list_notes(a, NoteFilter::default()).await.unwrap();
  let ids: Vec<i64> = listed.iter().map(|n| n.id).collect();
  assert_eq!(ids, [newer.id, older.id]);

  let hits = s
    .list_notes(a, NoteFilter { application_id: None, search: Some("python".into()) })
    .await
    .unwrap();
  assert_eq!(hits.len(), 2);
}

// ─── Cascades ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_a_company_cascades() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;
  contact(&s, a, company_id).await;
  let mut changes = application(company_id, "Senior Python Developer");
  changes.notes = Some(vec![fresh("gone soon")]);
  s.create_application(a, changes).await.unwrap();

  s.delete_company(a, company_id).await.unwrap();

  assert!(s.list_contacts(a, ContactFilter::default()).await.unwrap().is_empty());
  assert!(
    s.list_applications(a, ApplicationFilter::default())
      .await
      .unwrap()
      .is_empty()
  );
  assert!(s.list_notes(a, NoteFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_contact_only_clears_the_reference() {
  let s = store().await;
  let a = user(&s, "a").await;
  let company_id = company(&s, a, "Tech Solutions").await;
  let contact_id = contact(&s, a, company_id).await;
  let mut changes = application(company_id, "Senior Python Developer");
  changes.contact_id = Some(Some(contact_id));
  let id = s.create_application(a, changes).await.unwrap().application.id;

  let before = s.get_application(a, id).await.unwrap().unwrap().application;

  s.delete_contact(a, contact_id).await.unwrap();

  let after = s.get_application(a, id).await.unwrap().unwrap();
  assert!(after.contact.is_none());
  assert_eq!(after.application.contact_id, None);
  assert_eq!(after.application.job_title, before.job_title);
  assert_eq!(after.application.status, before.status);
  assert_eq!(after.application.company_id, before.company_id);
  assert_eq!(after.application.created_at, before.created_at);
  assert_eq!(after.application.updated_at, before.updated_at);
  assert_eq!(after.company.id, company_id);
}

// ─── Bulk transfer ───────────────────────────────────────────────────────────

#[tokio::test]
async fn export_then_import_reproduces_records() {
  let source = store().await;
  let a = user(&source, "a").await;
  let company_id = company(&source, a, "Tech Solutions").await;
  let contact_id = contact(&source, a, company_id).await;
  let mut changes = application(company_id, "Senior Python Developer");
  changes.contact_id = Some(Some(contact_id));
  changes.notes = Some(vec![fresh("one"), fresh("two")]);
  source.create_application(a, changes).await.unwrap();

  let snapshot = source.export_snapshot().await.unwrap();
  assert_eq!(snapshot.notes.len(), 2);

  let target = store().await;
  assert_eq!(user(&target, "a").await, a);
  let summary = target.import_snapshot(snapshot.clone()).await.unwrap();
  assert_eq!(summary, snapshot.summary());
  assert_eq!(target.export_snapshot().await.unwrap(), snapshot);

  // Importing again upserts instead of duplicating.
  target.import_snapshot(snapshot.clone()).await.unwrap();
  assert_eq!(target.export_snapshot().await.unwrap(), snapshot);
}

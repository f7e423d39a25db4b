//! SQL schema for the applytrack SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Only the SHA-256 digest of an issued token is kept.
CREATE TABLE IF NOT EXISTS tokens (
    digest     TEXT PRIMARY KEY,
    user_id    INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS companies (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id  INTEGER REFERENCES users(id) ON DELETE CASCADE,
    name     TEXT NOT NULL,
    website  TEXT,
    industry TEXT NOT NULL DEFAULT '',
    UNIQUE (user_id, name)
);

CREATE TABLE IF NOT EXISTS contacts (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER REFERENCES users(id) ON DELETE CASCADE,
    company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    email      TEXT NOT NULL DEFAULT '',
    phone      TEXT NOT NULL DEFAULT '',
    position   TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS applications (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id            INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    job_title          TEXT NOT NULL,
    company_id         INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    contact_id         INTEGER REFERENCES contacts(id) ON DELETE SET NULL,
    status             TEXT NOT NULL DEFAULT 'DRAFT',
    applied_on         TEXT,            -- YYYY-MM-DD
    interview_on       TEXT,
    offer_on           TEXT,
    rejected_on        TEXT,
    follow_up_on       TEXT,
    job_posting_link   TEXT,
    salary_expectation INTEGER,
    created_at         TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    updated_at         TEXT NOT NULL,
    CHECK (status IN ('DRAFT', 'APPLIED', 'INTERVIEW', 'OFFER', 'REJECTED', 'WITHDRAWN')),
    CHECK (salary_expectation IS NULL OR salary_expectation >= 0)
);

CREATE TABLE IF NOT EXISTS notes (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    text           TEXT NOT NULL,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS contacts_user_idx        ON contacts(user_id);
CREATE INDEX IF NOT EXISTS contacts_company_idx     ON contacts(company_id);
CREATE INDEX IF NOT EXISTS applications_user_idx    ON applications(user_id);
CREATE INDEX IF NOT EXISTS applications_company_idx ON applications(company_id);
CREATE INDEX IF NOT EXISTS applications_contact_idx ON applications(contact_id);
CREATE INDEX IF NOT EXISTS notes_application_idx    ON notes(application_id, created_at);

PRAGMA user_version = 1;
";

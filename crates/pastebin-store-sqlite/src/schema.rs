//! SQL schema for the paste SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS pastes (
    id            TEXT PRIMARY KEY,
    owner_id      TEXT NOT NULL,
    title         TEXT NOT NULL,
    content       TEXT NOT NULL,
    language      TEXT NOT NULL DEFAULT '',
    slug          TEXT NOT NULL UNIQUE,
    url           TEXT NOT NULL,
    is_private    INTEGER NOT NULL DEFAULT 0,
    password_hash TEXT,              -- argon2 PHC string; NULL when public
    expires_at    TEXT,              -- RFC 3339 UTC, microseconds; NULL = never
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- Every slug ever issued. Rows are never deleted, so a slug is never handed
-- out twice even after its paste is gone.
CREATE TABLE IF NOT EXISTS paste_slugs (
    slug      TEXT PRIMARY KEY,
    issued_at TEXT NOT NULL
);

-- One row per paste, created on its first qualifying view.
-- No foreign key: records outlive deleted pastes.
CREATE TABLE IF NOT EXISTS paste_view_records (
    paste_id   TEXT PRIMARY KEY,
    views      INTEGER NOT NULL DEFAULT 1 CHECK (views >= 1),
    first_url  TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS pastes_owner_created_idx ON pastes(owner_id, created_at);
CREATE INDEX IF NOT EXISTS pastes_expires_idx       ON pastes(expires_at);

PRAGMA user_version = 1;
";

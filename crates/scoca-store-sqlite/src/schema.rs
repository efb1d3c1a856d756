//! SQL schema for the SCOCA SQLite store.
//!
//! Executed once at connection startup. Matches the layout the ingestion tool
//! writes, plus the `opinion_types` reference rows.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS` / `INSERT OR IGNORE`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS justices (
    shorthand TEXT PRIMARY KEY,
    fullname  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS opinion_types (
    id   INTEGER PRIMARY KEY,
    type TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS case_filings (
    docket_number       TEXT PRIMARY KEY,
    url                 TEXT,
    sha1                TEXT,
    filed_on            TEXT,               -- YYYY-MM-DD
    added_on            TEXT DEFAULT CURRENT_TIMESTAMP,
    exclude_from_chart  INTEGER NOT NULL DEFAULT 0,
    ends_in_letter_flag INTEGER NOT NULL DEFAULT 0,
    no_opinions_flag    INTEGER NOT NULL DEFAULT 0
);

-- (docket_number, type_id, authoring_justice) is NOT unique: a justice may
-- write two concurrences in one case.
CREATE TABLE IF NOT EXISTS opinions (
    id                   INTEGER PRIMARY KEY,
    docket_number        TEXT NOT NULL REFERENCES case_filings(docket_number),
    type_id              INTEGER NOT NULL REFERENCES opinion_types(id),
    effective_type_id    INTEGER REFERENCES opinion_types(id),
    authoring_justice    TEXT NOT NULL REFERENCES justices(shorthand),
    effective_type_flag  INTEGER NOT NULL DEFAULT 0,
    no_concurrences_flag INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS concurrences (
    opinion_id INTEGER NOT NULL REFERENCES opinions(id),
    justice    TEXT NOT NULL REFERENCES justices(shorthand),
    PRIMARY KEY (opinion_id, justice)
);

INSERT OR IGNORE INTO opinion_types (id, type) VALUES
    (1, 'majority'),
    (2, 'concurring'),
    (3, 'dissenting'),
    (4, 'concurring and dissenting');

CREATE INDEX IF NOT EXISTS opinions_docket_idx ON opinions(docket_number);

PRAGMA user_version = 1;
";

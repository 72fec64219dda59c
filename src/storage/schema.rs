//! SQLite schema

/// Applied on every open; statements are idempotent.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    about_text TEXT NOT NULL,
    tag TEXT NOT NULL,
    pill TEXT NOT NULL,
    caption TEXT NOT NULL,
    media_id TEXT NOT NULL,
    website TEXT,
    social TEXT,
    owner_id TEXT,
    base_confidence INTEGER NOT NULL,
    confidence INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_created ON records(created_at);
CREATE INDEX IF NOT EXISTS idx_records_owner ON records(owner_id);

CREATE TABLE IF NOT EXISTS votes (
    id TEXT PRIMARY KEY,
    record_id TEXT NOT NULL REFERENCES records(id),
    voter_id TEXT,
    kind TEXT NOT NULL CHECK (kind IN ('yes', 'maybe', 'no', 'skip')),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_votes_record ON votes(record_id);
";

pub const RECORD_COLUMNS: &str = "id, name, description, about_text, tag, pill, caption, \
     media_id, website, social, owner_id, base_confidence, confidence, created_at";

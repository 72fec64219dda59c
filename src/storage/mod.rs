//! Storage layer - records and votes in SQLite
//!
//! Handles:
//! - Record creation and listing
//! - Append-only vote log
//! - Confidence recomputation, atomic with the vote append

mod schema;

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row, TransactionBehavior};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::confidence::{self, BASE_CONFIDENCE};
use crate::models::{NewRecord, Record, Vote, VoteKind, LINK_SENTINEL};

use schema::{RECORD_COLUMNS, SCHEMA};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_kind(row: &Row<'_>, idx: usize) -> rusqlite::Result<VoteKind> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Map a `RECORD_COLUMNS` row to the record and its base confidence.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(Record, i64)> {
    let website: Option<String> = row.get(8)?;
    let social: Option<String> = row.get(9)?;
    let base: i64 = row.get(11)?;

    let record = Record {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        about_text: row.get(3)?,
        tag: row.get(4)?,
        pill: row.get(5)?,
        caption: row.get(6)?,
        media_id: row.get(7)?,
        website: website.unwrap_or_else(|| LINK_SENTINEL.to_string()),
        social: social.unwrap_or_else(|| LINK_SENTINEL.to_string()),
        owner_id: row.get(10)?,
        confidence: row.get(12)?,
        created_at: parse_timestamp(row, 13)?,
    };

    Ok((record, base))
}

/// Record and vote store backed by a single SQLite connection.
pub struct Store {
    db: Connection,
}

impl Store {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Connection::open(path)?;
        db.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self::init(db)?;

        info!(path = %path.display(), "Store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self> {
        db.execute_batch("PRAGMA foreign_keys=ON;")?;
        db.execute_batch(SCHEMA)?;
        Ok(Self { db })
    }

    /// Persist a validated submission. Confidence starts at the base score.
    pub fn create_record(&self, new: &NewRecord) -> Result<Record> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        self.db.execute(
            "INSERT INTO records (id, name, description, about_text, tag, pill, caption,
                media_id, website, social, owner_id, base_confidence, confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12, ?13)",
            params![
                id,
                new.name,
                new.description,
                new.about_text,
                new.tag,
                new.pill,
                new.caption,
                new.media_id,
                new.website,
                new.social,
                new.owner_id,
                BASE_CONFIDENCE,
                timestamp(created_at),
            ],
        )?;

        info!(record_id = %id, owner = %new.owner_id, "Record created");

        self.get_record(&id)?
            .ok_or_else(|| StoreError::Corrupt(format!("record {} vanished after insert", id)))
    }

    pub fn get_record(&self, id: &str) -> Result<Option<Record>> {
        let sql = format!("SELECT {} FROM records WHERE id = ?1", RECORD_COLUMNS);
        let found = self
            .db
            .query_row(&sql, [id], record_from_row)
            .optional()?;
        Ok(found.map(|(record, _)| record))
    }

    /// All records, newest first, with confidence derived from the vote log.
    pub fn list_records(&self) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT {} FROM records ORDER BY created_at DESC, rowid DESC",
            RECORD_COLUMNS
        );
        let mut stmt = self.db.prepare_cached(&sql)?;
        let rows = stmt
            .query_map([], record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut votes_by_record: HashMap<String, Vec<VoteKind>> = HashMap::new();
        let mut vote_stmt = self.db.prepare_cached("SELECT record_id, kind FROM votes")?;
        let votes = vote_stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, parse_kind(row, 1)?))
        })?;
        for vote in votes {
            let (record_id, kind) = vote?;
            votes_by_record.entry(record_id).or_default().push(kind);
        }

        Ok(rows
            .into_iter()
            .map(|(mut record, base)| {
                let kinds = votes_by_record.remove(&record.id).unwrap_or_default();
                record.confidence = confidence::aggregate(base, kinds);
                record
            })
            .collect())
    }

    /// Vote history of one record, oldest first.
    pub fn votes_for(&self, record_id: &str) -> Result<Vec<Vote>> {
        let mut stmt = self.db.prepare_cached(
            "SELECT id, record_id, voter_id, kind, created_at FROM votes
             WHERE record_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )?;
        let votes = stmt
            .query_map([record_id], |row| {
                Ok(Vote {
                    id: row.get(0)?,
                    record_id: row.get(1)?,
                    voter_id: row.get(2)?,
                    kind: parse_kind(row, 3)?,
                    created_at: parse_timestamp(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(votes)
    }

    /// Append a vote and persist the recomputed confidence.
    ///
    /// The read of the base score, the append, the history read and the
    /// update run in one IMMEDIATE transaction, so concurrent voters on the
    /// same record serialize instead of overwriting each other's result.
    pub fn cast_vote(
        &mut self,
        record_id: &str,
        voter_id: Option<&str>,
        kind: VoteKind,
    ) -> Result<i64> {
        let tx = self
            .db
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let base: i64 = tx
            .query_row(
                "SELECT base_confidence FROM records WHERE id = ?1",
                [record_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::RecordNotFound(record_id.to_string()))?;

        tx.execute(
            "INSERT INTO votes (id, record_id, voter_id, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Uuid::new_v4().to_string(),
                record_id,
                voter_id,
                kind.as_str(),
                timestamp(Utc::now()),
            ],
        )?;

        let history = {
            let mut stmt = tx.prepare_cached("SELECT kind FROM votes WHERE record_id = ?1")?;
            let kinds = stmt
                .query_map([record_id], |row| parse_kind(row, 0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            kinds
        };

        let score = confidence::aggregate(base, history.iter().copied());

        tx.execute(
            "UPDATE records SET confidence = ?1 WHERE id = ?2",
            params![score, record_id],
        )?;
        tx.commit()?;

        debug!(record_id, votes = history.len(), confidence = score, "Confidence recomputed");
        Ok(score)
    }

    pub fn record_count(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .query_row("SELECT count(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

//! SQLite corpus: bill texts, summaries, sponsors, FTS5 index and
//! precomputed embeddings

use crate::query::BuiltQuery;
use crate::rerank::Candidate;
use billsearch_core::{Bill, BillSummary, SearchError, SearchResult, Sponsor};
use chrono::Utc;
use rusqlite::types::ValueRef;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

const SUMMARY_FALLBACK_CHARS: i64 = 300;

/// Row counts for `billsearch status`
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub bills: i64,
    pub summaries: i64,
    pub sponsors: i64,
    pub embeddings: Vec<EmbeddingStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingStats {
    pub model: String,
    pub version: i64,
    pub bills: i64,
    pub vectors: i64,
}

pub struct BillStore {
    conn: Connection,
}

impl BillStore {
    /// Open (creating if needed) a writable database and ensure the schema
    pub fn create(db_path: &Path) -> SearchResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an existing database for writing
    pub fn open(db_path: &Path) -> SearchResult<Self> {
        ensure_exists(db_path)?;
        let conn = Connection::open(db_path)?;
        Ok(Self { conn })
    }

    /// Open an existing database for one search call
    pub fn open_read_only(db_path: &Path) -> SearchResult<Self> {
        ensure_exists(db_path)?;
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> SearchResult<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS bill_summaries (
                id INTEGER PRIMARY KEY,
                summary_text TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS full_texts (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                official_title TEXT NOT NULL,
                text TEXT NOT NULL,
                date TEXT NOT NULL,
                publisher TEXT NOT NULL,
                legis_type TEXT NOT NULL,
                session TEXT NOT NULL,
                file_stage TEXT NOT NULL,
                file_number TEXT NOT NULL,
                file_chamber TEXT NOT NULL,
                file_congress INTEGER NOT NULL,
                multiple_parties INTEGER NOT NULL,
                generated_url TEXT NOT NULL,
                available_chunks INTEGER NOT NULL,
                committee_name TEXT,
                current_chamber TEXT,
                summaries_match INTEGER REFERENCES bill_summaries(id)
            );
            CREATE INDEX IF NOT EXISTS idx_full_texts_date ON full_texts(date);
            CREATE INDEX IF NOT EXISTS idx_full_texts_publisher ON full_texts(publisher);
            CREATE TABLE IF NOT EXISTS sponsors (
                id INTEGER PRIMARY KEY,
                loc_id TEXT NOT NULL,
                name TEXT NOT NULL,
                full_name TEXT NOT NULL,
                chamber TEXT NOT NULL,
                party TEXT NOT NULL,
                bill_sponsored INTEGER NOT NULL REFERENCES full_texts(id)
            );
            CREATE INDEX IF NOT EXISTS idx_sponsors_bill ON sponsors(bill_sponsored);
            CREATE TABLE IF NOT EXISTS bert_embeddings (
                id INTEGER PRIMARY KEY,
                full_text_id INTEGER NOT NULL REFERENCES full_texts(id),
                embedding BLOB NOT NULL,
                model TEXT NOT NULL,
                version INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_embeddings_bill
                ON bert_embeddings(full_text_id, model, version);
            CREATE VIRTUAL TABLE IF NOT EXISTS congress_bm25 USING fts5(content);
            ",
        )?;
        Ok(())
    }

    /// Insert or replace one bill with its summary, sponsors and FTS row.
    /// `lexical_content` is the normalized text the BM25 index matches against.
    pub fn insert_bill(
        &self,
        bill: &Bill,
        lexical_content: &str,
        available_chunks: usize,
    ) -> SearchResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let old_summary: Option<i64> = tx
            .query_row(
                "SELECT summaries_match FROM full_texts WHERE id = ?1",
                params![bill.id],
                |row| row.get(0),
            )
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        if let Some(summary_id) = old_summary {
            // Drop the reference first so the summary delete passes the foreign key check
            tx.execute(
                "UPDATE full_texts SET summaries_match = NULL WHERE id = ?1",
                params![bill.id],
            )?;
            tx.execute("DELETE FROM bill_summaries WHERE id = ?1", params![summary_id])?;
        }
        tx.execute("DELETE FROM sponsors WHERE bill_sponsored = ?1", params![bill.id])?;
        tx.execute("DELETE FROM congress_bm25 WHERE rowid = ?1", params![bill.id])?;

        let summary_id = match &bill.summary {
            Some(summary) => {
                tx.execute(
                    "INSERT INTO bill_summaries (summary_text) VALUES (?1)",
                    params![summary],
                )?;
                Some(tx.last_insert_rowid())
            }
            None => None,
        };

        tx.execute(
            "INSERT OR REPLACE INTO full_texts (
                id, title, official_title, text, date, publisher, legis_type, session,
                file_stage, file_number, file_chamber, file_congress, multiple_parties,
                generated_url, available_chunks, committee_name, current_chamber, summaries_match
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                bill.id,
                bill.title,
                bill.official_title,
                bill.text,
                bill.date.format("%Y-%m-%d").to_string(),
                bill.publisher,
                bill.legis_type,
                bill.session,
                bill.stage,
                bill.bill_number,
                bill.bill_type,
                bill.congress,
                bill.multiple_parties,
                bill.generated_url,
                available_chunks as i64,
                bill.committee_name,
                bill.current_chamber,
                summary_id,
            ],
        )?;

        for sponsor in &bill.sponsors {
            tx.execute(
                "INSERT INTO sponsors (loc_id, name, full_name, chamber, party, bill_sponsored)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    sponsor.loc_id,
                    sponsor.name,
                    sponsor.full_name,
                    sponsor.chamber,
                    sponsor.party,
                    bill.id
                ],
            )?;
        }

        tx.execute(
            "INSERT INTO congress_bm25 (rowid, content) VALUES (?1, ?2)",
            params![bill.id, lexical_content],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Run a built lexical query; rows come back best first
    pub fn lexical_candidates(&self, query: &BuiltQuery) -> SearchResult<Vec<Candidate>> {
        let mut stmt = self.conn.prepare(&query.sql)?;
        let rows = stmt.query_map(params_from_iter(query.params.iter()), |row| {
            Ok(Candidate {
                bill_id: row.get(0)?,
                lexical_score: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn full_text(&self, bill_id: i64) -> SearchResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT text FROM full_texts WHERE id = ?1")?;
        let mut rows = stmt.query(params![bill_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Title and text for the precompute job
    pub fn title_and_text(&self, bill_id: i64) -> SearchResult<Option<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title, text FROM full_texts WHERE id = ?1")?;
        let mut rows = stmt.query(params![bill_id])?;
        match rows.next()? {
            Some(row) => Ok(Some((row.get(0)?, row.get(1)?))),
            None => Ok(None),
        }
    }

    /// Full metadata for `ids`, returned in the same order.
    /// An id with no row is reported as `NotFound`.
    pub fn summaries(&self, ids: &[i64]) -> SearchResult<Vec<BillSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT
                ft.id,
                coalesce(bs.summary_text, substr(ft.text, 1, {SUMMARY_FALLBACK_CHARS})) AS summary_text,
                ft.title,
                ft.official_title,
                ft.available_chunks,
                ft.multiple_parties,
                ft.generated_url,
                ft.file_stage,
                ft.file_number,
                ft.file_chamber,
                ft.file_congress,
                ft.date,
                ft.legis_type,
                ft.committee_name,
                ft.publisher,
                ft.current_chamber,
                ft.session
            FROM full_texts ft LEFT JOIN bill_summaries bs
                ON ft.summaries_match = bs.id
            WHERE ft.id IN ({placeholders})"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
            Ok(BillSummary {
                id: row.get(0)?,
                summary_text: row.get(1)?,
                title: row.get(2)?,
                official_title: row.get(3)?,
                available_chunks: row.get(4)?,
                multiple_parties: row.get(5)?,
                generated_url: row.get(6)?,
                stage_in_process: row.get(7)?,
                bill_number: row.get(8)?,
                bill_type: row.get(9)?,
                congress: row.get(10)?,
                date: row.get(11)?,
                legis_type: row.get(12)?,
                committee_name: row.get(13)?,
                publisher: row.get(14)?,
                current_chamber: row.get(15)?,
                session: row.get(16)?,
                sponsors: None,
            })
        })?;

        let mut by_id: HashMap<i64, BillSummary> = HashMap::new();
        for row in rows {
            let summary = row?;
            by_id.insert(summary.id, summary);
        }

        ids.iter()
            .map(|id| {
                by_id
                    .remove(id)
                    .ok_or(SearchError::NotFound { bill_id: *id })
            })
            .collect()
    }

    pub fn sponsors(&self, bill_id: i64) -> SearchResult<Vec<Sponsor>> {
        let mut stmt = self.conn.prepare(
            "SELECT loc_id, name, full_name, chamber, party
             FROM sponsors WHERE bill_sponsored = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![bill_id], |row| {
            Ok(Sponsor {
                loc_id: row.get(0)?,
                name: row.get(1)?,
                full_name: row.get(2)?,
                chamber: row.get(3)?,
                party: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Stored passage vectors per bill for one (model, version) artifact
    pub fn embeddings(
        &self,
        ids: &[i64],
        model: &str,
        version: i64,
    ) -> SearchResult<HashMap<i64, Vec<Vec<f32>>>> {
        let mut result: HashMap<i64, Vec<Vec<f32>>> = HashMap::new();
        if ids.is_empty() {
            return Ok(result);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT full_text_id, embedding FROM bert_embeddings
             WHERE model = ? AND version = ? AND full_text_id IN ({placeholders})
             ORDER BY id"
        );

        let mut bound: Vec<rusqlite::types::Value> = vec![model.to_string().into(), version.into()];
        bound.extend(ids.iter().map(|&id| rusqlite::types::Value::Integer(id)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bound.iter()))?;
        while let Some(row) = rows.next()? {
            let bill_id: i64 = row.get(0)?;
            let vector = decode_embedding(bill_id, row.get_ref(1)?)?;
            result.entry(bill_id).or_default().push(vector);
        }
        Ok(result)
    }

    /// Bills with no vectors for this (model, version)
    pub fn bills_missing_embeddings(&self, model: &str, version: i64) -> SearchResult<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT ft.id FROM full_texts ft
             WHERE NOT EXISTS (
                SELECT 1 FROM bert_embeddings e
                WHERE e.full_text_id = ft.id AND e.model = ?1 AND e.version = ?2
             )
             ORDER BY ft.id",
        )?;
        let rows = stmt.query_map(params![model, version], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Append vectors for one bill. Existing rows are never touched.
    pub fn append_embeddings(
        &self,
        bill_id: i64,
        model: &str,
        version: i64,
        vectors: &[Vec<f32>],
    ) -> SearchResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let created_at = Utc::now().to_rfc3339();
        for vector in vectors {
            tx.execute(
                "INSERT INTO bert_embeddings (full_text_id, embedding, model, version, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    bill_id,
                    serde_json::to_string(vector)?,
                    model,
                    version,
                    created_at
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn stats(&self) -> SearchResult<StoreStats> {
        let count = |table: &str| -> SearchResult<i64> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
        };

        let mut stmt = self.conn.prepare(
            "SELECT model, version, COUNT(DISTINCT full_text_id), COUNT(*)
             FROM bert_embeddings GROUP BY model, version ORDER BY model, version",
        )?;
        let embeddings = stmt
            .query_map([], |row| {
                Ok(EmbeddingStats {
                    model: row.get(0)?,
                    version: row.get(1)?,
                    bills: row.get(2)?,
                    vectors: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StoreStats {
            bills: count("full_texts")?,
            summaries: count("bill_summaries")?,
            sponsors: count("sponsors")?,
            embeddings,
        })
    }
}

fn ensure_exists(db_path: &Path) -> SearchResult<()> {
    if !db_path.exists() {
        return Err(SearchError::DatabaseNotFound {
            path: db_path.to_path_buf(),
        });
    }
    Ok(())
}

/// Vectors are JSON arrays, either flat or wrapped as a single-row matrix
fn decode_embedding(bill_id: i64, value: ValueRef<'_>) -> SearchResult<Vec<f32>> {
    let bytes = match value {
        ValueRef::Text(b) | ValueRef::Blob(b) => b,
        other => {
            return Err(SearchError::Corrupt {
                bill_id,
                detail: format!("embedding stored as {:?}", other.data_type()),
            })
        }
    };

    if let Ok(flat) = serde_json::from_slice::<Vec<f32>>(bytes) {
        return Ok(flat);
    }
    match serde_json::from_slice::<Vec<Vec<f32>>>(bytes) {
        Ok(mut nested) if nested.len() == 1 => Ok(nested.remove(0)),
        Ok(nested) => Err(SearchError::Corrupt {
            bill_id,
            detail: format!("expected one embedding row, found {}", nested.len()),
        }),
        Err(e) => Err(SearchError::Corrupt {
            bill_id,
            detail: e.to_string(),
        }),
    }
}

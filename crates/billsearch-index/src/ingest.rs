//! Corpus loading from JSONL bill records

use crate::store::BillStore;
use billsearch_core::{Bill, SearchConfig, SearchResult};
use billsearch_text::{chunk, Normalizer};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped_lines: usize,
}

/// Read bill records, one JSON object per line. Blank lines are ignored;
/// malformed lines are logged and counted, not fatal.
pub fn read_bills(path: &Path) -> SearchResult<(Vec<Bill>, usize)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut bills = Vec::new();
    let mut skipped = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Bill>(&line) {
            Ok(bill) => bills.push(bill),
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping malformed bill record");
                skipped += 1;
            }
        }
    }

    Ok((bills, skipped))
}

/// Text indexed by BM25: stemmed title, official title and body
pub fn lexical_content(normalizer: &Normalizer, bill: &Bill) -> String {
    let combined = format!("{} {} {}", bill.title, bill.official_title, bill.text);
    normalizer.remove_stopwords_and_stem(&combined).join(" ")
}

pub fn ingest_bills(
    store: &BillStore,
    normalizer: &Normalizer,
    config: &SearchConfig,
    bills: &[Bill],
) -> SearchResult<usize> {
    for bill in bills {
        let available_chunks = chunk(&bill.text, config.chunk_size, config.chunk_overlap)?.len();
        store.insert_bill(bill, &lexical_content(normalizer, bill), available_chunks)?;
    }
    tracing::info!(count = bills.len(), "bills ingested");
    Ok(bills.len())
}

pub fn ingest_file(
    store: &BillStore,
    normalizer: &Normalizer,
    config: &SearchConfig,
    path: &Path,
) -> SearchResult<IngestReport> {
    let (bills, skipped_lines) = read_bills(path)?;
    let ingested = ingest_bills(store, normalizer, config, &bills)?;
    Ok(IngestReport {
        ingested,
        skipped_lines,
    })
}

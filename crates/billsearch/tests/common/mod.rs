#![allow(dead_code)]

use billsearch_core::{Bill, SearchConfig, Sponsor};
use billsearch_index::{ingest_bills, precompute_embeddings, BillStore, HashEmbedder};
use billsearch_text::Normalizer;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const DIMENSION: usize = 64;

pub fn offline_config() -> SearchConfig {
    SearchConfig::offline(DIMENSION)
}

pub fn bill(id: i64, title: &str, text: &str) -> Bill {
    Bill {
        id,
        title: title.to_string(),
        official_title: format!("To provide for the {}", title.to_lowercase()),
        text: text.to_string(),
        date: NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
        publisher: "U.S. House of Representatives".to_string(),
        legis_type: "bill".to_string(),
        congress: 117,
        session: "1".to_string(),
        bill_type: "hr".to_string(),
        bill_number: (1000 + id).to_string(),
        stage: "ih".to_string(),
        multiple_parties: false,
        generated_url: format!("https://www.congress.gov/bill/117th-congress/house-bill/{}", 1000 + id),
        committee_name: Some("Energy and Commerce".to_string()),
        current_chamber: Some("House".to_string()),
        summary: None,
        sponsors: Vec::new(),
    }
}

/// A: healthcare, B: climate, C: defense (Senate, with a sponsor)
pub fn sample_corpus() -> Vec<Bill> {
    let a = bill(1, "Healthcare Reform Bill", "healthcare reform bill");
    let mut b = bill(2, "Climate Change Act", "climate change act");
    b.summary = Some("Establishes emissions targets.".to_string());
    let mut c = bill(3, "Defense Appropriations", "defense appropriations");
    c.publisher = "U.S. Senate".to_string();
    c.bill_type = "s".to_string();
    c.sponsors = vec![Sponsor {
        loc_id: "S000148".to_string(),
        name: "Schumer".to_string(),
        full_name: "Sen. Charles E. Schumer".to_string(),
        chamber: "Senate".to_string(),
        party: "D".to_string(),
    }];
    vec![a, b, c]
}

/// Ingest `bills` and precompute their embeddings with the hash embedder
pub fn build_db(dir: &Path, bills: &[Bill]) -> PathBuf {
    let db_path = dir.join("bills.db");
    let config = offline_config();
    let normalizer = Normalizer::new();
    let store = BillStore::create(&db_path).unwrap();
    ingest_bills(&store, &normalizer, &config, bills).unwrap();
    let embedder = HashEmbedder::new(DIMENSION).unwrap();
    precompute_embeddings(&store, &normalizer, &config, &embedder).unwrap();
    db_path
}

pub fn write_jsonl(path: &Path, bills: &[Bill]) {
    let lines: Vec<String> = bills
        .iter()
        .map(|b| serde_json::to_string(b).unwrap())
        .collect();
    std::fs::write(path, lines.join("\n")).unwrap();
}

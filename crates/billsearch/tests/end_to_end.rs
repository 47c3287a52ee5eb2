mod common;

use billsearch_core::{PassageRequest, SearchError, SummaryRequest};
use billsearch_index::{BillStore, SearchEngine};
use billsearch_text::{chunk, word_cosine, Normalizer};
use serde_json::json;

fn engine(dir: &tempfile::TempDir) -> SearchEngine {
    let db_path = common::build_db(dir.path(), &common::sample_corpus());
    SearchEngine::new(db_path, common::offline_config()).unwrap()
}

#[test]
fn test_climate_query_returns_climate_bill_first() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir);

    let results = engine.retrieve_summary(&SummaryRequest::new("climate")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 2);
    assert_eq!(results[0].title, "Climate Change Act");
    assert_eq!(results[0].summary_text, "Establishes emissions targets.");
    assert_eq!(results[0].bill_type, "hr");
}

#[test]
fn test_never_more_than_requested_or_available() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir);
    let query = "healthcare climate defense";

    for requested in [0, 1, 2, 3, 10] {
        let mut request = SummaryRequest::new(query);
        request.number_to_return = requested;
        let results = engine.retrieve_summary(&request).unwrap();
        assert_eq!(results.len(), requested.min(3), "requested {requested}");
    }
}

#[test]
fn test_unrecognized_chamber_is_invalid_parameter() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir);
    let err = engine
        .retrieve_summary_params(&json!({ "query": "climate", "chamber": "Parliament" }))
        .unwrap_err();
    assert!(err.is_invalid_parameter());
}

#[test]
fn test_legacy_params_with_sponsors() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir);
    let results = engine
        .retrieve_summary_params(&json!({
            "query": "defense appropriations",
            "number_to_return": 3,
            "chamber": "U.S. Senate",
            "get_sponsors": true,
            "legislative_types": "any",
            "date_range": {
                "start_year": 2000, "start_month": 1, "start_day": 1,
                "end_year": 2030, "end_month": 12, "end_day": 31
            }
        }))
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 3);
    let sponsors = results[0].sponsors.as_ref().unwrap();
    assert_eq!(sponsors.len(), 1);
    assert_eq!(sponsors[0].loc_id, "S000148");
}

#[test]
fn test_bills_without_embeddings_rank_after_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = common::build_db(dir.path(), &common::sample_corpus());

    // Added after precompute, so it has no stored vectors
    let late = common::bill(4, "Climate Climate Climate", "climate climate climate climate");
    {
        let store = BillStore::open(&db_path).unwrap();
        billsearch_index::ingest_bills(
            &store,
            &Normalizer::new(),
            &common::offline_config(),
            &[late],
        )
        .unwrap();
    }

    let engine = SearchEngine::new(&db_path, common::offline_config()).unwrap();
    let results = engine.retrieve_summary(&SummaryRequest::new("climate")).unwrap();
    let ids: Vec<i64> = results.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 4]);
}

fn long_bill_text() -> String {
    // 4000 tokens; a handful of windows talk about water quality
    (0..4000)
        .map(|i| match i % 700 {
            0..=3 => "water",
            4..=6 => "quality",
            _ => "appropriations",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_passages_take_cheap_filter_path() {
    let dir = tempfile::tempdir().unwrap();
    let text = long_bill_text();
    let db_path = common::build_db(dir.path(), &[common::bill(7, "Water Bill", &text)]);
    let engine = SearchEngine::new(&db_path, common::offline_config()).unwrap();

    let chunks = chunk(&text, 150, 15).unwrap();
    assert_eq!(chunks.len(), 30);

    let normalizer = Normalizer::new();
    let query_tokens = normalizer.remove_stopwords("water quality");
    let mut scored: Vec<(String, f64)> = chunks
        .iter()
        .map(|c| {
            let tokens = normalizer.remove_stopwords(c);
            (c.clone(), word_cosine(&query_tokens, &tokens))
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    let top: Vec<String> = scored.into_iter().take(25).map(|(c, _)| c).collect();

    let mut request = PassageRequest::new("water quality");
    request.number_to_return = 4;
    let matches = engine.retrieve_full_text_chunks(&request, 7).unwrap();

    assert_eq!(matches.len(), 4);
    assert!(matches.iter().all(|m| top.contains(&m.passage)));
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(matches[0].passage.contains("water"));
}

#[test]
fn test_passages_for_missing_bill() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir);
    let err = engine
        .retrieve_full_text_chunks_params(&json!({ "query": "climate" }), 99)
        .unwrap_err();
    assert!(matches!(err, SearchError::NotFound { bill_id: 99 }));
}

#[test]
fn test_status_counts() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = common::build_db(dir.path(), &common::sample_corpus());
    let stats = BillStore::open_read_only(&db_path).unwrap().stats().unwrap();
    assert_eq!(stats.bills, 3);
    assert_eq!(stats.summaries, 1);
    assert_eq!(stats.sponsors, 1);
    assert_eq!(stats.embeddings[0].bills, 3);
}

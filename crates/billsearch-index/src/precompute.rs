//! Offline job that fills the precomputed passage-embedding table

use crate::embed::Embedder;
use crate::store::BillStore;
use billsearch_core::{SearchConfig, SearchResult};
use billsearch_text::Normalizer;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrecomputeReport {
    pub model: String,
    pub version: i64,
    pub bills_embedded: usize,
    pub vectors_written: usize,
}

/// Character windows of `text`, each prefixed by `title`.
/// The first window is always produced, even for empty text.
pub fn passage_windows(title: &str, text: &str, config: &SearchConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut windows = Vec::new();

    for i in 0..config.precompute_windows {
        let start = i * config.precompute_window_stride;
        if i > 0 && start >= chars.len() {
            break;
        }
        let start = start.min(chars.len());
        let end = (start + config.precompute_window_chars).min(chars.len());
        let body: String = chars[start..end].iter().collect();
        windows.push(format!("{title} {body}"));
    }

    windows
}

/// Embed every bill that has no vectors for this model and version.
/// Rows are only ever appended.
pub fn precompute_embeddings(
    store: &BillStore,
    normalizer: &Normalizer,
    config: &SearchConfig,
    embedder: &dyn Embedder,
) -> SearchResult<PrecomputeReport> {
    let model = embedder.name().to_string();
    let version = config.embedding_version;
    let pending = store.bills_missing_embeddings(&model, version)?;
    tracing::info!(model = %model, version, pending = pending.len(), "precomputing embeddings");

    let mut report = PrecomputeReport {
        model: model.clone(),
        version,
        ..Default::default()
    };

    for bill_id in pending {
        let Some((title, text)) = store.title_and_text(bill_id)? else {
            tracing::warn!(bill_id, "bill disappeared during precompute");
            continue;
        };

        let passages: Vec<String> = passage_windows(&title, &text, config)
            .iter()
            .map(|w| normalizer.remove_stopwords_and_stem(w).join(" "))
            .collect();
        if passages.is_empty() {
            continue;
        }

        let vectors = embedder.embed_batch(&passages)?;
        store.append_embeddings(bill_id, &model, version, &vectors)?;

        report.bills_embedded += 1;
        report.vectors_written += vectors.len();
        tracing::debug!(bill_id, vectors = vectors.len(), "bill embedded");
    }

    tracing::info!(
        bills = report.bills_embedded,
        vectors = report.vectors_written,
        "precompute finished"
    );
    Ok(report)
}

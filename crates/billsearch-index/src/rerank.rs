//! Second-stage reranking
//!
//! Summary search reorders lexical candidates by precomputed passage vectors;
//! passage search scores chunks of one bill with an on-the-fly embedding,
//! after a word-cosine pre-filter when there are too many chunks.

use crate::embed::{dot, Embedder};
use billsearch_core::{PassageMatch, SearchError, SearchResult};
use billsearch_text::word_cosine;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One lexical hit, best first as returned by the BM25 query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub bill_id: i64,
    pub lexical_score: f64,
}

/// A chunk of bill text together with the tokens it is scored on
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub text: String,
    pub scorable: Vec<String>,
}

/// Reorder `candidates` by the mean dot product of `query` against each
/// bill's stored vectors. Bills without vectors keep their lexical order
/// after every bill that has some.
pub fn rerank_precomputed(
    query: &[f32],
    candidates: Vec<Candidate>,
    stored: &HashMap<i64, Vec<Vec<f32>>>,
) -> SearchResult<Vec<Candidate>> {
    let mut scored: Vec<(Candidate, Option<f32>)> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let score = match stored.get(&candidate.bill_id) {
            Some(vectors) if !vectors.is_empty() => {
                let mut total = 0.0_f32;
                for vector in vectors {
                    if vector.len() != query.len() {
                        return Err(SearchError::DimensionMismatch {
                            bill_id: candidate.bill_id,
                            expected: query.len(),
                            found: vector.len(),
                        });
                    }
                    total += dot(query, vector);
                }
                Some(nan_to_min(total / vectors.len() as f32))
            }
            _ => None,
        };
        scored.push((candidate, score));
    }

    scored.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Ok(scored.into_iter().map(|(c, _)| c).collect())
}

/// Keep the `cap` passages most similar to the query by word cosine.
/// Fewer than `cap` passages pass through untouched.
pub fn prefilter_passages(
    query_tokens: &[String],
    passages: Vec<Passage>,
    cap: usize,
) -> Vec<Passage> {
    if passages.len() <= cap {
        return passages;
    }

    let mut scored: Vec<(Passage, f64)> = passages
        .into_iter()
        .map(|p| {
            let similarity = word_cosine(query_tokens, &p.scorable);
            (p, similarity)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(cap);

    tracing::debug!(kept = scored.len(), "passage pre-filter applied");
    scored.into_iter().map(|(p, _)| p).collect()
}

/// Score passages against the query with `embedder`, best first.
/// The query and every surviving passage go through one batch.
pub fn rerank_passages(
    query_tokens: &[String],
    passages: Vec<Passage>,
    cap: usize,
    embedder: &dyn Embedder,
) -> SearchResult<Vec<PassageMatch>> {
    let survivors = prefilter_passages(query_tokens, passages, cap);
    if survivors.is_empty() {
        return Ok(Vec::new());
    }

    let mut batch = Vec::with_capacity(survivors.len() + 1);
    batch.push(query_tokens.join(" "));
    batch.extend(survivors.iter().map(|p| p.scorable.join(" ")));

    let vectors = embedder.embed_batch(&batch)?;
    if vectors.len() != batch.len() {
        return Err(SearchError::Embedding {
            model: embedder.name().to_string(),
            source: format!("expected {} embeddings, got {}", batch.len(), vectors.len()).into(),
        });
    }

    let (query, passage_vectors) = vectors.split_first().ok_or_else(|| SearchError::Embedding {
        model: embedder.name().to_string(),
        source: "model returned no embedding".into(),
    })?;

    let mut matches: Vec<PassageMatch> = survivors
        .into_iter()
        .zip(passage_vectors)
        .map(|(p, v)| PassageMatch {
            passage: p.text,
            score: nan_to_min(dot(query, v)),
        })
        .collect();
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    Ok(matches)
}

fn nan_to_min(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

//! Configuration for the search engine and precompute job

use crate::error::SearchResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where an embedding model comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSource {
    /// fastembed's built-in default (all-MiniLM-L6-v2)
    FastembedDefault,
    /// ONNX export + tokenizer files in a local directory, mean pooled
    Local { dir: PathBuf },
    /// Deterministic bag-of-words hashing, no model files
    Hash { dimension: usize },
}

impl ModelSource {
    /// Identity recorded next to stored embeddings
    pub fn identity(&self) -> String {
        match self {
            ModelSource::FastembedDefault => "all-MiniLM-L6-v2".to_string(),
            ModelSource::Local { dir } => dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| dir.to_string_lossy().to_string()),
            ModelSource::Hash { dimension } => format!("hash-fnv-{dimension}"),
        }
    }
}

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidates pulled from the BM25 index
    pub bm25_ranking_depth: usize,

    /// Head of the lexical ranking that gets reranked; the tail keeps lexical order
    pub reranking_depth: usize,

    /// Passages above this count go through the word-vector pre-filter
    pub max_chunks_to_score: usize,

    /// Passage window, in whitespace tokens
    pub chunk_size: usize,

    /// Tokens shared by adjacent passages
    pub chunk_overlap: usize,

    /// Tokenizer truncation for both models
    pub max_input_tokens: usize,

    /// Version tag of the precomputed embedding artifact read and written
    pub embedding_version: i64,

    /// Character width of each precomputed passage window
    pub precompute_window_chars: usize,

    /// Character stride between precomputed passage windows
    pub precompute_window_stride: usize,

    /// Maximum precomputed passages per bill
    pub precompute_windows: usize,

    /// Restrict lexical candidates to one bill type (e.g. "hr"); off by default
    pub bill_type_restriction: Option<String>,

    /// Legal-domain encoder (summary reranking, precompute)
    pub legal_model: ModelSource,

    /// General sentence encoder (passage scoring)
    pub sentence_model: ModelSource,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self {
            bm25_ranking_depth: 150,
            reranking_depth: 150,
            max_chunks_to_score: 25,
            chunk_size: 150,
            chunk_overlap: 15,
            max_input_tokens: 512,
            embedding_version: 1,
            precompute_window_chars: 800,
            precompute_window_stride: 600,
            precompute_windows: 5,
            bill_type_restriction: None,
            legal_model: ModelSource::Local {
                dir: PathBuf::from("models/legal-bert-small-uncased"),
            },
            sentence_model: ModelSource::FastembedDefault,
        }
    }

    /// Config with both models replaced by the hash embedder
    pub fn offline(dimension: usize) -> Self {
        Self {
            legal_model: ModelSource::Hash { dimension },
            sentence_model: ModelSource::Hash { dimension },
            ..Self::new()
        }
    }

    /// Load from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> SearchResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SearchConfig::new();
        assert_eq!(config.bm25_ranking_depth, 150);
        assert_eq!(config.reranking_depth, 150);
        assert_eq!(config.max_chunks_to_score, 25);
        assert_eq!(config.chunk_size, 150);
        assert_eq!(config.chunk_overlap, 15);
        assert!(config.bill_type_restriction.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"reranking_depth": 20, "legal_model": {"kind": "hash", "dimension": 64}}"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.reranking_depth, 20);
        assert_eq!(config.bm25_ranking_depth, 150);
        assert_eq!(config.legal_model, ModelSource::Hash { dimension: 64 });
        assert_eq!(config.sentence_model, ModelSource::FastembedDefault);
    }

    #[test]
    fn test_model_identity() {
        let local = ModelSource::Local {
            dir: PathBuf::from("/opt/models/legal-bert-small-uncased"),
        };
        assert_eq!(local.identity(), "legal-bert-small-uncased");
        assert_eq!(ModelSource::Hash { dimension: 32 }.identity(), "hash-fnv-32");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"bill_type_restriction": "hr"}"#).unwrap();

        let config = SearchConfig::load(&path).unwrap();
        assert_eq!(config.bill_type_restriction.as_deref(), Some("hr"));
        assert_eq!(config.max_chunks_to_score, 25);
    }
}

//! Error taxonomy for the search pipeline

use std::path::PathBuf;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A caller-supplied parameter is malformed. Never retried.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A referenced bill id does not exist in the corpus.
    #[error("bill {bill_id} not found")]
    NotFound { bill_id: i64 },

    #[error("database file not found at {path}; run `billsearch init` and `billsearch ingest` first")]
    DatabaseNotFound { path: PathBuf },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("embedding failed for {model}: {source}")]
    Embedding {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to load model from {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("dimension mismatch: query has {expected} dims, stored vector for bill {bill_id} has {found}")]
    DimensionMismatch {
        bill_id: i64,
        expected: usize,
        found: usize,
    },

    /// A stored row could not be decoded.
    #[error("corrupt row for bill {bill_id}: {detail}")]
    Corrupt { bill_id: i64, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = SearchError::invalid("chunk size must be larger than overlap");
        assert!(err.is_invalid_parameter());
        assert_eq!(
            err.to_string(),
            "invalid parameter: chunk size must be larger than overlap"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = SearchError::NotFound { bill_id: 42 };
        assert!(!err.is_invalid_parameter());
        assert_eq!(err.to_string(), "bill 42 not found");
    }
}

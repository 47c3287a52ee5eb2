//! Bill storage, lexical retrieval and embedding reranking

pub mod embed;
pub mod engine;
pub mod ingest;
pub mod precompute;
pub mod query;
pub mod rerank;
pub mod store;

#[cfg(test)]
mod test_support;

pub use embed::{Embedder, EmbeddingProvider, FastEmbedEmbedder, HashEmbedder, ModelId};
pub use engine::SearchEngine;
pub use ingest::{ingest_bills, ingest_file, IngestReport};
pub use precompute::{precompute_embeddings, PrecomputeReport};
pub use query::{build_query, BuiltQuery, QuerySpec};
pub use rerank::{Candidate, Passage};
pub use store::{BillStore, EmbeddingStats, StoreStats};

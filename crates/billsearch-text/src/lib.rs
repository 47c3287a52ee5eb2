//! Text normalization, passage chunking and word-vector similarity

mod chunk;
mod normalize;
mod wordvec;

pub use chunk::chunk;
pub use normalize::Normalizer;
pub use wordvec::word_cosine;

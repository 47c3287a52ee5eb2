//! Embedding models behind one provider
//!
//! Two model identities are used: a legal-domain encoder for summary reranking
//! and the precompute job, and a general sentence encoder for passage scoring.
//! Each is either a fastembed ONNX model or the hash embedder, which needs no
//! model files and is what the tests run against.

use billsearch_core::{ModelSource, SearchConfig, SearchError, SearchResult};
use fastembed::{
    EmbeddingModel, InitOptions, InitOptionsUserDefined, Pooling, TextEmbedding, TokenizerFiles,
    UserDefinedEmbeddingModel,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait Embedder: Send + Sync {
    /// Model identity, stored next to precomputed vectors
    fn name(&self) -> &str;

    fn embed_batch(&self, texts: &[String]) -> SearchResult<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> SearchResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| SearchError::Embedding {
                model: self.name().to_string(),
                source: "model returned no embedding".into(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    Legal,
    Sentence,
}

pub struct EmbeddingProvider {
    legal: Box<dyn Embedder>,
    sentence: Box<dyn Embedder>,
}

impl EmbeddingProvider {
    pub fn new(legal: Box<dyn Embedder>, sentence: Box<dyn Embedder>) -> Self {
        Self { legal, sentence }
    }

    pub fn from_config(config: &SearchConfig) -> SearchResult<Self> {
        let legal = load_embedder(&config.legal_model, config.max_input_tokens)?;
        let sentence = load_embedder(&config.sentence_model, config.max_input_tokens)?;
        Ok(Self::new(legal, sentence))
    }

    pub fn model(&self, id: ModelId) -> &dyn Embedder {
        match id {
            ModelId::Legal => self.legal.as_ref(),
            ModelId::Sentence => self.sentence.as_ref(),
        }
    }

    pub fn embed(&self, text: &str, id: ModelId) -> SearchResult<Vec<f32>> {
        self.model(id).embed(text)
    }

    pub fn embed_batch(&self, texts: &[String], id: ModelId) -> SearchResult<Vec<Vec<f32>>> {
        self.model(id).embed_batch(texts)
    }
}

impl fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("legal", &self.legal.name())
            .field("sentence", &self.sentence.name())
            .finish()
    }
}

pub fn load_embedder(source: &ModelSource, max_length: usize) -> SearchResult<Box<dyn Embedder>> {
    match source {
        ModelSource::Hash { dimension } => Ok(Box::new(HashEmbedder::new(*dimension)?)),
        other => Ok(Box::new(FastEmbedEmbedder::load(other, max_length)?)),
    }
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

const TOKENIZER_JSON: &str = "tokenizer.json";
const CONFIG_JSON: &str = "config.json";
const SPECIAL_TOKENS_JSON: &str = "special_tokens_map.json";
const TOKENIZER_CONFIG_JSON: &str = "tokenizer_config.json";

/// fastembed-backed encoder. Inference needs exclusive access to the ONNX
/// session, hence the mutex.
pub struct FastEmbedEmbedder {
    name: String,
    model: Mutex<TextEmbedding>,
}

impl FastEmbedEmbedder {
    pub fn load(source: &ModelSource, max_length: usize) -> SearchResult<Self> {
        let name = source.identity();
        let model = match source {
            ModelSource::FastembedDefault => TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_max_length(max_length),
            )
            .map_err(|e| SearchError::ModelLoad {
                path: PathBuf::from(&name),
                source: e.into(),
            })?,
            ModelSource::Local { dir } => load_local(dir, max_length)?,
            ModelSource::Hash { .. } => {
                return Err(SearchError::invalid(
                    "hash embedder is not a fastembed model source",
                ))
            }
        };

        tracing::info!(model = %name, max_length, "embedding model loaded");
        Ok(Self {
            name,
            model: Mutex::new(model),
        })
    }
}

fn load_local(dir: &Path, max_length: usize) -> SearchResult<TextEmbedding> {
    let model_file = ["onnx/model.onnx", "model.onnx"]
        .iter()
        .map(|p| dir.join(p))
        .find(|p| p.is_file())
        .ok_or_else(|| SearchError::ModelLoad {
            path: dir.to_path_buf(),
            source: "missing onnx/model.onnx or model.onnx".into(),
        })?;

    let read = |name: &str| -> SearchResult<Vec<u8>> {
        let path = dir.join(name);
        std::fs::read(&path).map_err(|e| SearchError::ModelLoad {
            path,
            source: e.into(),
        })
    };

    let tokenizer_files = TokenizerFiles {
        tokenizer_file: read(TOKENIZER_JSON)?,
        config_file: read(CONFIG_JSON)?,
        special_tokens_map_file: read(SPECIAL_TOKENS_JSON)?,
        tokenizer_config_file: read(TOKENIZER_CONFIG_JSON)?,
    };
    let model_bytes = std::fs::read(&model_file).map_err(|e| SearchError::ModelLoad {
        path: model_file.clone(),
        source: e.into(),
    })?;

    let mut user_model = UserDefinedEmbeddingModel::new(model_bytes, tokenizer_files);
    user_model.pooling = Some(Pooling::Mean);

    TextEmbedding::try_new_from_user_defined(
        user_model,
        InitOptionsUserDefined::new().with_max_length(max_length),
    )
    .map_err(|e| SearchError::ModelLoad {
        path: dir.to_path_buf(),
        source: e.into(),
    })
}

impl Embedder for FastEmbedEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_batch(&self, texts: &[String]) -> SearchResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self.model.lock().map_err(|_| SearchError::Embedding {
            model: self.name.clone(),
            source: "embedding model lock poisoned".into(),
        })?;
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| SearchError::Embedding {
                model: self.name.clone(),
                source: e.into(),
            })
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Deterministic bag-of-words embedder: each lowercase token hashes to one
/// signed dimension, output is L2-normalized. Lexical overlap only.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    name: String,
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> SearchResult<Self> {
        if dimension == 0 {
            return Err(SearchError::invalid("hash embedder dimension must be > 0"));
        }
        Ok(Self {
            name: ModelSource::Hash { dimension }.identity(),
            dimension,
        })
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0_f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.as_bytes());
            let index = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[index] += sign;
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_batch(&self, texts: &[String]) -> SearchResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

use billsearch_core::SearchConfig;
use billsearch_index::embed::load_embedder;
use billsearch_index::{precompute_embeddings, BillStore};
use billsearch_text::Normalizer;
use std::path::Path;

pub fn run(db: &Path, config: &SearchConfig) -> anyhow::Result<()> {
    let store = BillStore::open(db)?;
    let embedder = load_embedder(&config.legal_model, config.max_input_tokens)?;
    let report = precompute_embeddings(&store, &Normalizer::new(), config, embedder.as_ref())?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

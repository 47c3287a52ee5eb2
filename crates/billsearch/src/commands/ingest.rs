use billsearch_core::SearchConfig;
use billsearch_index::{ingest_file, BillStore};
use billsearch_text::Normalizer;
use std::path::Path;

pub fn run(db: &Path, file: &Path, config: &SearchConfig) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("bill file not found: {}", file.display());
    }

    let store = BillStore::create(db)?;
    let report = ingest_file(&store, &Normalizer::new(), config, file)?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

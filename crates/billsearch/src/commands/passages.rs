use billsearch_core::{PassageRequest, SearchConfig};
use billsearch_index::SearchEngine;
use std::path::Path;

pub fn run(
    db: &Path,
    bill_id: i64,
    query: &str,
    count: Option<usize>,
    config: SearchConfig,
) -> anyhow::Result<()> {
    let mut request = PassageRequest::new(query);
    if let Some(n) = count {
        request.number_to_return = n;
    }

    let engine = SearchEngine::new(db, config)?;
    let matches = engine.retrieve_full_text_chunks(&request, bill_id)?;
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

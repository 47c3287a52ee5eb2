pub mod ingest;
pub mod init;
pub mod passages;
pub mod precompute;
pub mod search;
pub mod status;

use billsearch_core::SearchConfig;
use std::path::Path;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<SearchConfig> {
    match path {
        Some(p) => {
            let config = SearchConfig::load(p)
                .map_err(|e| anyhow::anyhow!("failed to load config {}: {e}", p.display()))?;
            tracing::debug!(path = %p.display(), "config loaded");
            Ok(config)
        }
        None => Ok(SearchConfig::new()),
    }
}

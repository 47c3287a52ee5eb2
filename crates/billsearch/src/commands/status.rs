use billsearch_index::BillStore;
use std::path::Path;

pub fn run(db: &Path) -> anyhow::Result<()> {
    let store = BillStore::open_read_only(db)?;
    let stats = store.stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

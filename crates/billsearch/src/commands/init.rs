use billsearch_index::BillStore;
use std::path::Path;

pub fn run(db: &Path) -> anyhow::Result<()> {
    BillStore::create(db)?;
    tracing::info!(db = %db.display(), "database initialized");
    println!("{}", serde_json::json!({ "db": db.display().to_string() }));
    Ok(())
}

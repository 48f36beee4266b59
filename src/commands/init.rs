use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use opinaai::db::Database;
use opinaai::storage::Storage;

pub const DB_FILE_NAME: &str = "opinaai.db";

pub fn run(data_dir: &Path, force: bool) -> Result<()> {
    let db_path = data_dir.join(DB_FILE_NAME);

    if db_path.exists() && !force {
        println!("Already initialized at {}", data_dir.display());
        println!("Use --force to replace the data with fresh mock data.");
        return Ok(());
    }

    fs::create_dir_all(data_dir).context("Failed to create data directory")?;
    let storage = Storage::new(Database::open(&db_path)?);
    let data = storage.seed()?;

    println!("Initialized opinaai in {}", data_dir.display());
    println!(
        "Seeded {} complaints and {} users",
        data.complaints.len(),
        data.users.len()
    );
    if let Some(user) = data.users.get(data.current_user) {
        println!("Current user: {} ({})", user.name, user.id);
    }

    Ok(())
}

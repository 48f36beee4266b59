use anyhow::{bail, Result};

use super::{require_complaint, require_user};
use opinaai::store::ComplaintStore;

pub fn run(store: &mut ComplaintStore, id: &str, text: &str) -> Result<()> {
    require_user(store)?;
    require_complaint(store, id)?;

    let text = text.trim();
    if text.is_empty() {
        bail!("Comment cannot be empty");
    }

    store.add_comment(id, text)?;
    println!("Added comment to complaint {}", id);
    Ok(())
}

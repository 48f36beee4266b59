use anyhow::Result;

use super::{require_complaint, require_user};
use opinaai::store::ComplaintStore;

pub fn run(store: &mut ComplaintStore, id: &str) -> Result<()> {
    let user_id = require_user(store)?.id.clone();
    require_complaint(store, id)?;

    store.like_complaint(id)?;

    if let Some(c) = store.complaint(id) {
        if c.is_liked_by(&user_id) {
            println!("Liked complaint {} ({} likes)", id, c.likes.len());
        } else {
            println!("Removed like from complaint {} ({} likes)", id, c.likes.len());
        }
    }
    Ok(())
}

pub mod comment;
pub mod create;
pub mod delete;
pub mod export;
pub mod init;
pub mod like;
pub mod list;
pub mod respond;
pub mod show;
pub mod stats;
pub mod status;
pub mod users;

use anyhow::{bail, Result};

use opinaai::models::{Complaint, User};
use opinaai::permissions::Permission;
use opinaai::store::ComplaintStore;

// The store silently ignores calls it cannot honor, so commands check first
// and report why.

pub fn require_user(store: &ComplaintStore) -> Result<&User> {
    match store.current_user() {
        Some(u) => Ok(u),
        None => bail!("No current user. Run 'opinaai login <user-id>' first."),
    }
}

pub fn require_permission<'a>(
    store: &'a ComplaintStore,
    permission: Permission,
    action: &str,
) -> Result<&'a User> {
    let user = require_user(store)?;
    if !user.can(permission) {
        bail!("Only administrators can {}", action);
    }
    Ok(user)
}

pub fn require_complaint<'a>(store: &'a ComplaintStore, id: &str) -> Result<&'a Complaint> {
    match store.complaint(id) {
        Some(c) => Ok(c),
        None => bail!("Complaint {} not found", id),
    }
}

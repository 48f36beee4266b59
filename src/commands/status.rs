use anyhow::Result;

use super::{require_complaint, require_permission};
use opinaai::models::Status;
use opinaai::permissions::Permission;
use opinaai::store::ComplaintStore;

pub fn run(store: &mut ComplaintStore, id: &str, status: &str) -> Result<()> {
    let status: Status = status.parse()?;
    require_permission(store, Permission::ChangeStatus, "change complaint status")?;
    let previous = require_complaint(store, id)?.status;

    store.update_complaint_status(id, status)?;

    if previous == status {
        println!("Complaint {} is already {}", id, status);
    } else {
        println!("Complaint {}: {} -> {}", id, previous, status);
    }
    Ok(())
}

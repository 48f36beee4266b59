use anyhow::{bail, Result};

use super::{require_complaint, require_permission};
use opinaai::permissions::Permission;
use opinaai::store::ComplaintStore;

pub fn run(store: &mut ComplaintStore, id: &str, text: &str) -> Result<()> {
    require_permission(store, Permission::Respond, "respond to complaints")?;
    let previous = require_complaint(store, id)?.status;

    let text = text.trim();
    if text.is_empty() {
        bail!("Response cannot be empty");
    }

    store.respond_to_complaint(id, text)?;
    println!("Responded to complaint {}", id);

    if let Some(c) = store.complaint(id) {
        if c.status != previous {
            println!("Status: {} -> {}", previous, c.status);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{setup_test_store, ADMIN_ID};
    use opinaai::models::Status;

    #[test]
    fn test_respond_as_citizen_fails() {
        let (mut store, _dir) = setup_test_store();
        let before = store.complaint("complaint-1").unwrap().clone();
        let result = run(&mut store, "complaint-1", "Olá");
        assert!(result.unwrap_err().to_string().contains("Only administrators"));
        assert_eq!(store.complaint("complaint-1").unwrap(), &before);
    }

    #[test]
    fn test_respond_as_admin() {
        let (mut store, _dir) = setup_test_store();
        store.login(ADMIN_ID).unwrap();
        store
            .update_complaint_status("complaint-1", Status::Awaiting)
            .unwrap();

        run(&mut store, "complaint-1", "Equipe a caminho").unwrap();

        let c = store.complaint("complaint-1").unwrap();
        assert_eq!(c.status, Status::InProgress);
        assert_eq!(c.response.as_ref().unwrap().text, "Equipe a caminho");
    }

    #[test]
    fn test_respond_replaces_previous_response() {
        let (mut store, _dir) = setup_test_store();
        store.login(ADMIN_ID).unwrap();
        run(&mut store, "complaint-1", "Primeira").unwrap();
        run(&mut store, "complaint-1", "Segunda").unwrap();
        let c = store.complaint("complaint-1").unwrap();
        assert_eq!(c.response.as_ref().unwrap().text, "Segunda");
    }

    #[test]
    fn test_respond_nonexistent() {
        let (mut store, _dir) = setup_test_store();
        store.login(ADMIN_ID).unwrap();
        assert!(run(&mut store, "complaint-999", "Oi").is_err());
    }
}

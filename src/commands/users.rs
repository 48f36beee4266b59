use anyhow::{bail, Result};

use opinaai::permissions::Role;
use opinaai::store::ComplaintStore;

pub fn list(store: &ComplaintStore) -> Result<()> {
    let users = store.users()?;
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    let current = store.current_user().map(|u| u.id.as_str());
    let mut marked = false;
    for u in &users {
        // Seeded ids may repeat; only the first match is the logged-in user
        let is_current = !marked && Some(u.id.as_str()) == current;
        marked |= is_current;
        let role = match u.role() {
            Role::Admin => "admin",
            Role::Citizen => "",
        };
        println!(
            "{} {:<14} {:<20} {:<32} {}",
            if is_current { "*" } else { " " },
            u.id,
            u.name,
            u.email,
            role
        );
    }
    Ok(())
}

pub fn login(store: &mut ComplaintStore, id: &str) -> Result<()> {
    if !store.login(id)? {
        bail!("User {} not found", id);
    }
    if let Some(u) = store.current_user() {
        println!("Logged in as {} ({})", u.name, u.id);
    }
    Ok(())
}

pub fn logout(store: &mut ComplaintStore) -> Result<()> {
    store.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(store: &ComplaintStore) -> Result<()> {
    match store.current_user() {
        Some(u) => {
            println!("{} ({})", u.name, u.id);
            println!("Email: {}", u.email);
            if u.is_admin {
                println!("Role: admin");
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{setup_test_store, ADMIN_ID};

    #[test]
    fn test_login_switches_user() {
        let (mut store, _dir) = setup_test_store();
        login(&mut store, ADMIN_ID).unwrap();
        assert!(store.current_user().unwrap().is_admin);
        assert!(whoami(&store).is_ok());
    }

    #[test]
    fn test_login_unknown_user() {
        let (mut store, _dir) = setup_test_store();
        let result = login(&mut store, "user-ghost");
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_logout() {
        let (mut store, _dir) = setup_test_store();
        logout(&mut store).unwrap();
        assert!(store.current_user().is_none());
        assert!(whoami(&store).is_ok());
        assert!(list(&store).is_ok());
    }
}

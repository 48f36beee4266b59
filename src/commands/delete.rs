use anyhow::{bail, Result};
use std::io::{self, Write};

use super::{require_complaint, require_user};
use opinaai::store::ComplaintStore;

pub fn run(store: &mut ComplaintStore, id: &str, force: bool) -> Result<()> {
    let user = require_user(store)?;
    let complaint = require_complaint(store, id)?;

    if !user.can_delete(complaint) {
        bail!("Only the author can delete complaint {}", id);
    }

    if !force {
        print!("Delete complaint {} \"{}\"? [y/N] ", id, complaint.title);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if store.delete_complaint(id)? {
        println!("Deleted complaint {}", id);
    } else {
        bail!("Failed to delete complaint {}", id);
    }

    Ok(())
}

/// Internal function for testing without stdin interaction
#[cfg(test)]
pub fn run_force(store: &mut ComplaintStore, id: &str) -> Result<()> {
    run(store, id, true)
}

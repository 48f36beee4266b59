use anyhow::{bail, Result};

use super::require_user;
use opinaai::models::NewComplaint;
use opinaai::seed::{types_for, CATEGORIES};
use opinaai::store::ComplaintStore;

pub fn validate_category(category: &str, kind: &str) -> Result<()> {
    let types = match types_for(category) {
        Some(t) => t,
        None => {
            let names: Vec<&str> = CATEGORIES.iter().map(|(name, _)| *name).collect();
            bail!(
                "Invalid category '{}'. Must be one of: {}",
                category,
                names.join(", ")
            );
        }
    };
    if !types.contains(&kind) {
        bail!(
            "Invalid type '{}' for {}. Must be one of: {}",
            kind,
            category,
            types.join(", ")
        );
    }
    Ok(())
}

pub fn run(store: &mut ComplaintStore, data: NewComplaint) -> Result<()> {
    require_user(store)?;

    if data.title.trim().is_empty() {
        bail!("Title cannot be empty");
    }
    if data.city.trim().is_empty() {
        bail!("City cannot be empty");
    }
    validate_category(&data.category, &data.kind)?;

    match store.add_complaint(data)? {
        Some(id) => println!("Created complaint {}", id),
        None => bail!("Complaint was not created"),
    }
    Ok(())
}

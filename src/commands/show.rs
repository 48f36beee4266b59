use anyhow::Result;

use super::require_complaint;
use opinaai::store::ComplaintStore;

pub fn run(store: &ComplaintStore, id: &str) -> Result<()> {
    let c = require_complaint(store, id)?;

    println!("Complaint {}: {}", c.id, c.title);
    println!("Status: {}", c.status);
    println!("City: {}", c.city);
    println!("Category: {} / {}", c.category, c.kind);
    println!("Author: {} ({})", c.user_name, c.user_id);
    println!("Posted: {}", c.date.format("%Y-%m-%d %H:%M:%S"));

    let liked = match store.current_user() {
        Some(u) if c.is_liked_by(&u.id) => " (including you)",
        _ => "",
    };
    println!("Likes: {}{}", c.likes.len(), liked);

    if let Some(loc) = &c.location {
        match &loc.address {
            Some(address) => println!("Location: {} ({:.4}, {:.4})", address, loc.lat, loc.lng),
            None => println!("Location: {:.4}, {:.4}", loc.lat, loc.lng),
        }
    }

    if !c.description.is_empty() {
        println!("\nDescription:");
        for line in c.description.lines() {
            println!("  {}", line);
        }
    }

    if !c.images.is_empty() {
        println!("\nImages:");
        for image in &c.images {
            println!("  {}", image);
        }
    }

    if let Some(response) = &c.response {
        println!(
            "\nResponse from {} [{}]:",
            response.admin_name,
            response.date.format("%Y-%m-%d %H:%M")
        );
        for line in response.text.lines() {
            println!("  {}", line);
        }
    }

    if !c.comments.is_empty() {
        println!("\nComments:");
        for comment in &c.comments {
            println!(
                "  [{}] {}: {}",
                comment.date.format("%Y-%m-%d %H:%M"),
                comment.user_name,
                comment.text
            );
        }
    }

    Ok(())
}

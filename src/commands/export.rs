use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

use opinaai::models::{Complaint, Status};
use opinaai::store::ComplaintStore;

pub const EXPORT_VERSION: i32 = 1;

#[derive(Serialize, Deserialize)]
pub struct ExportData {
    pub version: i32,
    pub exported_at: String,
    pub complaints: Vec<Complaint>,
}

fn write_output(content: &str, output_path: Option<&str>, count: usize) -> Result<()> {
    match output_path {
        Some(path) => {
            fs::write(path, content).context("Failed to write export file")?;
            eprintln!("Exported {} complaints to {}", count, path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", content)?;
        }
    }
    Ok(())
}

pub fn run_json(store: &ComplaintStore, output_path: Option<&str>) -> Result<()> {
    let data = ExportData {
        version: EXPORT_VERSION,
        exported_at: chrono::Utc::now().to_rfc3339(),
        complaints: store.complaints().to_vec(),
    };

    let json = serde_json::to_string_pretty(&data)?;
    write_output(&json, output_path, data.complaints.len())
}

pub fn run_markdown(store: &ComplaintStore, output_path: Option<&str>) -> Result<()> {
    let complaints = store.complaints();
    let mut md = String::new();

    md.push_str("# OpinaAi Complaints Export\n\n");
    md.push_str(&format!(
        "Exported: {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for status in Status::ALL {
        let group: Vec<_> = complaints.iter().filter(|c| c.status == status).collect();
        if group.is_empty() {
            continue;
        }
        md.push_str(&format!("## {} ({})\n\n", status, group.len()));
        for complaint in group {
            write_complaint_md(&mut md, complaint);
        }
    }

    write_output(&md, output_path, complaints.len())
}

fn write_complaint_md(md: &mut String, complaint: &Complaint) {
    let checkbox = if complaint.status == Status::Resolved {
        "[x]"
    } else {
        "[ ]"
    };

    md.push_str(&format!(
        "### {} {}: {}\n\n",
        checkbox, complaint.id, complaint.title
    ));
    md.push_str(&format!("- **City:** {}\n", complaint.city));
    md.push_str(&format!(
        "- **Category:** {} / {}\n",
        complaint.category, complaint.kind
    ));
    md.push_str(&format!("- **Author:** {}\n", complaint.user_name));
    md.push_str(&format!("- **Likes:** {}\n", complaint.likes.len()));
    md.push_str(&format!(
        "- **Posted:** {}\n",
        complaint.date.format("%Y-%m-%d")
    ));

    if let Some(ref location) = complaint.location {
        match location.address {
            Some(ref address) => md.push_str(&format!("- **Location:** {}\n", address)),
            None => md.push_str(&format!(
                "- **Location:** {:.5}, {:.5}\n",
                location.lat, location.lng
            )),
        }
    }

    if !complaint.description.is_empty() {
        md.push_str(&format!("\n{}\n", complaint.description));
    }

    if let Some(ref response) = complaint.response {
        md.push_str(&format!(
            "\n**Response** ({}, {}):\n{}\n",
            response.admin_name,
            response.date.format("%Y-%m-%d"),
            response.text
        ));
    }

    if !complaint.comments.is_empty() {
        md.push_str("\n**Comments:**\n");
        for comment in &complaint.comments {
            md.push_str(&format!(
                "- [{}] {}: {}\n",
                comment.date.format("%Y-%m-%d %H:%M"),
                comment.user_name,
                comment.text
            ));
        }
    }

    md.push_str("\n---\n\n");
}

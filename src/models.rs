use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Aguardando")]
    Awaiting,
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[serde(rename = "Resolvido")]
    Resolved,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Awaiting, Status::InProgress, Status::Resolved];

    /// Label as persisted and matched by the status filter.
    pub fn label(self) -> &'static str {
        match self {
            Status::Awaiting => "Aguardando",
            Status::InProgress => "Em Andamento",
            Status::Resolved => "Resolvido",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Aguardando" | "awaiting" => Ok(Status::Awaiting),
            "Em Andamento" | "in-progress" | "in_progress" => Ok(Status::InProgress),
            "Resolvido" | "resolved" => Ok(Status::Resolved),
            _ => bail!(
                "Invalid status '{}'. Must be one of: awaiting, in-progress, resolved",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub text: String,
    pub date: DateTime<Utc>,
    pub admin_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub text: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Status,
    #[serde(default)]
    pub images: Vec<String>,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub date: DateTime<Utc>,
    /// Ids of users who liked the complaint, without duplicates.
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}

impl Complaint {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    /// Adds or removes `user_id` from the likes. Returns true when the
    /// complaint ends up liked.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        if self.is_liked_by(user_id) {
            self.likes.retain(|id| id != user_id);
            false
        } else {
            self.likes.push(user_id.to_string());
            true
        }
    }

    /// Sets the admin response, promoting an awaiting complaint to in progress.
    pub fn respond(&mut self, text: &str, admin_name: &str, date: DateTime<Utc>) {
        self.response = Some(Response {
            text: text.to_string(),
            date,
            admin_name: admin_name.to_string(),
        });
        if self.status == Status::Awaiting {
            self.status = Status::InProgress;
        }
    }
}

/// Fields supplied by the author when posting a complaint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub city: String,
    pub category: String,
    pub kind: String,
    pub images: Vec<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

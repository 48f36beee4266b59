use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::Database;
use crate::models::{Comment, Complaint, Status, User};
use crate::seed::{self, SeedData};

pub const COMPLAINTS_SLOT: &str = "opinaai-complaints";
pub const USERS_SLOT: &str = "opinaai-users";
pub const CURRENT_USER_SLOT: &str = "opinaai-current-user";

pub struct Storage {
    db: Database,
}

impl Storage {
    pub fn new(db: Database) -> Self {
        Storage { db }
    }

    pub fn initialize(&self) -> Result<()> {
        if self.db.get_slot(COMPLAINTS_SLOT)?.is_none() {
            self.seed()?;
        }
        Ok(())
    }

    pub fn seed(&self) -> Result<SeedData> {
        let data = seed::generate(&mut rand::thread_rng(), Utc::now());
        self.write_seed(&data)?;
        Ok(data)
    }

    pub fn write_seed(&self, data: &SeedData) -> Result<()> {
        self.write(COMPLAINTS_SLOT, &data.complaints)?;
        self.write(USERS_SLOT, &data.users)?;
        if let Some(user) = data.users.get(data.current_user) {
            self.write(CURRENT_USER_SLOT, user)?;
        }
        tracing::info!(
            complaints = data.complaints.len(),
            users = data.users.len(),
            "seeded mock data"
        );
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Complaint>> {
        match self.read(COMPLAINTS_SLOT)? {
            Some(complaints) => Ok(complaints),
            None => Ok(self.seed()?.complaints),
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Complaint>> {
        Ok(self.load()?.into_iter().find(|c| c.id == id))
    }

    pub fn save(&self, complaint: &Complaint) -> Result<()> {
        let mut complaints = self.load()?;
        match complaints.iter_mut().find(|c| c.id == complaint.id) {
            Some(existing) => *existing = complaint.clone(),
            None => complaints.push(complaint.clone()),
        }
        self.write(COMPLAINTS_SLOT, &complaints)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut complaints = self.load()?;
        let before = complaints.len();
        complaints.retain(|c| c.id != id);
        let removed = complaints.len() < before;
        self.write(COMPLAINTS_SLOT, &complaints)?;
        Ok(removed)
    }

    pub fn load_users(&self) -> Result<Vec<User>> {
        Ok(self.read(USERS_SLOT)?.unwrap_or_default())
    }

    pub fn load_current_user(&self) -> Result<Option<User>> {
        self.read(CURRENT_USER_SLOT)
    }

    pub fn set_current_user(&self, user: &User) -> Result<()> {
        self.write(CURRENT_USER_SLOT, user)
    }

    pub fn clear_current_user(&self) -> Result<bool> {
        self.db.remove_slot(CURRENT_USER_SLOT)
    }

    pub fn like(&self, id: &str, user_id: &str) -> Result<bool> {
        self.modify(id, |c| {
            c.toggle_like(user_id);
        })
    }

    pub fn add_comment(&self, id: &str, comment: Comment) -> Result<bool> {
        self.modify(id, |c| c.comments.push(comment))
    }

    pub fn respond(&self, id: &str, text: &str, admin_name: &str, date: DateTime<Utc>) -> Result<bool> {
        self.modify(id, |c| c.respond(text, admin_name, date))
    }

    pub fn update_status(&self, id: &str, status: Status) -> Result<bool> {
        self.modify(id, |c| c.status = status)
    }

    fn modify<F>(&self, id: &str, change: F) -> Result<bool>
    where
        F: FnOnce(&mut Complaint),
    {
        let mut complaint = match self.get(id)? {
            Some(c) => c,
            None => {
                tracing::debug!(id, "complaint not found");
                return Ok(false);
            }
        };
        change(&mut complaint);
        self.save(&complaint)?;
        Ok(true)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.get_slot(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .with_context(|| format!("Corrupt data in slot '{}'", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.db.put_slot(key, &raw)
    }
}

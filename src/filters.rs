use anyhow::{bail, Result};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::models::Complaint;

/// Value meaning "do not filter on this field", same as an empty string.
pub const ALL: &str = "all";

/// Listing criteria. Empty fields and `"all"` match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub city: String,
    pub category: String,
    pub kind: String,
    /// Status label, compared exactly (e.g. `"Resolvido"`).
    pub status: String,
    pub search: String,
}

fn is_active(criterion: &str) -> bool {
    !criterion.is_empty() && criterion != ALL
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        !is_active(&self.city)
            && !is_active(&self.category)
            && !is_active(&self.kind)
            && !is_active(&self.status)
            && self.search.is_empty()
    }

    pub fn matches(&self, complaint: &Complaint) -> bool {
        if is_active(&self.city) && complaint.city != self.city {
            return false;
        }
        if is_active(&self.category) && complaint.category != self.category {
            return false;
        }
        if is_active(&self.kind) && complaint.kind != self.kind {
            return false;
        }
        if is_active(&self.status) && complaint.status.label() != self.status {
            return false;
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let haystacks = [
                &complaint.title,
                &complaint.description,
                &complaint.city,
                &complaint.category,
                &complaint.kind,
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, complaints: &[Complaint]) -> Vec<Complaint> {
        complaints
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Recent,
    Likes,
    Comments,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "recent" | "recentes" => Ok(SortOrder::Recent),
            "likes" | "curtidas" => Ok(SortOrder::Likes),
            "comments" | "comentarios" => Ok(SortOrder::Comments),
            _ => bail!(
                "Invalid sort order '{}'. Must be one of: recent, likes, comments",
                s
            ),
        }
    }
}

/// Stable sort; complaints that compare equal keep their relative order.
pub fn sort(complaints: &mut [Complaint], order: SortOrder) {
    match order {
        SortOrder::Recent => complaints.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Likes => complaints.sort_by(|a, b| b.likes.len().cmp(&a.likes.len())),
        SortOrder::Comments => {
            complaints.sort_by(|a, b| b.comments.len().cmp(&a.comments.len()))
        }
    }
}

/// Distinct values available to each filter, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub categories: Vec<String>,
    pub kinds: Vec<String>,
}

pub fn options(complaints: &[Complaint]) -> FilterOptions {
    let mut cities = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut kinds = BTreeSet::new();
    for c in complaints {
        cities.insert(c.city.clone());
        categories.insert(c.category.clone());
        kinds.insert(c.kind.clone());
    }
    FilterOptions {
        cities: cities.into_iter().collect(),
        categories: categories.into_iter().collect(),
        kinds: kinds.into_iter().collect(),
    }
}

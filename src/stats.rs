use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::{Complaint, Status};

pub const CITY_RANKING_LIMIT: usize = 10;
pub const BREAKDOWN_LIMIT: usize = 5;
pub const CHART_MIN_COMPLAINTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub key: String,
    pub total: usize,
    pub resolved: usize,
    pub in_progress: usize,
    pub awaiting: usize,
    pub resolution_rate: u32,
}

impl GroupStats {
    fn new(key: &str) -> Self {
        GroupStats {
            key: key.to_string(),
            total: 0,
            resolved: 0,
            in_progress: 0,
            awaiting: 0,
            resolution_rate: 0,
        }
    }

    fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Resolved => self.resolved += 1,
            Status::InProgress => self.in_progress += 1,
            Status::Awaiting => self.awaiting += 1,
        }
    }

    fn cmp_speed(&self, other: &GroupStats) -> Ordering {
        match (self.total, other.total) {
            (0, 0) => Ordering::Equal,
            (0, _) => 0.cmp(&other.resolved),
            (_, 0) => self.resolved.cmp(&0),
            _ => (self.resolved * other.total).cmp(&(other.resolved * self.total)),
        }
    }
}

pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

pub fn group_by<F>(complaints: &[Complaint], key: F) -> Vec<GroupStats>
where
    F: Fn(&Complaint) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupStats> = Vec::new();

    for complaint in complaints {
        let k = key(complaint);
        let slot = match index.get(k) {
            Some(&i) => i,
            None => {
                index.insert(k.to_string(), groups.len());
                groups.push(GroupStats::new(k));
                groups.len() - 1
            }
        };
        groups[slot].record(complaint.status);
    }

    for group in &mut groups {
        group.resolution_rate = percentage(group.resolved, group.total);
    }
    groups
}

pub fn city_stats(complaints: &[Complaint]) -> Vec<GroupStats> {
    group_by(complaints, |c| c.city.as_str())
}

pub fn category_stats(complaints: &[Complaint]) -> Vec<GroupStats> {
    group_by(complaints, |c| c.category.as_str())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingMetric {
    #[default]
    ResolutionRate,
    Total,
    Speed,
}

impl FromStr for RankingMetric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "resolution" => Ok(RankingMetric::ResolutionRate),
            "total" => Ok(RankingMetric::Total),
            "speed" => Ok(RankingMetric::Speed),
            _ => bail!(
                "Invalid ranking '{}'. Must be one of: resolution, total, speed",
                s
            ),
        }
    }
}

/// Sorts descending by `metric` and keeps the first `limit` groups. Ties
/// keep their incoming order.
pub fn rank(mut groups: Vec<GroupStats>, metric: RankingMetric, limit: usize) -> Vec<GroupStats> {
    match metric {
        RankingMetric::ResolutionRate => {
            groups.sort_by(|a, b| b.resolution_rate.cmp(&a.resolution_rate))
        }
        RankingMetric::Total => groups.sort_by(|a, b| b.total.cmp(&a.total)),
        RankingMetric::Speed => groups.sort_by(|a, b| b.cmp_speed(a)),
    }
    groups.truncate(limit);
    groups
}

pub fn city_ranking(complaints: &[Complaint], metric: RankingMetric) -> Vec<GroupStats> {
    rank(city_stats(complaints), metric, CITY_RANKING_LIMIT)
}

pub fn city_resolution_chart(complaints: &[Complaint]) -> Vec<GroupStats> {
    let eligible = city_stats(complaints)
        .into_iter()
        .filter(|g| g.total >= CHART_MIN_COMPLAINTS)
        .collect();
    rank(eligible, RankingMetric::ResolutionRate, BREAKDOWN_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub group: GroupStats,
    pub percentage: u32,
}

fn top_shares(groups: Vec<GroupStats>, total: usize) -> Vec<Share> {
    rank(groups, RankingMetric::Total, BREAKDOWN_LIMIT)
        .into_iter()
        .map(|group| Share {
            percentage: percentage(group.total, total),
            group,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total: usize,
    pub resolved: usize,
    pub in_progress: usize,
    pub awaiting: usize,
    pub resolution_rate: u32,
    pub total_likes: usize,
    pub total_comments: usize,
    pub average_response_days: f64,
    pub top_categories: Vec<Share>,
    pub top_cities: Vec<Share>,
}

pub fn overview(complaints: &[Complaint]) -> Overview {
    let mut all = GroupStats::new("all");
    for c in complaints {
        all.record(c.status);
    }

    let response_days: Vec<f64> = complaints
        .iter()
        .filter_map(|c| {
            c.response.as_ref().map(|r| {
                let elapsed = r.date.signed_duration_since(c.date);
                elapsed.num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0 * 24.0)
            })
        })
        .collect();
    let average_response_days = if response_days.is_empty() {
        0.0
    } else {
        let mean = response_days.iter().sum::<f64>() / response_days.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    let total = complaints.len();
    Overview {
        total,
        resolved: all.resolved,
        in_progress: all.in_progress,
        awaiting: all.awaiting,
        resolution_rate: percentage(all.resolved, total),
        total_likes: complaints.iter().map(|c| c.likes.len()).sum(),
        total_comments: complaints.iter().map(|c| c.comments.len()).sum(),
        average_response_days,
        top_categories: top_shares(category_stats(complaints), total),
        top_cities: top_shares(city_stats(complaints), total),
    }
}

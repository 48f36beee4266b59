#![no_main]

//! Fuzz target for filtering, sorting and statistics.
//!
//! Search lowercases arbitrary Unicode and the statistics divide by group
//! sizes, so both are checked for panics and for the subset property.

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

use opinaai::filters::{self, Filters, SortOrder};
use opinaai::models::{Complaint, Status};
use opinaai::stats::{self, RankingMetric};

#[derive(Arbitrary, Debug)]
struct FuzzComplaint {
    title: String,
    description: String,
    city: String,
    category: String,
    kind: String,
    status: u8,
    likes: u8,
    posted_secs: u32,
    response_after_secs: Option<u32>,
}

#[derive(Arbitrary, Debug)]
struct FiltersInput {
    complaints: Vec<FuzzComplaint>,
    city: String,
    category: String,
    status: String,
    search: String,
    sort: u8,
}

fn build(i: usize, f: &FuzzComplaint) -> Complaint {
    let date = Utc.timestamp_opt(i64::from(f.posted_secs), 0).unwrap();
    let mut complaint = Complaint {
        id: format!("complaint-{}", i),
        title: f.title.clone(),
        description: f.description.clone(),
        city: f.city.clone(),
        category: f.category.clone(),
        kind: f.kind.clone(),
        status: Status::ALL[usize::from(f.status) % 3],
        images: Vec::new(),
        user_id: "user-0".to_string(),
        user_name: "Fuzz".to_string(),
        user_avatar: None,
        date,
        likes: (0..f.likes % 16).map(|n| format!("user-{}", n)).collect(),
        comments: Vec::new(),
        location: None,
        response: None,
    };
    if let Some(after) = f.response_after_secs {
        let when = date + chrono::Duration::seconds(i64::from(after));
        let status = complaint.status;
        complaint.respond("ok", "Admin", when);
        complaint.status = status;
    }
    complaint
}

fuzz_target!(|input: FiltersInput| {
    let complaints: Vec<Complaint> = input
        .complaints
        .iter()
        .take(64)
        .enumerate()
        .map(|(i, f)| build(i, f))
        .collect();

    let criteria = Filters {
        city: input.city,
        category: input.category,
        kind: String::new(),
        status: input.status,
        search: input.search,
    };

    let mut matched = criteria.apply(&complaints);
    assert!(matched.len() <= complaints.len());
    assert!(matched.iter().all(|c| criteria.matches(c)));

    let order = match input.sort % 3 {
        0 => SortOrder::Recent,
        1 => SortOrder::Likes,
        _ => SortOrder::Comments,
    };
    filters::sort(&mut matched, order);
    let _ = filters::options(&complaints);

    for metric in [RankingMetric::ResolutionRate, RankingMetric::Total, RankingMetric::Speed] {
        let ranked = stats::city_ranking(&complaints, metric);
        assert!(ranked.len() <= stats::CITY_RANKING_LIMIT);
    }
    for group in stats::category_stats(&complaints) {
        assert!(group.resolution_rate <= 100);
        assert_eq!(group.total, group.resolved + group.in_progress + group.awaiting);
    }
    let overview = stats::overview(&complaints);
    assert_eq!(overview.total, complaints.len());
    assert!(overview.average_response_days >= 0.0);
});

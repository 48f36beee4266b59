use anyhow::Result;

use super::list::truncate;
use opinaai::stats::{self, GroupStats, RankingMetric, Share};
use opinaai::store::ComplaintStore;

fn medal(position: usize) -> &'static str {
    match position {
        0 => "gold",
        1 => "silver",
        2 => "bronze",
        _ => "",
    }
}

fn print_group_row(position: usize, g: &GroupStats) {
    println!(
        "{:>2}. {:<20} {:>4} {:>4} {:>4} {:>4} {:>4}% {}",
        position + 1,
        truncate(&g.key, 20),
        g.total,
        g.resolved,
        g.in_progress,
        g.awaiting,
        g.resolution_rate,
        medal(position)
    );
}

fn print_group_header() {
    println!(
        "    {:<20} {:>4} {:>4} {:>4} {:>4} {:>5}",
        "", "tot", "res", "prog", "wait", "rate"
    );
}

pub fn cities(store: &ComplaintStore, by: &str, limit: Option<usize>) -> Result<()> {
    let metric: RankingMetric = by.parse()?;
    let ranked = stats::rank(
        stats::city_stats(store.complaints()),
        metric,
        limit.unwrap_or(stats::CITY_RANKING_LIMIT),
    );

    if ranked.is_empty() {
        println!("No complaints yet.");
        return Ok(());
    }

    println!("City ranking by {}:", by);
    print_group_header();
    for (i, g) in ranked.iter().enumerate() {
        print_group_row(i, g);
    }
    Ok(())
}

fn category_ranking(store: &ComplaintStore, limit: Option<usize>) -> Vec<GroupStats> {
    stats::rank(
        stats::category_stats(store.complaints()),
        RankingMetric::Total,
        limit.unwrap_or(stats::BREAKDOWN_LIMIT),
    )
}

pub fn categories(store: &ComplaintStore, limit: Option<usize>) -> Result<()> {
    let ranked = category_ranking(store, limit);

    if ranked.is_empty() {
        println!("No complaints yet.");
        return Ok(());
    }

    println!("Complaints per category:");
    print_group_header();
    for (i, g) in ranked.iter().enumerate() {
        print_group_row(i, g);
    }
    Ok(())
}

fn print_shares(title: &str, shares: &[Share]) {
    println!("\n{}:", title);
    for s in shares {
        println!(
            "  {:<20} {:>4} ({:>3}%)  resolved {:>3}%",
            truncate(&s.group.key, 20),
            s.group.total,
            s.percentage,
            s.group.resolution_rate
        );
    }
}

pub fn overview(store: &ComplaintStore) -> Result<()> {
    let o = stats::overview(store.complaints());

    println!("Complaints: {}", o.total);
    println!("  Resolved:    {}", o.resolved);
    println!("  In progress: {}", o.in_progress);
    println!("  Awaiting:    {}", o.awaiting);
    println!("Resolution rate: {}%", o.resolution_rate);
    println!("Likes: {}", o.total_likes);
    println!("Comments: {}", o.total_comments);
    println!("Average response time: {:.1} days", o.average_response_days);

    if !o.top_categories.is_empty() {
        print_shares("Top categories", &o.top_categories);
    }
    if !o.top_cities.is_empty() {
        print_shares("Top cities", &o.top_cities);
    }
    Ok(())
}

pub fn chart(store: &ComplaintStore) -> Result<()> {
    let cities = stats::city_resolution_chart(store.complaints());

    if cities.is_empty() {
        println!(
            "No city has at least {} complaints.",
            stats::CHART_MIN_COMPLAINTS
        );
        return Ok(());
    }

    println!("Resolution rate by city:");
    for g in &cities {
        let bar = "#".repeat((g.resolution_rate / 5) as usize);
        println!(
            "  {:<20} {:<20} {:>3}% ({}/{})",
            truncate(&g.key, 20),
            bar,
            g.resolution_rate,
            g.resolved,
            g.total
        );
    }
    Ok(())
}

use anyhow::Result;

use opinaai::filters::{self, Filters, SortOrder};
use opinaai::store::ComplaintStore;

pub fn run(store: &mut ComplaintStore, criteria: Filters, sort: &str) -> Result<()> {
    let order: SortOrder = sort.parse()?;
    store.set_filters(criteria);

    let mut complaints = store.filtered().to_vec();
    filters::sort(&mut complaints, order);

    if complaints.is_empty() {
        println!("No complaints found.");
        return Ok(());
    }

    for c in &complaints {
        let status_display = format!("[{}]", c.status);
        let date = c.date.format("%Y-%m-%d");
        println!(
            "{:<16} {:14} {:<40} {:<16} {:>3} likes {:>2} comments {}",
            c.id,
            status_display,
            truncate(&c.title, 40),
            truncate(&c.city, 16),
            c.likes.len(),
            c.comments.len(),
            date
        );
    }
    println!("\n{} of {} complaints", complaints.len(), store.complaints().len());

    Ok(())
}

pub fn options(store: &ComplaintStore) -> Result<()> {
    let opts = store.filter_options();
    for (name, values) in [
        ("Cities", &opts.cities),
        ("Categories", &opts.categories),
        ("Types", &opts.kinds),
    ] {
        println!("{}:", name);
        for v in values {
            println!("  {}", v);
        }
    }
    Ok(())
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::setup_test_store;
    use proptest::prelude::*;

    #[test]
    fn test_list_applies_filters_to_store() {
        let (mut store, _dir) = setup_test_store();
        let criteria = Filters {
            status: "Resolvido".to_string(),
            ..Default::default()
        };
        run(&mut store, criteria.clone(), "recent").unwrap();
        assert_eq!(store.filters(), &criteria);
        assert!(store
            .filtered()
            .iter()
            .all(|c| c.status.label() == "Resolvido"));
    }

    #[test]
    fn test_list_no_matches() {
        let (mut store, _dir) = setup_test_store();
        let criteria = Filters {
            search: "nada parecido com isso".to_string(),
            ..Default::default()
        };
        assert!(run(&mut store, criteria, "likes").is_ok());
        assert!(store.filtered().is_empty());
    }

    #[test]
    fn test_list_invalid_sort() {
        let (mut store, _dir) = setup_test_store();
        let result = run(&mut store, Filters::default(), "oldest");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid sort order"));
    }

    #[test]
    fn test_options_cover_every_complaint() {
        let (store, _dir) = setup_test_store();
        assert!(options(&store).is_ok());

        let opts = store.filter_options();
        assert!(opts.cities.windows(2).all(|w| w[0] < w[1]));
        for c in store.complaints() {
            assert!(opts.cities.contains(&c.city));
            assert!(opts.categories.contains(&c.category));
            assert!(opts.kinds.contains(&c.kind));
        }
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Iluminação Pública", 40), "Iluminação Pública");
        assert_eq!(truncate("Florianópolis", 8), "Flori...");
    }

    proptest! {
        #[test]
        fn prop_truncate_respects_limit(s in "\\PC{0,80}", max in 3usize..50) {
            let out = truncate(&s, max);
            prop_assert!(out.chars().count() <= max);
        }
    }
}

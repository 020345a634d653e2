use super::model::{Record, RecordSet};

// ---------------------------------------------------------------------------
// Search filter
// ---------------------------------------------------------------------------

/// Whether a record matches a search term.
///
/// Matching is case-insensitive substring search over **text** cells only.
/// Numbers and booleans are never scanned, so searching `"12"` will not hit a
/// numeric `12` cell. An empty term matches everything.
pub fn matches(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record_matches_lowercase(record, &needle)
}

fn record_matches_lowercase(record: &Record, needle: &str) -> bool {
    record
        .values()
        .filter_map(|v| v.as_text())
        .any(|text| text.to_lowercase().contains(needle))
}

/// Return indices of records in `full` that match `term`, in original order.
pub fn filtered_indices(full: &[Record], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..full.len()).collect();
    }
    let needle = term.to_lowercase();
    full.iter()
        .enumerate()
        .filter(|(_, rec)| record_matches_lowercase(rec, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// The subsequence of `full` matching `term`.
pub fn filter(full: &[Record], term: &str) -> RecordSet {
    filtered_indices(full, term)
        .into_iter()
        .map(|i| full[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn routes(names: &[&str]) -> RecordSet {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Record::new()
                    .with("route", *name)
                    .with("% Complete", i as f64 / 10.0)
            })
            .collect()
    }

    #[test]
    fn empty_term_is_identity() {
        let full = routes(&["101", "112", "Depot"]);
        assert_eq!(filter(&full, ""), full);
        assert_eq!(filtered_indices(&full, ""), vec![0, 1, 2]);
    }

    #[test]
    fn case_insensitive_substring() {
        let full = routes(&["North Loop", "south loop", "Depot"]);
        assert_eq!(filtered_indices(&full, "LOOP"), vec![0, 1]);
        assert_eq!(filtered_indices(&full, "pot"), vec![2]);
        assert!(filtered_indices(&full, "airport").is_empty());
    }

    #[test]
    fn numbers_and_booleans_are_not_scanned() {
        let full = vec![
            Record::new().with("route", "A").with("stops", 12.0),
            Record::new().with("route", "B").with("late", true),
            Record::new().with("route", "C12"),
        ];
        assert_eq!(filtered_indices(&full, "12"), vec![2]);
        assert!(filtered_indices(&full, "true").is_empty());
    }

    #[test]
    fn route_digits_scenario_preserves_order() {
        let full = routes(&["112", "7", "120", "212", "12", "21"]);
        let view = filter(&full, "12");
        let got: Vec<String> = view.iter().map(|r| r.display("route")).collect();
        assert_eq!(got, vec!["112", "120", "212", "12"]);
    }

    #[test]
    fn every_match_contains_term_and_filter_is_idempotent() {
        let full = routes(&["Alpha", "beta", "ALPHABET", "gamma", "", "alp"]);
        for term in ["", "alp", "A", "bet", "zzz"] {
            let once = filter(&full, term);
            for rec in &once {
                assert!(matches(rec, term), "{rec:?} should match {term:?}");
            }
            assert_eq!(filter(&once, term), once);
        }
    }

    #[test]
    fn records_without_text_never_match_a_term() {
        let rec = Record::new().with("% Complete", 0.5);
        assert!(matches(&rec, ""));
        assert!(!matches(&rec, "0.5"));
    }
}

//! Deduplication of deployment records gathered from several requests.

use std::collections::HashMap;

use crate::api::types::Deployment;

/// Collapse records by id, keeping the copy with the larger creation time.
///
/// On equal creation times the first-seen copy is kept. The result is sorted
/// by creation time, newest first; the sort is stable so equal timestamps keep
/// encounter order.
pub fn merge(records: impl IntoIterator<Item = Deployment>) -> Vec<Deployment> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<Deployment> = Vec::new();

    for record in records {
        match index.get(&record.id) {
            Some(&slot) => {
                if record.created_at > kept[slot].created_at {
                    kept[slot] = record;
                }
            }
            None => {
                index.insert(record.id.clone(), kept.len());
                kept.push(record);
            }
        }
    }

    sort_newest_first(&mut kept);
    kept
}

/// Stable sort by creation time, descending.
pub fn sort_newest_first(records: &mut [Deployment]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DeploymentState;
    use crate::api::types::test_support::deployment;

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_keeps_newest_copy() {
        let old = deployment("a", "web", 100);
        let mut newer = deployment("a", "web", 200);
        newer.state = DeploymentState::Error;

        let merged = merge(vec![old, newer.clone(), deployment("b", "web", 150)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], newer);
        assert_eq!(merged[1].id, "b");
    }

    #[test]
    fn test_merge_older_copy_does_not_replace() {
        let mut first = deployment("a", "web", 200);
        first.state = DeploymentState::Building;
        let merged = merge(vec![first.clone(), deployment("a", "web", 100)]);
        assert_eq!(merged, vec![first]);
    }

    #[test]
    fn test_merge_tie_keeps_first_seen() {
        let mut first = deployment("a", "web", 100);
        first.state = DeploymentState::Building;
        let mut second = deployment("a", "web", 100);
        second.state = DeploymentState::Ready;

        let merged = merge(vec![first, second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].state, DeploymentState::Building);
    }

    #[test]
    fn test_merge_output_sorted_descending() {
        let input = vec![
            deployment("a", "web", 5),
            deployment("b", "web", 50),
            deployment("c", "docs", 20),
            deployment("a", "web", 70),
            deployment("d", "docs", 50),
        ];
        let merged = merge(input);

        assert_eq!(merged.len(), 4);
        for pair in merged.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        // Equal timestamps keep encounter order: b before d
        let ids: Vec<&str> = merged.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d", "c"]);
    }
}

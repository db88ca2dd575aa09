use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::debug;

use crate::item::{Item, ItemId};
use crate::progress::ProgressSnapshot;

/// Orders one study session: overdue reviews first (earliest first, ties in
/// collection order), then at most `new_item_quota` NEW items in collection
/// order. A negative quota admits no NEW items.
///
/// The result owns its ids, so later edits to the collection do not change it.
pub fn build_queue(items: &[Item], new_item_quota: i64, now: DateTime<Utc>) -> Vec<ItemId> {
    let quota = usize::try_from(new_item_quota.max(0)).unwrap_or(usize::MAX);

    let due_reviews = items
        .iter()
        .filter(|item| item.is_due(now))
        // stable, so equal instants keep collection order
        .sorted_by_key(|item| item.next_review_at)
        .map(|item| item.id.clone())
        .collect_vec();
    let new_items = items
        .iter()
        .filter(|item| item.is_new())
        .take(quota)
        .map(|item| item.id.clone())
        .collect_vec();

    debug!(
        "queue built: {} due reviews, {} new (quota {new_item_quota})",
        due_reviews.len(),
        new_items.len()
    );
    due_reviews.into_iter().chain(new_items).collect()
}

/// New items still allowed today. Negative once the learner has gone past the cap.
pub fn session_quota(progress: &ProgressSnapshot) -> i64 {
    i64::from(progress.daily_new_item_quota) - i64::from(progress.items_learned_today)
}

pub fn due_count(items: &[Item], now: DateTime<Utc>) -> usize {
    items.iter().filter(|item| item.is_due(now)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStatus;
    use crate::test_helpers::{at, new_item, review_item};

    fn ids(queue: &[ItemId]) -> Vec<&str> {
        queue.iter().map(ItemId::as_str).collect()
    }

    fn collection() -> Vec<Item> {
        vec![
            new_item("n1"),
            review_item("r2", at(2024, 3, 2, 0)),
            new_item("n2"),
            review_item("r1", at(2024, 3, 1, 0)),
            new_item("n3"),
            review_item("r3", at(2024, 3, 3, 0)),
            new_item("n4"),
            new_item("n5"),
        ]
    }

    #[test]
    fn reviews_sorted_then_new_in_collection_order() {
        let now = at(2024, 3, 10, 0);
        let queue = build_queue(&collection(), 2, now);
        assert_eq!(ids(&queue), ["r1", "r2", "r3", "n1", "n2"]);
    }

    #[test]
    fn negative_quota_admits_no_new_items() {
        let now = at(2024, 3, 10, 0);
        let queue = build_queue(&collection(), -3, now);
        assert_eq!(ids(&queue), ["r1", "r2", "r3"]);
        assert!(build_queue(&collection(), 0, now).len() == 3);
    }

    #[test]
    fn huge_quota_takes_every_new_item() {
        let now = at(2024, 3, 10, 0);
        let queue = build_queue(&collection(), i64::MAX, now);
        assert_eq!(queue.len(), 8);
    }

    #[test]
    fn not_yet_due_reviews_are_left_out() {
        let now = at(2024, 3, 2, 0);
        let queue = build_queue(&collection(), 0, now);
        // due exactly at `now` counts
        assert_eq!(ids(&queue), ["r1", "r2"]);
        assert_eq!(due_count(&collection(), now), 2);
    }

    #[test]
    fn equal_due_instants_keep_collection_order() {
        let due = at(2024, 3, 1, 0);
        let items = vec![
            review_item("b", due),
            review_item("a", due),
            review_item("c", at(2024, 2, 1, 0)),
        ];
        let queue = build_queue(&items, 5, at(2024, 3, 5, 0));
        assert_eq!(ids(&queue), ["c", "b", "a"]);
    }

    #[test]
    fn new_items_never_count_as_due() {
        // NEW items carry an epoch `next_review_at`, which is always in the past
        let items = vec![new_item("n1")];
        assert_eq!(due_count(&items, at(2024, 3, 5, 0)), 0);
        let learning = Item {
            status: ItemStatus::Learning,
            interval_days: 1,
            next_review_at: at(2024, 3, 4, 0),
            ..new_item("l1")
        };
        assert_eq!(due_count(&[learning], at(2024, 3, 5, 0)), 1);
    }

    #[test]
    fn building_twice_is_identical() {
        let now = at(2024, 3, 10, 0);
        let items = collection();
        assert_eq!(build_queue(&items, 2, now), build_queue(&items, 2, now));
    }

    #[test]
    fn queue_is_a_snapshot() {
        let now = at(2024, 3, 10, 0);
        let mut items = collection();
        let queue = build_queue(&items, 2, now);
        items.remove(0);
        items.reverse();
        assert_eq!(ids(&queue), ["r1", "r2", "r3", "n1", "n2"]);
    }

    #[test]
    fn quota_left_today() {
        let progress = ProgressSnapshot {
            daily_new_item_quota: 5,
            items_learned_today: 8,
            ..ProgressSnapshot::new(5)
        };
        assert_eq!(session_quota(&progress), -3);
        assert_eq!(session_quota(&ProgressSnapshot::new(5)), 5);
    }
}

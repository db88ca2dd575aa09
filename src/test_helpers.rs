use chrono::{DateTime, TimeZone, Utc};

use crate::item::{Item, ItemContent, ItemStatus};

pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub(crate) fn new_item(id: &str) -> Item {
    Item::with_id(
        id.into(),
        ItemContent {
            term: format!("term-{id}"),
            transcription: format!("tr-{id}"),
            meaning: format!("meaning-{id}"),
            ..Default::default()
        },
        at(2024, 1, 1, 0),
    )
}

/// A reviewed item due at `due`.
pub(crate) fn review_item(id: &str, due: DateTime<Utc>) -> Item {
    Item {
        status: ItemStatus::Review,
        interval_days: 6,
        repetition_count: 2,
        next_review_at: due,
        ..new_item(id)
    }
}


use chrono::{DateTime, Utc};

use crate::item::{Item, ItemContent};

struct Seed {
    id: &'static str,
    term: &'static str,
    transcription: &'static str,
    meaning: &'static str,
    example: &'static str,
    example_transcription: &'static str,
    example_translation: &'static str,
    level: u8,
    tags: &'static [&'static str],
}

static SEEDS: [Seed; 5] = [
    Seed {
        id: "seed-1",
        term: "你好",
        transcription: "nei5 hou2",
        meaning: "你好",
        example: "你好吗？",
        example_transcription: "nei5 hou2 maa3?",
        example_translation: "你好吗？",
        level: 1,
        tags: &["问候", "基础"],
    },
    Seed {
        id: "seed-2",
        term: "多謝",
        transcription: "do1 ze6",
        meaning: "谢谢 (礼物/帮助)",
        example: "多謝你的禮物。",
        example_transcription: "do1 ze6 nei5 ge3 lai5 mat6.",
        example_translation: "谢谢你的礼物。",
        level: 1,
        tags: &["问候", "基础"],
    },
    Seed {
        id: "seed-3",
        term: "唔該",
        transcription: "m4 goi1",
        meaning: "谢谢 (服务/劳驾)",
        example: "唔該借歪。",
        example_transcription: "m4 goi1 ze3 waai1.",
        example_translation: "劳驾借过。",
        level: 1,
        tags: &["问候", "基础"],
    },
    Seed {
        id: "seed-4",
        term: "早晨",
        transcription: "zou2 san4",
        meaning: "早上好",
        example: "各位早晨！",
        example_transcription: "gok3 wai2 zou2 san4!",
        example_translation: "各位早上好！",
        level: 1,
        tags: &["问候"],
    },
    Seed {
        id: "seed-5",
        term: "猴賽雷",
        transcription: "hau4 coi3 leoi4",
        meaning: "好厉害 (音译梗)",
        example: "你真係猴賽雷呀！",
        example_transcription: "nei5 zan1 hai6 hau4 coi3 leoi4 aa3!",
        example_translation: "你真是好厉害啊！",
        level: 2,
        tags: &["俗语", "流行"],
    },
];

/// Starter items for a learner with no saved data. All NEW.
pub fn seed_items(now: DateTime<Utc>) -> Vec<Item> {
    SEEDS
        .iter()
        .map(|seed| {
            Item::with_id(
                seed.id.into(),
                ItemContent {
                    term: seed.term.into(),
                    transcription: seed.transcription.into(),
                    meaning: seed.meaning.into(),
                    example: Some(seed.example.into()),
                    example_transcription: Some(seed.example_transcription.into()),
                    example_translation: Some(seed.example_translation.into()),
                    tags: seed.tags.iter().map(|&tag| tag.to_owned()).collect(),
                    difficulty_level: seed.level,
                },
                now,
            )
        })
        .collect()
}

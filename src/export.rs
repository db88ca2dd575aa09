use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono_tz::Tz;
use log::info;
use serde::Serialize;
use snafu::ResultExt;

use crate::error::{ExportSnafu, IoSnafu, Result};
use crate::item::Item;

#[derive(Serialize)]
struct ItemRow<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Term")]
    term: &'a str,
    #[serde(rename = "Transcription")]
    transcription: &'a str,
    #[serde(rename = "Meaning")]
    meaning: &'a str,
    #[serde(rename = "Example")]
    example: &'a str,
    #[serde(rename = "Example Transcription")]
    example_transcription: &'a str,
    #[serde(rename = "Example Translation")]
    example_translation: &'a str,
    #[serde(rename = "Tags")]
    tags: String,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Next Review")]
    next_review: String,
}

impl<'a> ItemRow<'a> {
    fn new(item: &'a Item, tz: Tz) -> Self {
        let content = &item.content;
        Self {
            id: item.id.as_str(),
            term: &content.term,
            transcription: &content.transcription,
            meaning: &content.meaning,
            example: content.example.as_deref().unwrap_or_default(),
            example_transcription: content.example_transcription.as_deref().unwrap_or_default(),
            example_translation: content.example_translation.as_deref().unwrap_or_default(),
            tags: content.tags.join(";"),
            status: item.status.into(),
            next_review: item
                .next_review_at
                .with_timezone(&tz)
                .format("%Y-%m-%d")
                .to_string(),
        }
    }
}

/// Writes one CSV row per item in collection order, headed by the column names.
/// An empty collection writes nothing at all.
pub fn export_csv<W: Write>(items: &[Item], tz: Tz, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for item in items {
        csv.serialize(ItemRow::new(item, tz)).context(ExportSnafu)?;
    }
    csv.flush().map_err(csv::Error::from).context(ExportSnafu)?;
    Ok(())
}

pub fn export_csv_file(items: &[Item], tz: Tz, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).context(IoSnafu { path })?;
    export_csv(items, tz, file)?;
    info!("exported {} items to {}", items.len(), path.display());
    Ok(())
}

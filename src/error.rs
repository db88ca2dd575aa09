use std::path::PathBuf;

use snafu::Snafu;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum EngineError {
    #[snafu(display("outcome ordinal {value} is not one of 0..=3"))]
    InvalidOutcome { value: i64 },
    #[snafu(display("session is not accepting ratings"))]
    SessionClosed,
    #[snafu(display("session has not completed"))]
    SessionIncomplete,
    #[snafu(display("io failed at {}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("malformed json document"))]
    Json { source: serde_json::Error },
    #[snafu(display("could not write export"))]
    Export { source: csv::Error },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

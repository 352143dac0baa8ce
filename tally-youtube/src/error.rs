use thiserror::Error;

/// Everything that can go wrong between a results page and its records.
///
/// Each variant is fatal for the page it came from; callers decide whether a
/// failed page aborts the run or is skipped.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("age unit not recognized: \"{unit}\" in \"{text}\"")]
    UnknownAgeUnit { unit: String, text: String },

    #[error("age format not recognized: \"{0}\"")]
    UnrecognizedAge(String),

    #[error("age out of range: \"{0}\"")]
    AgeOverflow(String),

    #[error("malformed video record {video_id}: {field} {reason}")]
    MalformedRecord {
        video_id: String,
        field: &'static str,
        reason: String,
    },

    #[error("page carries no ytInitialData assignment")]
    MissingInitialData,

    #[error("ytInitialData is not valid JSON: {0}")]
    InvalidInitialData(#[source] serde_json::Error),
}

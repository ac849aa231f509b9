// hallticket-pdf: error types shared by the engine and its collaborators

use thiserror::Error;

/// A candidate row that cannot be turned into a ticket.
///
/// These are contract violations on the caller's side: the batch skips the
/// record, counts it as failed, and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("{count} subjects do not fit in a ticket block (maximum {max})")]
    TooManySubjects { count: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Unsupported roster format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

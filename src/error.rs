use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single field value that could not be normalized for display.
///
/// Carried per record so a bad row can be logged and skipped without
/// aborting the rest of the file.
#[derive(Debug, Clone, Error)]
#[error("field '{field}' has invalid value '{value}': {reason}")]
pub struct FormatError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl FormatError {
    pub fn new(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        FormatError {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures raised by the document renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("banner image not found or unreadable: {0}")]
    MissingAsset(PathBuf),
    #[error("unsupported image format for {path}: {reason}")]
    BadAsset { path: PathBuf, reason: String },
    #[error("pdf write failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Error type covering a full per-file report generation.
///
/// One value of this enum is reported per failed input file; the batch
/// driver logs it and moves on to the next file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("input file '{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("input file '{path}' is unreadable: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("input file '{path}' is not valid delimited text: {source}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("no usable records in '{path}'")]
    EmptyInput { path: PathBuf },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

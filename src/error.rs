//! Error types for vizblock library.

use std::io;
use thiserror::Error;

/// Result type alias for vizblock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering or exporting content blocks.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The descriptor payload is not valid JSON.
    #[error("Descriptor JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The export format is not offered for this content type.
    #[error("Export as {format} is not available for '{tag}' content")]
    ExportUnavailable {
        /// Requested format
        format: String,
        /// Tag of the content being exported
        tag: String,
    },

    /// Unrecognized export format name.
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// Error while converting a surface into a bitmap.
    #[error("Rasterization error: {0}")]
    Raster(String),

    /// Error encoding a bitmap.
    #[error("Image encoding error: {0}")]
    ImageEncode(#[from] image::ImageError),

    /// Error building the PDF document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error writing CSV records.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error fetching a remote resource.
    #[error("Fetch error for {url}: {reason}")]
    Fetch {
        /// Resource URL
        url: String,
        /// Failure description
        reason: String,
    },

    /// Error saving an artifact.
    #[error("Save error for {filename}: {reason}")]
    Save {
        /// Target file name
        filename: String,
        /// Failure description
        reason: String,
    },

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ExportUnavailable {
            format: "csv".to_string(),
            tag: "line-chart".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Export as csv is not available for 'line-chart' content"
        );

        let err = Error::UnknownFormat("docx".to_string());
        assert_eq!(err.to_string(), "Unknown export format: docx");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}

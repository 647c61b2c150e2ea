//! Exported artifact detection.
//!
//! Identifies the files the export pipeline writes: PNG images, PDF
//! documents and CSV tables.

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use std::fs;
use std::path::Path;

/// Detected artifact format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// PNG image with its pixel size
    Png {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// PDF document
    Pdf {
        /// Header version (e.g., "1.5")
        version: String,
    },
    /// CSV table
    Csv {
        /// Number of header fields
        columns: usize,
        /// Number of data records
        records: usize,
    },
}

impl ArtifactFormat {
    /// The export format that produces this kind of artifact.
    pub fn export_format(&self) -> ExportFormat {
        match self {
            ArtifactFormat::Png { .. } => ExportFormat::Image,
            ArtifactFormat::Pdf { .. } => ExportFormat::Pdf,
            ArtifactFormat::Csv { .. } => ExportFormat::Csv,
        }
    }
}

impl std::fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactFormat::Png { width, height } => write!(f, "PNG {}x{}", width, height),
            ArtifactFormat::Pdf { version } => write!(f, "PDF {}", version),
            ArtifactFormat::Csv { columns, records } => {
                write!(f, "CSV {} columns, {} records", columns, records)
            }
        }
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_VERSION_LEN: usize = 3;

/// Detect the artifact format of a file.
///
/// # Example
/// ```no_run
/// use vizblock::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("Sales Report.pdf").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ArtifactFormat> {
    let data = fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the artifact format of in-memory bytes.
///
/// CSV is only recognized when the whole input is UTF-8 text whose
/// records all have the header's field count.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ArtifactFormat> {
    if data.starts_with(PNG_MAGIC) {
        return detect_png(data);
    }

    if data.starts_with(PDF_MAGIC) {
        let version = data
            .get(PDF_MAGIC.len()..PDF_MAGIC.len() + PDF_VERSION_LEN)
            .map(|v| String::from_utf8_lossy(v).to_string())
            .filter(|v| is_valid_version(v))
            .ok_or_else(|| Error::UnknownFormat("PDF with invalid header".to_string()))?;
        return Ok(ArtifactFormat::Pdf { version });
    }

    detect_csv(data)
}

fn detect_png(data: &[u8]) -> Result<ArtifactFormat> {
    // IHDR is always the first chunk: length(4) type(4) width(4) height(4)
    let ihdr = data
        .get(PNG_MAGIC.len()..PNG_MAGIC.len() + 16)
        .filter(|chunk| &chunk[4..8] == b"IHDR")
        .ok_or_else(|| Error::UnknownFormat("truncated PNG".to_string()))?;

    let width = u32::from_be_bytes([ihdr[8], ihdr[9], ihdr[10], ihdr[11]]);
    let height = u32::from_be_bytes([ihdr[12], ihdr[13], ihdr[14], ihdr[15]]);
    Ok(ArtifactFormat::Png { width, height })
}

fn detect_csv(data: &[u8]) -> Result<ArtifactFormat> {
    let unknown = || Error::UnknownFormat("unrecognized artifact".to_string());

    let text = std::str::from_utf8(data).map_err(|_| unknown())?;
    if text.trim().is_empty() || text.contains('\0') {
        return Err(unknown());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let columns = reader.headers().map_err(|_| unknown())?.len();
    let mut records = 0;
    for record in reader.records() {
        record.map_err(|_| unknown())?;
        records += 1;
    }

    Ok(ArtifactFormat::Csv { columns, records })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes look like an exported artifact.
pub fn is_artifact_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

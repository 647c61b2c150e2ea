//! # vizblock
//!
//! Rendering and export of tagged content blocks.
//!
//! A content block is a small JSON descriptor (`{"type": "bar-chart", ...}`)
//! naming what to show. This library turns descriptors into concrete visuals
//! (rich text, tables, charts, image carousels) and exports them as PNG, PDF
//! or CSV files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vizblock::{ContentDescriptor, ContentRenderer, ExportFormat, ExportPipeline};
//!
//! fn main() -> vizblock::Result<()> {
//!     let descriptor = ContentDescriptor::from_json(
//!         r#"{"type": "table", "title": "Q1",
//!             "data": [{"name": "John", "sales": 100}]}"#,
//!     )?;
//!
//!     let content = ContentRenderer::default().render(&descriptor);
//!     println!("{}", vizblock::render::to_text(&content.scene()));
//!
//!     let path = ExportPipeline::to_directory("out").export(ExportFormat::Csv, &content)?;
//!     println!("saved {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Tag dispatch**: text, table, line/bar/pie charts and image galleries,
//!   with a markdown fallback for anything unrecognized
//! - **Image carousel**: windowed strip, lightbox, keyboard navigation and
//!   single-flight downloads
//! - **Export**: PNG and PDF through a rasterizer, CSV straight from rows
//! - **Parallel batch export**: uses Rayon for many blocks at once

pub mod carousel;
pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use carousel::{
    CarouselState, DownloadManager, DownloadOutcome, Key, KeyboardHub, MediaCarousel, RemoteFetch,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, ArtifactFormat};
pub use error::{Error, Result};
pub use export::{
    Artifact, DirectorySink, ExportFormat, ExportJob, ExportOptions, ExportPipeline, FileSink,
    MemorySink, PageOrientation, Rasterizer, SoftwareRasterizer, Surface,
};
pub use model::{
    Column, ContentDescriptor, ContentTag, ImageItem, Row, Scene, Table, TableCell, TableRow,
};
pub use render::{
    ContentRenderer, ExportAffordances, JsonFormat, MenuItem, RenderOptions, RenderedBlock,
    RenderedContent,
};

use std::path::{Path, PathBuf};

/// Load descriptors from JSON text.
///
/// Accepts one descriptor, an array, or an object of named descriptors.
///
/// # Example
///
/// ```
/// let blocks = vizblock::parse_descriptors(
///     r#"{"sales": {"type": "bar-chart", "data": []}, "notes": {"type": "text", "data": "hi"}}"#,
/// ).unwrap();
/// assert_eq!(blocks.len(), 2);
/// ```
pub fn parse_descriptors(json: &str) -> Result<Vec<(Option<String>, ContentDescriptor)>> {
    model::descriptor::parse_collection(json)
}

/// Load descriptors from a JSON file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<(Option<String>, ContentDescriptor)>> {
    let text = std::fs::read_to_string(path)?;
    parse_descriptors(&text)
}

/// Render a descriptor with default options.
pub fn render(descriptor: &ContentDescriptor) -> RenderedContent {
    ContentRenderer::default().render(descriptor)
}

/// Render a descriptor and return its text view.
///
/// # Example
///
/// ```
/// use vizblock::ContentDescriptor;
///
/// let text = vizblock::render_text(&ContentDescriptor::text("# Hello"));
/// assert_eq!(text, "# Hello");
/// ```
pub fn render_text(descriptor: &ContentDescriptor) -> String {
    render::to_text(&render(descriptor).scene())
}

/// Render a descriptor and return its scene as JSON.
pub fn render_json(descriptor: &ContentDescriptor, format: JsonFormat) -> Result<String> {
    render::to_json(&render(descriptor).scene(), format)
}

/// Render a descriptor and export it into a directory.
///
/// # Example
///
/// ```no_run
/// use vizblock::{ContentDescriptor, ExportFormat};
///
/// let descriptor = ContentDescriptor::from_json(
///     r#"{"type": "pie-chart", "title": "Share",
///         "data": [{"name": "A", "value": 3}, {"name": "B", "value": 1}]}"#,
/// )?;
/// let path = vizblock::export_to_dir(&descriptor, ExportFormat::Pdf, "out")?;
/// # Ok::<(), vizblock::Error>(())
/// ```
pub fn export_to_dir<P: Into<PathBuf>>(
    descriptor: &ContentDescriptor,
    format: ExportFormat,
    dir: P,
) -> Result<PathBuf> {
    ExportPipeline::to_directory(dir).export(format, &render(descriptor))
}

//! Export pipeline: rendered blocks to PNG, PDF and CSV files.
//!
//! Image and PDF exports rasterize a [`Surface`] captured from the rendered
//! block. CSV exports read the table rows straight from the descriptor and
//! never rasterize.

mod csv;
mod pdf;
mod png;
mod raster;
mod sink;

pub use self::csv::write_csv;
pub use pdf::{build_pdf, page_size, PX_TO_PT};
pub use png::encode_png;
pub use raster::{Rasterizer, SoftwareRasterizer, Surface, MAX_DIMENSION};
pub use sink::{DirectorySink, FileSink, MemorySink};

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{Column, ContentDescriptor, Row};
use crate::render::{ExportAffordances, RenderOptions, RenderedContent};

/// Characters that cannot appear in a file name on common platforms.
static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1F]"#).unwrap());

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned = UNSAFE_FILE_CHARS.replace_all(name.trim(), "_");
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned.into_owned()
    }
}

/// Export target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Single-page PDF
    Pdf,
    /// PNG image
    Image,
    /// Comma-separated values
    Csv,
}

impl ExportFormat {
    /// All formats, in menu order.
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Csv, ExportFormat::Image];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Image => "png",
            ExportFormat::Csv => "csv",
        }
    }

    /// MIME type of the artifact.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Image => "image/png",
            ExportFormat::Csv => "text/csv",
        }
    }

    /// Label of the export menu entry.
    pub fn menu_label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "Export as PDF",
            ExportFormat::Image => "Export as Image",
            ExportFormat::Csv => "Export as CSV",
        }
    }

    /// Check if the format goes through rasterization.
    pub fn is_raster(&self) -> bool {
        !matches!(self, ExportFormat::Csv)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Image => "image",
            ExportFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "png" | "image" => Ok(ExportFormat::Image),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// PDF page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrientation {
    /// Long edge horizontal
    #[default]
    Landscape,
    /// Long edge vertical
    Portrait,
}

/// Options for producing artifacts.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Device pixels per logical pixel when rasterizing
    pub scale: f32,

    /// PDF page orientation
    pub orientation: PageOrientation,

    /// Write a PDF info dictionary (title, producer, creation date)
    pub include_metadata: bool,
}

impl ExportOptions {
    /// Create export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raster scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the PDF orientation.
    pub fn with_orientation(mut self, orientation: PageOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Enable or disable PDF metadata.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            orientation: PageOrientation::Landscape,
            include_metadata: true,
        }
    }
}

/// What an export reads.
#[derive(Debug, Clone)]
pub enum ExportPayload {
    /// A captured surface, for PNG and PDF
    Surface(Surface),
    /// Table rows, for CSV
    Rows {
        /// Row records
        data: Vec<Row>,
        /// Column order
        columns: Vec<Column>,
    },
}

/// One export invocation.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Target format
    pub format: ExportFormat,
    /// Title the file is named after
    pub source_title: String,
    /// Captured input
    pub payload: ExportPayload,
}

impl ExportJob {
    /// Prepare an export of `surface`, taken from content described by
    /// `descriptor`.
    ///
    /// Fails with [`Error::ExportUnavailable`] when the descriptor's tag
    /// does not offer `format`.
    pub fn new(
        format: ExportFormat,
        surface: Surface,
        descriptor: &ContentDescriptor,
        default_name: &str,
    ) -> Result<Self> {
        let unavailable = || Error::ExportUnavailable {
            format: format.to_string(),
            tag: descriptor.tag_name().to_string(),
        };

        if !ExportAffordances::for_tag(descriptor.tag()).allows(format) {
            return Err(unavailable());
        }

        let payload = match format {
            ExportFormat::Csv => match descriptor {
                ContentDescriptor::Table(spec) => ExportPayload::Rows {
                    data: spec.data.clone(),
                    columns: spec.columns.clone(),
                },
                _ => return Err(unavailable()),
            },
            ExportFormat::Pdf | ExportFormat::Image => ExportPayload::Surface(surface),
        };

        let source_title = descriptor
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| default_name.to_string());

        Ok(Self {
            format,
            source_title,
            payload,
        })
    }

    /// Prepare an export of rendered content as it looks now.
    pub fn from_content(
        format: ExportFormat,
        content: &RenderedContent,
        options: &RenderOptions,
    ) -> Result<Self> {
        let surface = Surface::capture(content, options);
        Self::new(format, surface, content.descriptor(), &options.default_export_name)
    }

    /// File name of the artifact, e.g. `"Sales Report.pdf"`.
    pub fn file_name(&self) -> String {
        sanitize_file_name(&format!("{}.{}", self.source_title, self.format.extension()))
    }
}

/// Give every job a distinct file name.
///
/// The first job keeps its name; later jobs with the same name (ignoring
/// case) get `" (2)"`, `" (3)"`, ... appended to their title.
pub fn dedupe_file_names(jobs: &mut [ExportJob]) {
    let mut taken = HashSet::new();
    for job in jobs.iter_mut() {
        if taken.insert(job.file_name().to_lowercase()) {
            continue;
        }
        let base = job.source_title.clone();
        let mut n = 2;
        loop {
            job.source_title = format!("{} ({})", base, n);
            if taken.insert(job.file_name().to_lowercase()) {
                break;
            }
            n += 1;
        }
        log::debug!("Renamed export of '{}' to {}", base, job.file_name());
    }
}

/// An encoded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name to save under
    pub file_name: String,
    /// Format of the bytes
    pub format: ExportFormat,
    /// Encoded bytes
    pub bytes: Vec<u8>,
}

/// Turns rendered content into saved artifacts.
#[derive(Clone)]
pub struct ExportPipeline {
    render_options: RenderOptions,
    options: ExportOptions,
    rasterizer: Arc<dyn Rasterizer>,
    sink: Arc<dyn FileSink>,
}

impl ExportPipeline {
    /// Create a pipeline saving into `sink`.
    pub fn new(sink: Arc<dyn FileSink>) -> Self {
        Self {
            render_options: RenderOptions::default(),
            options: ExportOptions::default(),
            rasterizer: Arc::new(SoftwareRasterizer::new()),
            sink,
        }
    }

    /// Create a pipeline saving into a directory.
    pub fn to_directory(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(DirectorySink::new(dir)))
    }

    /// Use these render options for surface capture and default names.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Use these export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a different rasterizer.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Export options in use.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Prepare a job for `content`.
    pub fn prepare(&self, format: ExportFormat, content: &RenderedContent) -> Result<ExportJob> {
        ExportJob::from_content(format, content, &self.render_options)
    }

    /// Encode a job without saving it.
    pub fn encode(&self, job: &ExportJob) -> Result<Artifact> {
        let bytes = match (&job.payload, job.format) {
            (ExportPayload::Rows { data, columns }, ExportFormat::Csv) => write_csv(data, columns)?,
            (ExportPayload::Surface(surface), ExportFormat::Image) => {
                encode_png(&self.rasterizer.rasterize(surface, self.options.scale)?)?
            }
            (ExportPayload::Surface(surface), ExportFormat::Pdf) => {
                let bitmap = self.rasterizer.rasterize(surface, self.options.scale)?;
                // The rasterizer may draw below the requested scale.
                let options = ExportOptions {
                    scale: bitmap.width() as f32 / surface.width().max(1) as f32,
                    ..self.options.clone()
                };
                build_pdf(&bitmap, &job.source_title, &options)?
            }
            (_, format) => {
                return Err(Error::Other(format!(
                    "Export job payload does not match format {}",
                    format
                )))
            }
        };

        Ok(Artifact {
            file_name: job.file_name(),
            format: job.format,
            bytes,
        })
    }

    /// Encode and save a job.
    pub fn run(&self, job: &ExportJob) -> Result<PathBuf> {
        let artifact = self.encode(job)?;
        let path = self.sink.save(&artifact.file_name, &artifact.bytes)?;
        log::info!("Exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());
        Ok(path)
    }

    /// Export `content` to `format` and save it.
    pub fn export(&self, format: ExportFormat, content: &RenderedContent) -> Result<PathBuf> {
        let job = self.prepare(format, content)?;
        self.run(&job)
    }

    /// Export as a menu action: failures are logged and produce nothing.
    pub fn export_or_log(
        &self,
        format: ExportFormat,
        content: &RenderedContent,
    ) -> Option<PathBuf> {
        match self.export(format, content) {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("Export failed: {}", e);
                None
            }
        }
    }

    /// Run many jobs in parallel. Results are in job order.
    ///
    /// Jobs that would share a file name are renamed first, see
    /// [`dedupe_file_names`].
    pub fn export_batch(&self, jobs: &[ExportJob]) -> Vec<Result<PathBuf>> {
        let mut jobs = jobs.to_vec();
        dedupe_file_names(&mut jobs);
        jobs.par_iter().map(|job| self.run(job)).collect()
    }

    /// Run a job on the blocking thread pool.
    #[cfg(feature = "async")]
    pub async fn export_async(&self, job: ExportJob) -> Result<PathBuf> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.run(&job))
            .await
            .map_err(|e| Error::Other(format!("Export task failed: {}", e)))?
    }
}

impl fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("render_options", &self.render_options)
            .field("options", &self.options)
            .finish()
    }
}

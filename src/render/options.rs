//! Rendering options and configuration.

use std::path::PathBuf;

/// Number of images shown side by side in the carousel strip.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Options for rendering content blocks.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Logical width of a rendered block in pixels
    pub surface_width: u32,

    /// Logical height of line and bar charts in pixels
    pub chart_height: u32,

    /// Logical height of pie charts in pixels
    pub pie_height: u32,

    /// Logical height of one table row in pixels
    pub table_row_height: u32,

    /// Logical height of one rich text line in pixels
    pub text_line_height: u32,

    /// Padding around the block content in pixels
    pub padding: u32,

    /// Number of images visible in the carousel strip
    pub window_size: usize,

    /// File stem for exports of untitled content
    pub default_export_name: String,

    /// File name for downloaded images without alt text
    pub default_download_name: String,

    /// Directory that downloaded images are saved to
    pub download_dir: PathBuf,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logical surface width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.surface_width = width.max(1);
        self
    }

    /// Set the cartesian chart height.
    pub fn with_chart_height(mut self, height: u32) -> Self {
        self.chart_height = height.max(1);
        self
    }

    /// Set the pie chart height.
    pub fn with_pie_height(mut self, height: u32) -> Self {
        self.pie_height = height.max(1);
        self
    }

    /// Set the content padding.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the carousel window size.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size.max(1);
        self
    }

    /// Set the export file stem for untitled content.
    pub fn with_default_export_name(mut self, name: impl Into<String>) -> Self {
        self.default_export_name = name.into();
        self
    }

    /// Set the download file name for images without alt text.
    pub fn with_default_download_name(mut self, name: impl Into<String>) -> Self {
        self.default_download_name = name.into();
        self
    }

    /// Set the download directory.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            surface_width: 800,
            chart_height: 400,
            pie_height: 450,
            table_row_height: 40,
            text_line_height: 24,
            padding: 24,
            window_size: DEFAULT_WINDOW_SIZE,
            default_export_name: "export".to_string(),
            default_download_name: "image".to_string(),
            download_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_width(1024)
            .with_window_size(0)
            .with_default_export_name("report");

        assert_eq!(options.surface_width, 1024);
        assert_eq!(options.window_size, 1);
        assert_eq!(options.default_export_name, "report");
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.window_size, 3);
        assert_eq!(options.default_export_name, "export");
        assert_eq!(options.default_download_name, "image");
    }
}

//! Content renderer: dispatch a descriptor to its adapter.

use std::sync::Arc;

use crate::carousel::{default_fetcher, DownloadManager, KeyboardHub, MediaCarousel, RemoteFetch};
use crate::export::{DirectorySink, ExportFormat, FileSink};
use crate::model::{
    CartesianChart, ChartKind, ContentDescriptor, ContentTag, RadialChart, RichText, Scene, Table,
};

use super::{ChartAdapter, MarkdownAdapter, RenderOptions, TableAdapter};

/// Single entry point for rendering content blocks.
pub struct ContentRenderer {
    options: RenderOptions,
    markdown: MarkdownAdapter,
    table: TableAdapter,
    chart: ChartAdapter,
    keyboard: KeyboardHub,
    fetcher: Arc<dyn RemoteFetch>,
    sink: Arc<dyn FileSink>,
}

impl ContentRenderer {
    /// Create a renderer.
    ///
    /// Carousels listen on the global keyboard hub, fetch with the default
    /// fetcher and save downloads into `options.download_dir`.
    pub fn new(options: RenderOptions) -> Self {
        let sink = Arc::new(DirectorySink::new(options.download_dir.clone()));
        Self {
            options,
            markdown: MarkdownAdapter::new(),
            table: TableAdapter::new(),
            chart: ChartAdapter::new(),
            keyboard: KeyboardHub::global().clone(),
            fetcher: default_fetcher(),
            sink,
        }
    }

    /// Use a different keyboard hub for carousels.
    pub fn with_keyboard(mut self, keyboard: KeyboardHub) -> Self {
        self.keyboard = keyboard;
        self
    }

    /// Use a different fetcher for image downloads.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn RemoteFetch>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Use a different save target for image downloads.
    pub fn with_download_sink(mut self, sink: Arc<dyn FileSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Render options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a descriptor. Never fails: unknown or malformed content is
    /// rendered as markdown.
    pub fn render(&self, descriptor: &ContentDescriptor) -> RenderedContent {
        let block = match descriptor {
            ContentDescriptor::Text { data, .. } => {
                RenderedBlock::RichText(self.markdown.render(data))
            }
            ContentDescriptor::Table(spec) => RenderedBlock::Table(self.table.render(
                &spec.data,
                &spec.columns,
                spec.title.as_deref(),
            )),
            ContentDescriptor::LineChart(spec) => {
                RenderedBlock::Cartesian(self.chart.render_cartesian(
                    ChartKind::Line,
                    &spec.data,
                    &spec.x_key,
                    &spec.y_key,
                    &spec.title,
                ))
            }
            ContentDescriptor::BarChart(spec) => {
                RenderedBlock::Cartesian(self.chart.render_cartesian(
                    ChartKind::Bar,
                    &spec.data,
                    &spec.x_key,
                    &spec.y_key,
                    &spec.title,
                ))
            }
            ContentDescriptor::PieChart(spec) => RenderedBlock::Radial(self.chart.render_radial(
                &spec.data,
                &spec.data_key,
                &spec.name_key,
                &spec.title,
            )),
            ContentDescriptor::Images(spec) => {
                let downloads = DownloadManager::new(
                    Arc::clone(&self.fetcher),
                    Arc::clone(&self.sink),
                    self.options.default_download_name.clone(),
                );
                let carousel = MediaCarousel::mount(
                    spec.data.clone(),
                    spec.title.clone(),
                    &self.keyboard,
                    downloads,
                )
                .with_window_size(self.options.window_size);
                RenderedBlock::Gallery(carousel)
            }
            ContentDescriptor::Fallback { tag, data, .. } => {
                log::debug!("Rendering '{}' content as markdown", tag);
                RenderedBlock::RichText(self.markdown.render(data))
            }
        };

        RenderedContent {
            descriptor: descriptor.clone(),
            block,
        }
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// The visual produced by an adapter.
#[derive(Debug)]
pub enum RenderedBlock {
    /// Markdown content
    RichText(RichText),
    /// Table
    Table(Table),
    /// Line or bar chart
    Cartesian(CartesianChart),
    /// Pie chart
    Radial(RadialChart),
    /// Mounted image carousel
    Gallery(MediaCarousel),
}

impl RenderedBlock {
    /// Detached visual snapshot of the block.
    pub fn scene(&self) -> Scene {
        match self {
            RenderedBlock::RichText(text) => Scene::RichText(text.clone()),
            RenderedBlock::Table(table) => Scene::Table(table.clone()),
            RenderedBlock::Cartesian(chart) => Scene::Cartesian(chart.clone()),
            RenderedBlock::Radial(chart) => Scene::Radial(chart.clone()),
            RenderedBlock::Gallery(carousel) => Scene::Gallery(carousel.view()),
        }
    }

    /// The carousel, if this block is one.
    pub fn carousel(&self) -> Option<&MediaCarousel> {
        match self {
            RenderedBlock::Gallery(carousel) => Some(carousel),
            _ => None,
        }
    }

    /// The carousel, mutably, if this block is one.
    pub fn carousel_mut(&mut self) -> Option<&mut MediaCarousel> {
        match self {
            RenderedBlock::Gallery(carousel) => Some(carousel),
            _ => None,
        }
    }
}

/// A rendered descriptor.
#[derive(Debug)]
pub struct RenderedContent {
    descriptor: ContentDescriptor,
    block: RenderedBlock,
}

impl RenderedContent {
    /// The descriptor this was rendered from.
    pub fn descriptor(&self) -> &ContentDescriptor {
        &self.descriptor
    }

    /// The rendered block.
    pub fn block(&self) -> &RenderedBlock {
        &self.block
    }

    /// The rendered block, mutably.
    pub fn block_mut(&mut self) -> &mut RenderedBlock {
        &mut self.block
    }

    /// Visual snapshot of the block.
    pub fn scene(&self) -> Scene {
        self.block.scene()
    }

    /// Which exports to offer, derived from the descriptor's tag on every call.
    pub fn affordances(&self) -> ExportAffordances {
        ExportAffordances::for_tag(self.descriptor.tag())
    }

    /// Title of the content.
    pub fn title(&self) -> Option<&str> {
        self.descriptor.title()
    }
}

/// One entry of the export menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    /// Text shown to the user
    pub label: &'static str,
    /// Format the entry exports to
    pub format: ExportFormat,
}

/// Export options offered for a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportAffordances {
    /// PDF export offered
    pub pdf: bool,
    /// CSV export offered
    pub csv: bool,
    /// Image export offered
    pub image: bool,
}

impl ExportAffordances {
    /// Affordances for a tag. Only tables and charts export; only tables
    /// export to CSV.
    pub fn for_tag(tag: Option<ContentTag>) -> Self {
        match tag {
            Some(ContentTag::Table) => Self {
                pdf: true,
                csv: true,
                image: true,
            },
            Some(ContentTag::LineChart | ContentTag::PieChart | ContentTag::BarChart) => Self {
                pdf: true,
                csv: false,
                image: true,
            },
            Some(ContentTag::Text | ContentTag::Images) | None => Self::default(),
        }
    }

    /// Check if any export is offered.
    pub fn any(&self) -> bool {
        self.pdf || self.csv || self.image
    }

    /// Check if `format` is offered.
    pub fn allows(&self, format: ExportFormat) -> bool {
        match format {
            ExportFormat::Pdf => self.pdf,
            ExportFormat::Csv => self.csv,
            ExportFormat::Image => self.image,
        }
    }

    /// Menu entries in display order.
    pub fn menu(&self) -> Vec<MenuItem> {
        ExportFormat::ALL
            .into_iter()
            .filter(|format| self.allows(*format))
            .map(|format| MenuItem {
                label: format.menu_label(),
                format,
            })
            .collect()
    }
}

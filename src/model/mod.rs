//! Data model for content blocks.
//!
//! Descriptors are the tagged input payloads. The remaining types are the
//! intermediate representation that adapters produce and that the text,
//! JSON and raster renderers consume.

mod chart;
pub mod descriptor;
mod gallery;
mod paragraph;
mod rich_text;
mod scene;
mod table;

pub use chart::{
    Axis, CartesianChart, ChartKind, Color, DataPoint, LegendEntry, RadialChart, Slice,
};
pub use descriptor::{
    CartesianSpec, Column, ContentDescriptor, ContentTag, GallerySpec, ImageItem, RadialSpec,
    Row, TableSpec,
};
pub use gallery::{Dot, GallerySlot, GalleryView, Lightbox};
pub use paragraph::{
    Alignment, InlineContent, ListInfo, ListStyle, Paragraph, ParagraphStyle, TextRun, TextStyle,
};
pub use rich_text::{RichText, TextBlock};
pub use scene::Scene;
pub use table::{Table, TableCell, TableRow};

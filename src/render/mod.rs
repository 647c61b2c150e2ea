//! Rendering: adapters, the dispatching renderer, and text/JSON views.

mod chart;
mod json;
pub mod markdown;
mod options;
mod renderer;
mod table;
mod text;

pub use chart::{nice_axis, palette_color, ChartAdapter, LINE_STROKE, PALETTE, TICK_COUNT};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_rich_text, MarkdownAdapter};
pub use options::{RenderOptions, DEFAULT_WINDOW_SIZE};
pub use renderer::{ContentRenderer, ExportAffordances, MenuItem, RenderedBlock, RenderedContent};
pub use table::{effective_columns, TableAdapter};
pub use text::to_text;

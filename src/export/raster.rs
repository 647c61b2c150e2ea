//! Surface capture and rasterization.
//!
//! A [`Surface`] is a detached snapshot of a rendered block plus its
//! logical size. Rasterizers draw surfaces into RGBA bitmaps at a given
//! pixel density. The software rasterizer draws geometry only: text is
//! shown as greeked bars.

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::model::{
    Alignment, CartesianChart, ChartKind, Color, GalleryView, LegendEntry, Paragraph, RadialChart,
    RichText, Scene, Table, TextBlock,
};
use crate::render::{RenderOptions, RenderedContent};

/// Largest bitmap edge, in device pixels.
pub const MAX_DIMENSION: u32 = 16_384;

const CHAR_WIDTH: f32 = 8.0;
const TEXT_BAR: f32 = 10.0;
const LEGEND_HEIGHT: f32 = 36.0;
const GALLERY_GAP: f32 = 16.0;
const DOT_ROW: f32 = 24.0;

const INK: Color = Color::rgb(0x33, 0x33, 0x33);
const MUTED: Color = Color::rgb(0x99, 0x99, 0x99);
const GRID: Color = Color::rgb(0xCC, 0xCC, 0xCC);
const RULE: Color = Color::rgb(0xE0, 0xE0, 0xE0);
const HEADER_FILL: Color = Color::rgb(0xF5, 0xF5, 0xF5);
const FRAME_FILL: Color = Color::rgb(0xF8, 0xF9, 0xFA);
const ACCENT: Color = Color::rgb(0x19, 0x76, 0xD2);

/// An immutable capture of a rendered block.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    scene: Scene,
    width: u32,
    height: u32,
    metrics: Metrics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Metrics {
    padding: f32,
    line_height: f32,
    row_height: f32,
}

impl Surface {
    /// Capture a rendered block as it looks now.
    pub fn capture(content: &RenderedContent, options: &RenderOptions) -> Self {
        Self::from_scene(content.scene(), options)
    }

    /// Lay out a scene at the configured width.
    pub fn from_scene(scene: Scene, options: &RenderOptions) -> Self {
        let metrics = Metrics {
            padding: options.padding as f32,
            line_height: options.text_line_height.max(1) as f32,
            row_height: options.table_row_height.max(1) as f32,
        };
        let width = options.surface_width.max(1);
        let content_width = (width as f32 - 2.0 * metrics.padding).max(1.0);

        let title = if scene.title().is_some() {
            metrics.line_height * 2.0
        } else {
            0.0
        };

        let body = match &scene {
            Scene::RichText(text) => {
                rich_text_lines(text, content_width) as f32 * metrics.line_height
            }
            Scene::Table(table) => (table.row_count() + 1) as f32 * metrics.row_height,
            Scene::Cartesian(_) => options.chart_height as f32,
            Scene::Radial(_) => options.pie_height as f32,
            Scene::Gallery(view) => {
                let (_, slot_h) = gallery_slot(view, content_width);
                slot_h + GALLERY_GAP + DOT_ROW
            }
        };

        let height = (title + body + 2.0 * metrics.padding).ceil().max(1.0) as u32;

        Self {
            scene,
            width,
            height,
            metrics,
        }
    }

    /// The captured scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Logical width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Turns a surface into a bitmap.
pub trait Rasterizer: Send + Sync {
    /// Draw `surface` with `scale` device pixels per logical pixel.
    fn rasterize(&self, surface: &Surface, scale: f32) -> Result<RgbaImage>;
}

/// CPU rasterizer drawing directly into an [`RgbaImage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareRasterizer;

impl SoftwareRasterizer {
    /// Create a software rasterizer.
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(&self, surface: &Surface, scale: f32) -> Result<RgbaImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::Raster(format!("invalid scale factor {}", scale)));
        }
        let scale = fit_scale(surface, scale);
        let width = (surface.width as f32 * scale).round().clamp(1.0, MAX_DIMENSION as f32);
        let height = (surface.height as f32 * scale).round().clamp(1.0, MAX_DIMENSION as f32);

        let mut canvas = Canvas {
            image: RgbaImage::from_pixel(width as u32, height as u32, Rgba([255, 255, 255, 255])),
            scale,
        };

        let m = surface.metrics;
        let x = m.padding;
        let mut y = m.padding;
        let content_width = (surface.width as f32 - 2.0 * m.padding).max(1.0);
        let bottom = surface.height as f32 - m.padding;

        if let Some(title) = surface.scene.title() {
            let chars = title.chars().count();
            let bar = (chars as f32 * CHAR_WIDTH * 1.25).min(content_width);
            canvas.fill_rect(x + (content_width - bar) / 2.0, y + 4.0, bar, TEXT_BAR * 1.4, INK);
            y += m.line_height * 2.0;
        }

        let area = Area {
            x,
            y,
            width: content_width,
            height: bottom - y,
        };
        match &surface.scene {
            Scene::RichText(text) => draw_rich_text(&mut canvas, text, x, y, content_width, m),
            Scene::Table(table) => draw_table(&mut canvas, table, x, y, content_width, m),
            Scene::Cartesian(chart) => draw_cartesian(&mut canvas, chart, area),
            Scene::Radial(chart) => draw_radial(&mut canvas, chart, area),
            Scene::Gallery(view) => draw_gallery(&mut canvas, view, area, surface),
        }

        Ok(canvas.image)
    }
}

/// Largest scale not above `requested` that keeps both bitmap edges
/// within [`MAX_DIMENSION`].
fn fit_scale(surface: &Surface, requested: f32) -> f32 {
    let longest = surface.width.max(surface.height).max(1) as f32;
    let cap = MAX_DIMENSION as f32 / longest;
    if requested > cap {
        log::warn!(
            "Surface {}x{} at scale {} exceeds {}px, drawing at scale {}",
            surface.width,
            surface.height,
            requested,
            MAX_DIMENSION,
            cap
        );
        cap
    } else {
        requested
    }
}

fn lines_for(chars: usize, content_width: f32) -> usize {
    let per_line = (content_width / CHAR_WIDTH).floor().max(1.0) as usize;
    chars.div_ceil(per_line).max(1)
}

fn rich_text_lines(text: &RichText, content_width: f32) -> usize {
    let lines: usize = text
        .blocks
        .iter()
        .map(|block| match block {
            TextBlock::Paragraph(p) if p.is_heading() => 2,
            TextBlock::Paragraph(p) => {
                let width = (content_width - paragraph_indent(p)).max(1.0);
                let lines = lines_for(p.plain_text().chars().count(), width);
                if p.is_list_item() {
                    lines
                } else {
                    lines + 1
                }
            }
            TextBlock::CodeBlock { code, .. } => code.lines().count().max(1) + 1,
            TextBlock::Image { .. } => 8,
            TextBlock::HorizontalRule => 1,
        })
        .sum();
    lines.max(1)
}

fn paragraph_indent(p: &Paragraph) -> f32 {
    p.style.quote_depth as f32 * 16.0
        + p.style.list_info.as_ref().map_or(0.0, |l| 16.0 + l.level as f32 * 16.0)
}

fn gallery_slot(view: &GalleryView, content_width: f32) -> (f32, f32) {
    let count = view.window.len().max(1) as f32;
    let slot_w = ((content_width - GALLERY_GAP * (count - 1.0)) / count).max(1.0);
    (slot_w, slot_w * 9.0 / 16.0)
}

/// Draw `chars` characters of body text as bars, wrapping at `width`.
/// Returns the y below the last line.
fn greek(canvas: &mut Canvas, x: f32, mut y: f32, chars: usize, width: f32, line: f32) -> f32 {
    let per_line = (width / CHAR_WIDTH).floor().max(1.0) as usize;
    let mut remaining = chars;
    while remaining > 0 {
        let take = remaining.min(per_line);
        let bar_y = y + (line - TEXT_BAR) / 2.0;
        canvas.fill_rect(x, bar_y, take as f32 * CHAR_WIDTH, TEXT_BAR, INK);
        remaining -= take;
        y += line;
    }
    y
}

fn draw_rich_text(
    canvas: &mut Canvas,
    text: &RichText,
    x: f32,
    mut y: f32,
    width: f32,
    m: Metrics,
) {
    for block in &text.blocks {
        match block {
            TextBlock::Paragraph(p) => {
                let indent = paragraph_indent(p);
                if p.style.quote_depth > 0 {
                    canvas.fill_rect(x, y, 3.0, m.line_height, GRID);
                }
                if p.is_list_item() {
                    canvas.fill_circle(x + indent - 8.0, y + m.line_height / 2.0, 2.5, INK);
                }
                let chars = p.plain_text().chars().count();
                if p.is_heading() {
                    let bar = (chars as f32 * CHAR_WIDTH * 1.4).min(width - indent);
                    canvas.fill_rect(x + indent, y + m.line_height / 2.0, bar, TEXT_BAR * 1.6, INK);
                    y += m.line_height * 2.0;
                } else {
                    let wrap = (width - indent).max(1.0);
                    y = greek(canvas, x + indent, y, chars, wrap, m.line_height);
                    if !p.is_list_item() {
                        y += m.line_height;
                    }
                }
            }
            TextBlock::CodeBlock { code, .. } => {
                let lines = code.lines().count().max(1);
                canvas.fill_rect(x, y, width, lines as f32 * m.line_height, HEADER_FILL);
                for (i, line) in code.lines().enumerate() {
                    let len = (line.chars().count() as f32 * CHAR_WIDTH).min(width - 16.0);
                    let line_y = y + i as f32 * m.line_height + (m.line_height - TEXT_BAR) / 2.0;
                    canvas.fill_rect(x + 8.0, line_y, len, TEXT_BAR, MUTED);
                }
                y += (lines + 1) as f32 * m.line_height;
            }
            TextBlock::Image { .. } => {
                let h = m.line_height * 7.0;
                canvas.fill_rect(x, y, h * 16.0 / 9.0, h, FRAME_FILL);
                canvas.stroke_rect(x, y, h * 16.0 / 9.0, h, RULE);
                y += m.line_height * 8.0;
            }
            TextBlock::HorizontalRule => {
                canvas.fill_rect(x, y + m.line_height / 2.0, width, 1.0, RULE);
                y += m.line_height;
            }
        }
    }
}

fn draw_table(canvas: &mut Canvas, table: &Table, x: f32, y: f32, width: f32, m: Metrics) {
    let columns = table.column_count();
    let rows = table.row_count() + 1;
    let height = rows as f32 * m.row_height;

    canvas.fill_rect(x, y, width, m.row_height, HEADER_FILL);
    for r in 0..=rows {
        canvas.fill_rect(x, y + r as f32 * m.row_height, width, 1.0, RULE);
    }
    if columns == 0 {
        return;
    }

    let col_w = width / columns as f32;
    for c in 0..=columns {
        canvas.fill_rect(x + c as f32 * col_w, y, 1.0, height, RULE);
    }

    for (r, row) in std::iter::once(&table.header).chain(&table.rows).enumerate() {
        let color = if r == 0 { INK } else { MUTED };
        for (c, cell) in row.cells.iter().enumerate().take(columns) {
            let len = (cell.text.chars().count() as f32 * CHAR_WIDTH).min(col_w - 16.0).max(0.0);
            let cell_x = match cell.alignment {
                Alignment::Right => x + (c + 1) as f32 * col_w - 8.0 - len,
                Alignment::Center => x + c as f32 * col_w + (col_w - len) / 2.0,
                Alignment::Left => x + c as f32 * col_w + 8.0,
            };
            let cell_y = y + r as f32 * m.row_height + (m.row_height - TEXT_BAR) / 2.0;
            canvas.fill_rect(cell_x, cell_y, len, TEXT_BAR, color);
        }
    }
}

/// Region of the surface a block body is drawn into, in logical pixels.
#[derive(Debug, Clone, Copy)]
struct Area {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

fn draw_cartesian(canvas: &mut Canvas, chart: &CartesianChart, area: Area) {
    let Area {
        x,
        y,
        width,
        height,
    } = area;
    let left = x + 40.0;
    let top = y + 20.0;
    let plot_w = (width - 70.0).max(1.0);
    let plot_h = (height - 60.0 - LEGEND_HEIGHT / 2.0).max(1.0);
    let bottom = top + plot_h;
    let value_y = |value: f64| bottom - chart.y_axis.fraction(value) as f32 * plot_h;

    for tick in &chart.y_axis.ticks {
        let ty = value_y(*tick);
        canvas.dashed_hline(left, ty, plot_w, GRID);
        canvas.fill_rect(x, ty - TEXT_BAR / 2.0, 24.0, TEXT_BAR, MUTED);
    }
    canvas.fill_rect(left, top, 1.0, plot_h, MUTED);
    canvas.fill_rect(left, bottom, plot_w, 1.0, MUTED);

    let n = chart.points.len();
    if n > 0 {
        let slot = plot_w / n as f32;
        let baseline = value_y(0.0);

        for (i, point) in chart.points.iter().enumerate() {
            let label = (point.label.chars().count() as f32 * CHAR_WIDTH * 0.8)
                .min(slot - 4.0)
                .max(0.0);
            let label_x = left + (i as f32 + 0.5) * slot - label / 2.0;
            canvas.fill_rect(label_x, bottom + 8.0, label, TEXT_BAR * 0.8, MUTED);
        }

        match chart.kind {
            ChartKind::Bar => {
                let bar_w = (slot * 0.8).min(60.0);
                for (i, point) in chart.points.iter().enumerate() {
                    let Some(value) = point.value else { continue };
                    let vy = value_y(value);
                    let bx = left + i as f32 * slot + (slot - bar_w) / 2.0;
                    let bar_h = (vy - baseline).abs();
                    canvas.fill_rect(bx, vy.min(baseline), bar_w, bar_h, point.color);
                }
            }
            ChartKind::Line => {
                let mut previous: Option<(f32, f32)> = None;
                for (i, point) in chart.points.iter().enumerate() {
                    let Some(value) = point.value else {
                        previous = None;
                        continue;
                    };
                    let current = (left + (i as f32 + 0.5) * slot, value_y(value));
                    if let Some((px, py)) = previous {
                        canvas.line(px, py, current.0, current.1, 2.0, point.color);
                    }
                    canvas.fill_circle(current.0, current.1, 3.0, point.color);
                    previous = Some(current);
                }
            }
        }
    }

    draw_legend(canvas, &chart.legend, x, y + height - LEGEND_HEIGHT / 2.0, width);
}

fn draw_legend(canvas: &mut Canvas, entries: &[LegendEntry], x: f32, y: f32, width: f32) {
    let label_len = |entry: &LegendEntry| entry.label.chars().count() as f32 * CHAR_WIDTH * 0.8;
    let total: f32 = entries.iter().map(|e| 30.0 + label_len(e)).sum();
    let mut cursor = x + ((width - total) / 2.0).max(0.0);
    for entry in entries {
        canvas.fill_rect(cursor, y - 5.0, 10.0, 10.0, entry.color);
        let len = label_len(entry);
        canvas.fill_rect(cursor + 14.0, y - TEXT_BAR * 0.4, len, TEXT_BAR * 0.8, MUTED);
        cursor += 30.0 + len;
    }
}

fn draw_radial(canvas: &mut Canvas, chart: &RadialChart, area: Area) {
    let Area {
        x,
        y,
        width,
        height,
    } = area;
    let area_h = (height - LEGEND_HEIGHT).max(1.0);
    let cx = x + width / 2.0;
    let cy = y + area_h / 2.0;
    let radius = 0.8 * width.min(area_h) / 2.0;

    if chart.total > 0.0 {
        canvas.fill_pie(cx, cy, radius, chart);
    } else {
        canvas.stroke_circle(cx, cy, radius, GRID);
    }

    draw_legend(canvas, &chart.legend, x, y + height - LEGEND_HEIGHT / 2.0, width);
}

fn draw_gallery(canvas: &mut Canvas, view: &GalleryView, area: Area, surface: &Surface) {
    let Area { x, y, width, .. } = area;
    let (slot_w, slot_h) = gallery_slot(view, width);

    for (i, _) in view.window.iter().enumerate() {
        let sx = x + i as f32 * (slot_w + GALLERY_GAP);
        canvas.fill_rect(sx, y, slot_w, slot_h, FRAME_FILL);
        canvas.stroke_rect(sx, y, slot_w, slot_h, RULE);
    }

    if view.show_arrows {
        let mid = y + slot_h / 2.0;
        canvas.fill_triangle([(x + 8.0, mid), (x + 24.0, mid - 12.0), (x + 24.0, mid + 12.0)], INK);
        let right = x + width;
        canvas.fill_triangle(
            [(right - 8.0, mid), (right - 24.0, mid - 12.0), (right - 24.0, mid + 12.0)],
            INK,
        );
    }

    let dots_y = y + slot_h + GALLERY_GAP + DOT_ROW / 2.0;
    draw_dots(canvas, view, x + width / 2.0, dots_y);

    if view.lightbox.is_some() {
        canvas.shade(0.6);
        let total_w = surface.width as f32;
        let total_h = surface.height as f32;
        let box_w = (total_w * 0.8).min((total_h - DOT_ROW * 2.0) * 16.0 / 9.0).max(1.0);
        let box_h = box_w * 9.0 / 16.0;
        let bx = (total_w - box_w) / 2.0;
        let by = ((total_h - box_h - DOT_ROW) / 2.0).max(0.0);
        canvas.fill_rect(bx, by, box_w, box_h, FRAME_FILL);
        canvas.stroke_rect(bx, by, box_w, box_h, Color::WHITE);
        draw_dots(canvas, view, total_w / 2.0, by + box_h + DOT_ROW / 2.0);
    }
}

fn draw_dots(canvas: &mut Canvas, view: &GalleryView, center_x: f32, y: f32) {
    let spacing = 16.0;
    let start = center_x - (view.dots.len().saturating_sub(1)) as f32 * spacing / 2.0;
    for (i, dot) in view.dots.iter().enumerate() {
        let color = if dot.active { ACCENT } else { GRID };
        canvas.fill_circle(start + i as f32 * spacing, y, 4.0, color);
    }
}

/// Drawing target in logical coordinates.
struct Canvas {
    image: RgbaImage,
    scale: f32,
}

impl Canvas {
    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, Rgba([color.r, color.g, color.b, 255]));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = (x * self.scale).round() as i64;
        let y0 = (y * self.scale).round() as i64;
        let x1 = ((x + w) * self.scale).round().max(x0 as f32 + 1.0) as i64;
        let y1 = ((y + h) * self.scale).round().max(y0 as f32 + 1.0) as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, color);
            }
        }
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.fill_rect(x, y, w, 1.0, color);
        self.fill_rect(x, y + h - 1.0, w, 1.0, color);
        self.fill_rect(x, y, 1.0, h, color);
        self.fill_rect(x + w - 1.0, y, 1.0, h, color);
    }

    fn dashed_hline(&mut self, x: f32, y: f32, w: f32, color: Color) {
        let mut cursor = 0.0;
        while cursor < w {
            self.fill_rect(x + cursor, y, 3.0_f32.min(w - cursor), 1.0, color);
            cursor += 6.0;
        }
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = (length * self.scale).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let cx = x0 + (x1 - x0) * t;
            let cy = y0 + (y1 - y0) * t;
            self.fill_rect(cx - width / 2.0, cy - width / 2.0, width, width, color);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let (dcx, dcy, dr) = (cx * self.scale, cy * self.scale, r * self.scale);
        for py in (dcy - dr).floor() as i64..=(dcy + dr).ceil() as i64 {
            for px in (dcx - dr).floor() as i64..=(dcx + dr).ceil() as i64 {
                let dx = px as f32 + 0.5 - dcx;
                let dy = py as f32 + 0.5 - dcy;
                if dx * dx + dy * dy <= dr * dr {
                    self.put(px, py, color);
                }
            }
        }
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let (dcx, dcy, dr) = (cx * self.scale, cy * self.scale, r * self.scale);
        let inner = (dr - self.scale).max(0.0);
        for py in (dcy - dr).floor() as i64..=(dcy + dr).ceil() as i64 {
            for px in (dcx - dr).floor() as i64..=(dcx + dr).ceil() as i64 {
                let dx = px as f32 + 0.5 - dcx;
                let dy = py as f32 + 0.5 - dcy;
                let d2 = dx * dx + dy * dy;
                if d2 <= dr * dr && d2 >= inner * inner {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Angles run counter-clockwise from 3 o'clock.
    fn fill_pie(&mut self, cx: f32, cy: f32, r: f32, chart: &RadialChart) {
        let (dcx, dcy, dr) = (
            (cx * self.scale) as f64,
            (cy * self.scale) as f64,
            (r * self.scale) as f64,
        );
        for py in (dcy - dr).floor() as i64..=(dcy + dr).ceil() as i64 {
            for px in (dcx - dr).floor() as i64..=(dcx + dr).ceil() as i64 {
                let dx = px as f64 + 0.5 - dcx;
                let dy = dcy - (py as f64 + 0.5);
                if dx * dx + dy * dy > dr * dr {
                    continue;
                }
                let mut angle = dy.atan2(dx).to_degrees();
                if angle < 0.0 {
                    angle += 360.0;
                }
                let slice = chart
                    .slices
                    .iter()
                    .find(|s| s.contains_angle(angle))
                    .or_else(|| chart.slices.iter().rev().find(|s| s.sweep > 0.0));
                if let Some(slice) = slice {
                    self.put(px, py, slice.color);
                }
            }
        }
    }

    fn fill_triangle(&mut self, points: [(f32, f32); 3], color: Color) {
        let pts = points.map(|(x, y)| (x * self.scale, y * self.scale));
        let min_x = pts.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).floor() as i64;
        let max_x = pts.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
        let min_y = pts.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor() as i64;
        let max_y = pts.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
        let edge = |a: (f32, f32), b: (f32, f32), p: (f32, f32)| {
            (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
        };
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let p = (px as f32 + 0.5, py as f32 + 0.5);
                let e0 = edge(pts[0], pts[1], p);
                let e1 = edge(pts[1], pts[2], p);
                let e2 = edge(pts[2], pts[0], p);
                let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0)
                    || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
                if inside {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Darken everything drawn so far, as a modal backdrop does.
    fn shade(&mut self, alpha: f32) {
        let keep = (1.0 - alpha).clamp(0.0, 1.0);
        for pixel in self.image.pixels_mut() {
            for channel in pixel.0.iter_mut().take(3) {
                *channel = (*channel as f32 * keep).round() as u8;
            }
        }
    }
}

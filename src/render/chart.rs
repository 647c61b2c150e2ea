//! Chart adapter: descriptor data to chart geometry.
//!
//! The adapter decides what a charting library would draw: point values,
//! axis domain and ticks, pie slice angles, colors and legend. Drawing
//! itself is left to the rasterizer.

use crate::model::descriptor::{scalar_to_f64, scalar_to_string};
use crate::model::{
    Axis, CartesianChart, ChartKind, Color, DataPoint, LegendEntry, RadialChart, Row, Slice,
};

/// Fill colors for bars and pie slices, assigned by index modulo length.
pub const PALETTE: [Color; 5] = [
    Color::rgb(0x00, 0x88, 0xFE),
    Color::rgb(0x00, 0xC4, 0x9F),
    Color::rgb(0xFF, 0xBB, 0x28),
    Color::rgb(0xFF, 0x80, 0x42),
    Color::rgb(0x88, 0x84, 0xD8),
];

/// Stroke color of line charts.
pub const LINE_STROKE: Color = Color::rgb(0x88, 0x84, 0xD8);

/// Number of ticks on the value axis.
pub const TICK_COUNT: usize = 5;

/// Palette color for the element at `index`.
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Chart adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartAdapter;

impl ChartAdapter {
    /// Create a new chart adapter.
    pub fn new() -> Self {
        Self
    }

    /// Build a line or bar chart.
    ///
    /// Rows whose `y_key` is missing or not numeric become gaps.
    pub fn render_cartesian(
        &self,
        kind: ChartKind,
        data: &[Row],
        x_key: &str,
        y_key: &str,
        title: &str,
    ) -> CartesianChart {
        let points: Vec<DataPoint> = data
            .iter()
            .enumerate()
            .map(|(index, record)| DataPoint {
                label: record.get(x_key).map(scalar_to_string).unwrap_or_default(),
                value: record.get(y_key).and_then(scalar_to_f64),
                color: match kind {
                    ChartKind::Line => LINE_STROKE,
                    ChartKind::Bar => palette_color(index),
                },
            })
            .collect();

        let y_axis = nice_axis(points.iter().filter_map(|p| p.value), TICK_COUNT);

        let legend = vec![LegendEntry {
            label: y_key.to_string(),
            color: match kind {
                ChartKind::Line => LINE_STROKE,
                ChartKind::Bar => palette_color(0),
            },
        }];

        CartesianChart {
            kind,
            title: title.to_string(),
            x_key: x_key.to_string(),
            y_key: y_key.to_string(),
            points,
            y_axis,
            legend,
        }
    }

    /// Build a pie chart.
    ///
    /// Slices start at 3 o'clock and run counter-clockwise. Negative or
    /// non-numeric values count as zero; a zero total gives every slice 0%.
    pub fn render_radial(
        &self,
        data: &[Row],
        data_key: &str,
        name_key: &str,
        title: &str,
    ) -> RadialChart {
        let values: Vec<(String, f64)> = data
            .iter()
            .map(|record| {
                let name = record.get(name_key).map(scalar_to_string).unwrap_or_default();
                let value = record
                    .get(data_key)
                    .and_then(scalar_to_f64)
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0)
                    .max(0.0);
                (name, value)
            })
            .collect();

        let total: f64 = values.iter().map(|(_, v)| v).sum();

        let mut start_angle = 0.0;
        let slices: Vec<Slice> = values
            .into_iter()
            .enumerate()
            .map(|(index, (name, value))| {
                let percent = if total > 0.0 { value / total } else { 0.0 };
                let sweep = percent * 360.0;
                let slice = Slice {
                    name,
                    value,
                    percent,
                    start_angle,
                    sweep,
                    color: palette_color(index),
                };
                start_angle += sweep;
                slice
            })
            .collect();

        let legend = slices
            .iter()
            .map(|s| LegendEntry {
                label: s.name.clone(),
                color: s.color,
            })
            .collect();

        RadialChart {
            title: title.to_string(),
            data_key: data_key.to_string(),
            name_key: name_key.to_string(),
            slices,
            total,
            legend,
        }
    }
}

/// Value axis covering zero and every value, with `ticks` evenly spaced
/// round tick values.
///
/// With no values, or only zeros, the domain is `[0, 1]`.
pub fn nice_axis(values: impl IntoIterator<Item = f64>, ticks: usize) -> Axis {
    let ticks = ticks.max(2);
    let (mut lower, mut upper) = (0.0_f64, 0.0_f64);
    for value in values.into_iter().filter(|v| v.is_finite()) {
        lower = lower.min(value);
        upper = upper.max(value);
    }
    if upper - lower <= f64::EPSILON {
        upper = lower + 1.0;
    }

    let intervals = (ticks - 1) as f64;
    let mut step = nice_step((upper - lower) / intervals);
    let mut min = (lower / step).floor() * step;
    // Bounded: each round moves to the next larger nice step.
    for _ in 0..32 {
        if min + step * intervals >= upper - f64::EPSILON * upper.abs().max(1.0) {
            break;
        }
        step = next_nice_step(step);
        min = (lower / step).floor() * step;
    }

    let tick_values: Vec<f64> = (0..ticks).map(|i| tidy(min + step * i as f64)).collect();
    Axis {
        min: tidy(min),
        max: tidy(min + step * intervals),
        ticks: tick_values,
    }
}

const NICE_FACTORS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = NICE_FACTORS
        .iter()
        .copied()
        .find(|f| *f >= normalized - 1e-9)
        .unwrap_or(10.0);
    factor * magnitude
}

fn next_nice_step(step: f64) -> f64 {
    let magnitude = 10f64.powf(step.log10().floor());
    let normalized = step / magnitude;
    let factor = NICE_FACTORS
        .iter()
        .copied()
        .find(|f| *f > normalized + 1e-9)
        .unwrap_or(10.0);
    factor * magnitude
}

fn tidy(value: f64) -> f64 {
    let rounded = (value * 1e9).round() / 1e9;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0).to_hex(), "#0088FE");
        assert_eq!(palette_color(4).to_hex(), "#8884D8");
        assert_eq!(palette_color(5), palette_color(0));
        assert_eq!(palette_color(7), palette_color(2));
    }

    #[test]
    fn test_bar_chart_geometry() {
        let data = rows(json!([
            {"month": "Jan", "sales": 120},
            {"month": "Feb", "sales": 200},
            {"month": "Mar", "sales": "n/a"}
        ]));
        let chart =
            ChartAdapter::new().render_cartesian(ChartKind::Bar, &data, "month", "sales", "Sales");

        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.points[0].label, "Jan");
        assert_eq!(chart.points[1].value, Some(200.0));
        assert_eq!(chart.points[2].value, None);
        assert_eq!(chart.points[1].color, PALETTE[1]);
        assert_eq!(chart.y_axis.ticks, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
        assert_eq!(chart.legend[0].label, "sales");
    }

    #[test]
    fn test_line_chart_uses_stroke() {
        let data = rows(json!([{"x": "a", "y": 1}, {"x": "b", "y": 2}]));
        let chart = ChartAdapter::new().render_cartesian(ChartKind::Line, &data, "x", "y", "");
        assert!(chart.points.iter().all(|p| p.color == LINE_STROKE));
    }

    #[test]
    fn test_empty_chart() {
        let chart = ChartAdapter::new().render_cartesian(ChartKind::Line, &[], "x", "y", "Empty");
        assert!(chart.is_empty());
        assert_eq!(chart.y_axis.min, 0.0);
        assert_eq!(chart.y_axis.max, 1.0);
        assert_eq!(chart.y_axis.ticks.len(), TICK_COUNT);

        let pie = ChartAdapter::new().render_radial(&[], "value", "name", "Empty");
        assert!(pie.is_empty());
        assert_eq!(pie.total, 0.0);
    }

    #[test]
    fn test_pie_slices() {
        let data = rows(json!([
            {"category": "A", "value": 35},
            {"category": "B", "value": 65}
        ]));
        let pie = ChartAdapter::new().render_radial(&data, "value", "category", "X");

        assert_eq!(pie.slices.len(), 2);
        let total: f64 = pie.slices.iter().map(|s| s.percent).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(pie.slices[0].label(), "A 35%");
        assert_eq!(pie.slices[1].start_angle, pie.slices[0].sweep);
        assert_ne!(pie.slices[0].color, pie.slices[1].color);
    }

    #[test]
    fn test_pie_zero_total() {
        let data = rows(json!([{"n": "A", "v": 0}, {"n": "B", "v": -3}]));
        let pie = ChartAdapter::new().render_radial(&data, "v", "n", "");
        assert!(pie.slices.iter().all(|s| s.percent == 0.0 && s.sweep == 0.0));
    }

    #[test]
    fn test_nice_axis_negative_values() {
        let axis = nice_axis([-30.0, 50.0], 5);
        assert!(axis.min <= -30.0);
        assert!(axis.max >= 50.0);
        assert_eq!(axis.ticks.len(), 5);
        assert_eq!(axis.ticks, vec![-50.0, -25.0, 0.0, 25.0, 50.0]);
    }

    #[test]
    fn test_nice_axis_small_values() {
        let axis = nice_axis([10.0, 35.0, 65.0], 5);
        assert_eq!(axis.ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0]);
    }
}

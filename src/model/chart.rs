//! Chart geometry types.
//!
//! These describe what a charting library draws: labelled points with
//! colors, axis domains and ticks, pie slice angles, legend entries. The
//! rasterizer turns them into pixels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// White.
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    /// Create a color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {}", hex)))
    }
}

/// Cartesian chart flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Monotone line through the points
    Line,
    /// One bar per point
    Bar,
}

/// A value axis with its domain and tick positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Lower bound of the domain
    pub min: f64,
    /// Upper bound of the domain
    pub max: f64,
    /// Tick values from `min` to `max`
    pub ticks: Vec<f64>,
}

impl Axis {
    /// Position of `value` within the domain, 0.0 at `min` and 1.0 at `max`.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// A legend entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Series or slice label
    pub label: String,
    /// Swatch color
    pub color: Color,
}

/// A point of a line or bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Category label on the x axis
    pub label: String,
    /// Value on the y axis; `None` leaves a gap
    pub value: Option<f64>,
    /// Fill color (bars) or stroke color (lines)
    pub color: Color,
}

/// Geometry of a line or bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianChart {
    /// Line or bar
    pub kind: ChartKind,
    /// Chart title
    pub title: String,
    /// Category key
    pub x_key: String,
    /// Value key
    pub y_key: String,
    /// Points in data order
    pub points: Vec<DataPoint>,
    /// Value axis
    pub y_axis: Axis,
    /// Legend entries
    pub legend: Vec<LegendEntry>,
}

impl CartesianChart {
    /// Check if the chart has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A pie slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Slice label
    pub name: String,
    /// Raw value
    pub value: f64,
    /// Share of the total, 0.0 to 1.0
    pub percent: f64,
    /// Start angle in degrees, counter-clockwise from 3 o'clock
    pub start_angle: f64,
    /// Angular extent in degrees
    pub sweep: f64,
    /// Fill color
    pub color: Color,
}

impl Slice {
    /// Label drawn next to the slice, e.g. `"Product A 35%"`.
    pub fn label(&self) -> String {
        format!("{} {:.0}%", self.name, self.percent * 100.0)
    }

    /// Check if an angle (degrees, counter-clockwise from 3 o'clock) falls in this slice.
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.start_angle + self.sweep
    }
}

/// Geometry of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialChart {
    /// Chart title
    pub title: String,
    /// Value key
    pub data_key: String,
    /// Label key
    pub name_key: String,
    /// Slices in data order
    pub slices: Vec<Slice>,
    /// Sum of all slice values
    pub total: f64,
    /// Legend entries
    pub legend: Vec<LegendEntry>,
}

impl RadialChart {
    /// Check if the chart has no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

//! Content descriptors: the tagged payloads handed to the renderer.
//!
//! Descriptors arrive as JSON from the analytics backend. Parsing never
//! fails on shape: an unrecognized tag, or a recognized tag missing one of
//! its required fields, becomes [`ContentDescriptor::Fallback`], which the
//! renderer treats as markdown.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::Result;

/// A record in a table or chart data set, keyed by column id.
///
/// Key order follows the source JSON.
pub type Row = Map<String, Value>;

/// The recognized content tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentTag {
    /// Markdown text
    #[serde(rename = "text")]
    Text,
    /// Tabular data
    #[serde(rename = "table")]
    Table,
    /// Line chart
    #[serde(rename = "line-chart")]
    LineChart,
    /// Pie chart
    #[serde(rename = "pie-chart")]
    PieChart,
    /// Bar chart
    #[serde(rename = "bar-chart")]
    BarChart,
    /// Image collection
    #[serde(rename = "images")]
    Images,
}

impl ContentTag {
    /// All recognized tags.
    pub const ALL: [ContentTag; 6] = [
        ContentTag::Text,
        ContentTag::Table,
        ContentTag::LineChart,
        ContentTag::PieChart,
        ContentTag::BarChart,
        ContentTag::Images,
    ];

    /// Wire name of the tag. Matching is case-sensitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTag::Text => "text",
            ContentTag::Table => "table",
            ContentTag::LineChart => "line-chart",
            ContentTag::PieChart => "pie-chart",
            ContentTag::BarChart => "bar-chart",
            ContentTag::Images => "images",
        }
    }

    /// Look up a tag by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column definition of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Key into each row
    pub id: String,

    /// Header label
    #[serde(default)]
    pub label: String,

    /// Whether values are numeric (right-aligned)
    #[serde(default)]
    pub numeric: bool,
}

impl Column {
    /// Create a text column.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            numeric: false,
        }
    }

    /// Create a numeric column.
    pub fn numeric(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            numeric: true,
            ..Self::new(id, label)
        }
    }

    /// Label to display, falling back to the id.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// One image of an image collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Remote location of the image
    pub url: String,

    /// Alternative text, also used as the download file name
    #[serde(default)]
    pub alt: String,

    /// Optional caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl ImageItem {
    /// Create an image item.
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
            caption: None,
        }
    }

    /// Set the caption and return self.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Fields of a `table` descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSpec {
    /// Row records
    pub data: Vec<Row>,
    /// Ordered column definitions
    pub columns: Vec<Column>,
    /// Optional title
    pub title: Option<String>,
}

/// Fields of a `line-chart` or `bar-chart` descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartesianSpec {
    /// Data points
    pub data: Vec<Row>,
    /// Key of the category (x) field
    pub x_key: String,
    /// Key of the value (y) field
    pub y_key: String,
    /// Chart title
    pub title: String,
}

/// Fields of a `pie-chart` descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadialSpec {
    /// Slices
    pub data: Vec<Row>,
    /// Key of the numeric field
    pub data_key: String,
    /// Key of the label field
    pub name_key: String,
    /// Chart title
    pub title: String,
}

/// Fields of an `images` descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GallerySpec {
    /// Images in display order
    pub data: Vec<ImageItem>,
    /// Optional title
    pub title: Option<String>,
}

/// A tagged content payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentDescriptor {
    /// Markdown text
    Text {
        /// Markdown source
        data: String,
        /// Optional title
        title: Option<String>,
    },
    /// Tabular data
    Table(TableSpec),
    /// Line chart
    LineChart(CartesianSpec),
    /// Bar chart
    BarChart(CartesianSpec),
    /// Pie chart
    PieChart(RadialSpec),
    /// Image collection
    Images(GallerySpec),
    /// Unrecognized tag or malformed payload, rendered as markdown
    Fallback {
        /// The tag as received (may be empty)
        tag: String,
        /// Whatever `data` was present, as markdown source
        data: String,
        /// Optional title
        title: Option<String>,
    },
}

impl ContentDescriptor {
    /// Create a text descriptor.
    pub fn text(markdown: impl Into<String>) -> Self {
        ContentDescriptor::Text {
            data: markdown.into(),
            title: None,
        }
    }

    /// Create a table descriptor.
    pub fn table(data: Vec<Row>, columns: Vec<Column>) -> Self {
        ContentDescriptor::Table(TableSpec {
            data,
            columns,
            title: None,
        })
    }

    /// Create an images descriptor.
    pub fn images(data: Vec<ImageItem>) -> Self {
        ContentDescriptor::Images(GallerySpec { data, title: None })
    }

    /// Parse a descriptor from JSON text.
    ///
    /// Fails only when the text is not JSON at all; every JSON value
    /// yields some descriptor.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Build a descriptor from a JSON value.
    pub fn from_value(value: &Value) -> Self {
        let tag_name = value
            .get("type")
            .or_else(|| value.get("tag"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let parsed = ContentTag::from_name(tag_name).and_then(|tag| parse_tagged(tag, value));

        match parsed {
            Some(descriptor) => descriptor,
            None => {
                log::debug!("Descriptor with tag '{}' falls back to markdown", tag_name);
                ContentDescriptor::Fallback {
                    tag: tag_name.to_string(),
                    data: data_as_markdown(value.get("data")),
                    title: string_field(value, "title"),
                }
            }
        }
    }

    /// The recognized tag, or `None` for fallback content.
    pub fn tag(&self) -> Option<ContentTag> {
        match self {
            ContentDescriptor::Text { .. } => Some(ContentTag::Text),
            ContentDescriptor::Table(_) => Some(ContentTag::Table),
            ContentDescriptor::LineChart(_) => Some(ContentTag::LineChart),
            ContentDescriptor::BarChart(_) => Some(ContentTag::BarChart),
            ContentDescriptor::PieChart(_) => Some(ContentTag::PieChart),
            ContentDescriptor::Images(_) => Some(ContentTag::Images),
            ContentDescriptor::Fallback { .. } => None,
        }
    }

    /// The tag as it appeared on the wire.
    pub fn tag_name(&self) -> &str {
        match self {
            ContentDescriptor::Fallback { tag, .. } => tag,
            other => other.tag().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    /// Title of the content, if any and non-empty.
    pub fn title(&self) -> Option<&str> {
        let title = match self {
            ContentDescriptor::Text { title, .. } | ContentDescriptor::Fallback { title, .. } => {
                title.as_deref()
            }
            ContentDescriptor::Table(spec) => spec.title.as_deref(),
            ContentDescriptor::LineChart(spec) | ContentDescriptor::BarChart(spec) => {
                Some(spec.title.as_str())
            }
            ContentDescriptor::PieChart(spec) => Some(spec.title.as_str()),
            ContentDescriptor::Images(spec) => spec.title.as_deref(),
        };
        title.filter(|t| !t.trim().is_empty())
    }

    /// Set the title and return self.
    pub fn with_title(mut self, new_title: impl Into<String>) -> Self {
        let new_title = new_title.into();
        match &mut self {
            ContentDescriptor::Text { title, .. } | ContentDescriptor::Fallback { title, .. } => {
                *title = Some(new_title)
            }
            ContentDescriptor::Table(spec) => spec.title = Some(new_title),
            ContentDescriptor::LineChart(spec) | ContentDescriptor::BarChart(spec) => {
                spec.title = new_title
            }
            ContentDescriptor::PieChart(spec) => spec.title = new_title,
            ContentDescriptor::Images(spec) => spec.title = Some(new_title),
        }
        self
    }

    /// Number of records, points, slices or images carried.
    pub fn item_count(&self) -> usize {
        match self {
            ContentDescriptor::Text { .. } | ContentDescriptor::Fallback { .. } => 0,
            ContentDescriptor::Table(spec) => spec.data.len(),
            ContentDescriptor::LineChart(spec) | ContentDescriptor::BarChart(spec) => {
                spec.data.len()
            }
            ContentDescriptor::PieChart(spec) => spec.data.len(),
            ContentDescriptor::Images(spec) => spec.data.len(),
        }
    }
}

fn parse_tagged(tag: ContentTag, value: &Value) -> Option<ContentDescriptor> {
    let title = string_field(value, "title");
    match tag {
        ContentTag::Text => {
            let data = value.get("data")?.as_str()?.to_string();
            Some(ContentDescriptor::Text { data, title })
        }
        ContentTag::Table => {
            let data = rows_field(value)?;
            let columns = match value.get("columns") {
                Some(raw) => serde_json::from_value(raw.clone()).ok()?,
                None => Vec::new(),
            };
            Some(ContentDescriptor::Table(TableSpec {
                data,
                columns,
                title,
            }))
        }
        ContentTag::LineChart | ContentTag::BarChart => {
            let spec = CartesianSpec {
                data: rows_field(value)?,
                x_key: string_field(value, "xKey")?,
                y_key: string_field(value, "yKey")?,
                title: title.unwrap_or_default(),
            };
            Some(if tag == ContentTag::LineChart {
                ContentDescriptor::LineChart(spec)
            } else {
                ContentDescriptor::BarChart(spec)
            })
        }
        ContentTag::PieChart => Some(ContentDescriptor::PieChart(RadialSpec {
            data: rows_field(value)?,
            data_key: string_field(value, "dataKey")?,
            name_key: string_field(value, "nameKey")?,
            title: title.unwrap_or_default(),
        })),
        ContentTag::Images => {
            let data = serde_json::from_value(value.get("data")?.clone()).ok()?;
            Some(ContentDescriptor::Images(GallerySpec { data, title }))
        }
    }
}

fn rows_field(value: &Value) -> Option<Vec<Row>> {
    value
        .get("data")?
        .as_array()?
        .iter()
        .map(|row| row.as_object().cloned())
        .collect()
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn data_as_markdown(data: Option<&Value>) -> String {
    match data {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Display form of a scalar cell value.
///
/// Strings are shown verbatim, null as empty, everything else in its JSON
/// form.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric form of a scalar value, accepting numeric strings.
pub fn scalar_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Load one or many descriptors from JSON text.
///
/// Accepts a single descriptor object, an array of descriptors, or an
/// object mapping names to descriptors. Entries keep their name when the
/// input is a named map.
pub fn parse_collection(json: &str) -> Result<Vec<(Option<String>, ContentDescriptor)>> {
    let value: Value = serde_json::from_str(json)?;

    let entries = match value {
        Value::Array(items) => items
            .iter()
            .map(|item| (None, ContentDescriptor::from_value(item)))
            .collect(),
        Value::Object(ref map) if !map.contains_key("type") && !map.contains_key("tag") => map
            .iter()
            .filter(|(_, item)| item.is_object())
            .map(|(name, item)| (Some(name.clone()), ContentDescriptor::from_value(item)))
            .collect(),
        other => vec![(None, ContentDescriptor::from_value(&other))],
    };

    Ok(entries)
}

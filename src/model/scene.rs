//! Serializable visual snapshot of a rendered block.

use super::{CartesianChart, GalleryView, RadialChart, RichText, Table};
use serde::{Deserialize, Serialize};

/// Everything needed to draw one rendered block.
///
/// A scene is a detached copy: later changes to the live block (for
/// example carousel navigation) do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scene", rename_all = "snake_case")]
pub enum Scene {
    /// Markdown content
    RichText(RichText),
    /// Data table
    Table(Table),
    /// Line or bar chart
    Cartesian(CartesianChart),
    /// Pie chart
    Radial(RadialChart),
    /// Image carousel
    Gallery(GalleryView),
}

impl Scene {
    /// Short name of the scene kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scene::RichText(_) => "rich_text",
            Scene::Table(_) => "table",
            Scene::Cartesian(_) => "cartesian",
            Scene::Radial(_) => "radial",
            Scene::Gallery(_) => "gallery",
        }
    }

    /// Title shown on the block, if any.
    pub fn title(&self) -> Option<&str> {
        match self {
            Scene::RichText(_) => None,
            Scene::Table(t) => t.caption.as_deref(),
            Scene::Cartesian(c) => Some(c.title.as_str()),
            Scene::Radial(c) => Some(c.title.as_str()),
            Scene::Gallery(g) => g.title.as_deref(),
        }
        .filter(|t| !t.is_empty())
    }
}

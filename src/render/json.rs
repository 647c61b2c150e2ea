//! JSON view of a rendered block.

use crate::error::{Error, Result};
use crate::model::Scene;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a scene to JSON.
pub fn to_json(scene: &Scene, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(scene),
        JsonFormat::Compact => serde_json::to_string(scene),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

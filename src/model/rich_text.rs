//! Rich text blocks produced from markdown.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// Rendered markdown content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    /// Content blocks in reading order
    pub blocks: Vec<TextBlock>,
}

impl RichText {
    /// Create empty rich text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Add a paragraph, skipping empty ones.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        if !paragraph.is_empty() {
            self.blocks.push(TextBlock::Paragraph(paragraph));
        }
    }

    /// Check if there is no content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the headings.
    pub fn headings(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            TextBlock::Paragraph(p) if p.is_heading() => Some(p),
            _ => None,
        })
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                TextBlock::Paragraph(p) => Some(p.plain_text()),
                TextBlock::CodeBlock { code, .. } => Some(code.trim_end().to_string()),
                TextBlock::Image { alt, .. } => Some(alt.clone()).filter(|a| !a.is_empty()),
                TextBlock::HorizontalRule => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A block-level element of rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextBlock {
    /// A paragraph, heading or list item
    Paragraph(Paragraph),

    /// A fenced or indented code block
    CodeBlock {
        /// Fence language, if given
        language: Option<String>,
        /// Code text
        code: String,
    },

    /// A standalone image
    Image {
        /// Image URL
        url: String,
        /// Alternative text
        alt: String,
    },

    /// A horizontal rule / separator
    HorizontalRule,
}

impl TextBlock {
    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, TextBlock::Paragraph(_))
    }

    /// Check if this block is a code block.
    pub fn is_code(&self) -> bool {
        matches!(self, TextBlock::CodeBlock { .. })
    }
}

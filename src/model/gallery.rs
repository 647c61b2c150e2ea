//! Snapshot of an image carousel as it should be drawn.

use super::ImageItem;
use serde::{Deserialize, Serialize};

/// What the carousel shows for its current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryView {
    /// Heading above the strip
    pub title: Option<String>,
    /// Total number of images
    pub image_count: usize,
    /// Index of the first image in the strip
    pub current_index: usize,
    /// Images visible in the inline strip, in display order
    pub window: Vec<GallerySlot>,
    /// Whether the previous/next arrows are drawn
    pub show_arrows: bool,
    /// One pagination dot per image
    pub dots: Vec<Dot>,
    /// The modal lightbox, when open
    pub lightbox: Option<Lightbox>,
    /// Whether a download is in flight
    pub downloading: bool,
}

impl GalleryView {
    /// Index of the active dot, if any.
    pub fn active_dot(&self) -> Option<usize> {
        self.dots.iter().find(|d| d.active).map(|d| d.index)
    }
}

/// One image in the inline strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GallerySlot {
    /// Index into the image list
    pub index: usize,
    /// The image
    pub image: ImageItem,
}

/// A pagination dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dot {
    /// Image index the dot selects
    pub index: usize,
    /// Whether this dot marks the current index
    pub active: bool,
}

/// The open lightbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lightbox {
    /// Index of the displayed image
    pub index: usize,
    /// The displayed image
    pub image: ImageItem,
}

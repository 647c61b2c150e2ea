//! Media carousel: a windowed image strip with a modal lightbox.
//!
//! The carousel owns its navigation state exclusively. Its view (visible
//! window, arrows, dots, lightbox) is derived from that state on demand and
//! never stored.

mod download;
mod keyboard;

pub use download::{
    default_fetcher, DownloadManager, DownloadOutcome, OfflineFetcher, RemoteFetch,
};
#[cfg(feature = "http")]
pub use download::HttpFetcher;
pub use keyboard::{Key, KeySubscription, KeyboardHub};

use std::future::Future;

use crate::model::{Dot, GallerySlot, GalleryView, ImageItem, Lightbox};
use crate::render::DEFAULT_WINDOW_SIZE;

/// Lightbox state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselState {
    /// Lightbox closed
    Browsing,
    /// Lightbox open on the given image
    Viewing(usize),
}

/// A mounted image carousel.
#[derive(Debug)]
pub struct MediaCarousel {
    images: Vec<ImageItem>,
    title: Option<String>,
    current_index: usize,
    selected_index: Option<usize>,
    window_size: usize,
    keys: KeySubscription,
    downloads: DownloadManager,
}

impl MediaCarousel {
    /// Mount a carousel over `images`.
    ///
    /// Starts browsing at index 0 and subscribes to `keyboard` for as long as
    /// the carousel lives.
    pub fn mount(
        images: Vec<ImageItem>,
        title: Option<String>,
        keyboard: &KeyboardHub,
        downloads: DownloadManager,
    ) -> Self {
        Self {
            images,
            title,
            current_index: 0,
            selected_index: None,
            window_size: DEFAULT_WINDOW_SIZE,
            keys: keyboard.subscribe(),
            downloads,
        }
    }

    /// Set how many images the inline strip shows.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size.max(1);
        self
    }

    /// Images in display order.
    pub fn images(&self) -> &[ImageItem] {
        &self.images
    }

    /// Carousel title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if there are no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Index of the first image in the strip.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Index shown in the lightbox, while open.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Current lightbox state.
    pub fn state(&self) -> CarouselState {
        match self.selected_index {
            Some(index) => CarouselState::Viewing(index),
            None => CarouselState::Browsing,
        }
    }

    /// Check if the lightbox is open.
    pub fn is_open(&self) -> bool {
        self.selected_index.is_some()
    }

    /// Advance by one, wrapping past the last image.
    pub fn next(&mut self) {
        let n = self.len();
        if n > 0 {
            self.set_current((self.current_index + 1) % n);
        }
    }

    /// Go back by one, wrapping before the first image.
    pub fn previous(&mut self) {
        let n = self.len();
        if n > 0 {
            self.set_current((self.current_index + n - 1) % n);
        }
    }

    /// Open the lightbox on image `index`. Out-of-range indices are ignored.
    pub fn open(&mut self, index: usize) {
        if index >= self.len() {
            log::debug!("Ignoring open({}) on a carousel of {}", index, self.len());
            return;
        }
        self.current_index = index;
        self.selected_index = Some(index);
    }

    /// Close the lightbox.
    pub fn close(&mut self) {
        self.selected_index = None;
    }

    /// Jump to image `index` without opening or closing the lightbox.
    pub fn select_dot(&mut self, index: usize) {
        if index < self.len() {
            self.set_current(index);
        }
    }

    /// Apply a key press. Keys only act while the lightbox is open.
    ///
    /// Returns whether the key changed anything.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Escape => self.close(),
            Key::Other => return false,
        }
        true
    }

    /// Apply every key delivered by the hub since the last pump.
    ///
    /// Returns how many keys had an effect.
    pub fn pump_keys(&mut self) -> usize {
        self.keys
            .drain()
            .into_iter()
            .filter(|key| self.handle_key(*key))
            .count()
    }

    /// Image indices visible in the strip, in display order.
    pub fn visible_indices(&self) -> Vec<usize> {
        let n = self.len();
        if n == 0 {
            return Vec::new();
        }
        (0..self.window_size.min(n))
            .map(|offset| (self.current_index + offset) % n)
            .collect()
    }

    /// Check if the previous/next arrows are shown.
    pub fn show_arrows(&self) -> bool {
        self.len() > self.window_size
    }

    /// Check if a download is in flight.
    pub fn is_downloading(&self) -> bool {
        self.downloads.is_downloading()
    }

    /// Download `item`. Single-flight per carousel; see [`DownloadManager::download`].
    pub fn download_image(
        &self,
        item: &ImageItem,
    ) -> impl Future<Output = DownloadOutcome> + Send + 'static {
        self.downloads.download(item)
    }

    /// Download the image shown in the lightbox, if open.
    pub fn download_selected(
        &self,
    ) -> Option<impl Future<Output = DownloadOutcome> + Send + 'static> {
        let index = self.selected_index?;
        self.images.get(index).map(|item| self.download_image(item))
    }

    /// Snapshot of what to draw.
    pub fn view(&self) -> GalleryView {
        let window = self
            .visible_indices()
            .into_iter()
            .map(|index| GallerySlot {
                index,
                image: self.images[index].clone(),
            })
            .collect();

        let dots = (0..self.len())
            .map(|index| Dot {
                index,
                active: index == self.current_index,
            })
            .collect();

        let lightbox = self.selected_index.and_then(|index| {
            self.images.get(index).map(|image| Lightbox {
                index,
                image: image.clone(),
            })
        });

        GalleryView {
            title: self.title.clone(),
            image_count: self.len(),
            current_index: self.current_index,
            window,
            show_arrows: self.show_arrows(),
            dots,
            lightbox,
            downloading: self.is_downloading(),
        }
    }

    fn set_current(&mut self, index: usize) {
        self.current_index = index;
        // The lightbox always shows the current image.
        if self.selected_index.is_some() {
            self.selected_index = Some(index);
        }
    }
}

//! Integration tests for the media carousel and image downloads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use vizblock::error::{Error, Result};
use vizblock::{
    CarouselState, ContentDescriptor, ContentRenderer, DownloadManager, DownloadOutcome, ImageItem,
    Key, KeyboardHub, MediaCarousel, MemorySink, RemoteFetch,
};

fn images(n: usize) -> Vec<ImageItem> {
    (0..n)
        .map(|i| ImageItem::new(format!("https://img.test/{}.png", i), format!("photo {}", i)))
        .collect()
}

fn carousel(n: usize, hub: &KeyboardHub) -> MediaCarousel {
    let downloads = DownloadManager::new(
        Arc::new(CountingFetch::default()),
        Arc::new(MemorySink::new()),
        "image",
    );
    MediaCarousel::mount(images(n), None, hub, downloads)
}

/// Fetcher that counts calls and can be held open until released.
#[derive(Default)]
struct CountingFetch {
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    fail: bool,
}

#[async_trait]
impl RemoteFetch for CountingFetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(url.as_bytes().to_vec())
    }
}

#[test]
fn test_next_cycles_back_to_start() {
    let hub = KeyboardHub::new();
    for n in 1..=7 {
        let mut c = carousel(n, &hub);
        c.select_dot(n / 2);
        let start = c.current_index();
        for _ in 0..n {
            c.next();
        }
        assert_eq!(c.current_index(), start, "n = {}", n);
    }
}

#[test]
fn test_previous_then_next_is_identity() {
    let hub = KeyboardHub::new();
    for n in 1..=6 {
        for start in 0..n {
            let mut c = carousel(n, &hub);
            c.select_dot(start);
            c.previous();
            c.next();
            assert_eq!(c.current_index(), start);
        }
    }
}

#[test]
fn test_dot_count_matches_images() {
    let hub = KeyboardHub::new();
    for n in 0..=6 {
        let view = carousel(n, &hub).view();
        assert_eq!(view.dots.len(), n);
        assert_eq!(view.image_count, n);
    }
}

#[test]
fn test_arrows_only_past_window() {
    let hub = KeyboardHub::new();
    for n in 0..=6 {
        assert_eq!(carousel(n, &hub).view().show_arrows, n > 3, "n = {}", n);
    }
}

#[test]
fn test_empty_carousel_is_inert() {
    let hub = KeyboardHub::new();
    let mut c = carousel(0, &hub);
    c.next();
    c.previous();
    c.open(0);
    assert_eq!(c.current_index(), 0);
    assert_eq!(c.state(), CarouselState::Browsing);
    assert!(c.visible_indices().is_empty());
}

#[test]
fn test_window_wraps() {
    let hub = KeyboardHub::new();
    let mut c = carousel(5, &hub);
    c.select_dot(4);
    assert_eq!(c.visible_indices(), vec![4, 0, 1]);

    let view = c.view();
    assert_eq!(view.window.len(), 3);
    assert_eq!(view.window[1].image.alt, "photo 0");
    assert_eq!(view.active_dot(), Some(4));
}

#[test]
fn test_lightbox_keyboard_scenario() {
    let hub = KeyboardHub::new();
    let mut c = carousel(5, &hub);

    c.open(3);
    assert_eq!(c.state(), CarouselState::Viewing(3));

    for _ in 0..3 {
        hub.dispatch(Key::ArrowRight);
    }
    assert_eq!(c.pump_keys(), 3);
    assert_eq!(c.current_index(), 1);
    assert_eq!(c.view().lightbox.map(|l| l.index), Some(1));

    hub.dispatch(Key::Escape);
    c.pump_keys();
    assert_eq!(c.state(), CarouselState::Browsing);
    assert_eq!(c.current_index(), 1);
    assert!(c.view().lightbox.is_none());
}

#[test]
fn test_keys_ignored_while_browsing() {
    let hub = KeyboardHub::new();
    let mut c = carousel(5, &hub);

    hub.dispatch(Key::ArrowRight);
    hub.dispatch(Key::from_name("Enter"));
    assert_eq!(c.pump_keys(), 0);
    assert_eq!(c.current_index(), 0);
}

#[test]
fn test_open_out_of_range_ignored() {
    let hub = KeyboardHub::new();
    let mut c = carousel(3, &hub);
    c.open(3);
    assert!(!c.is_open());
    assert_eq!(c.current_index(), 0);
}

#[test]
fn test_subscription_released_on_drop() {
    let hub = KeyboardHub::new();
    let renderer = ContentRenderer::default().with_keyboard(hub.clone());

    let content = renderer.render(&ContentDescriptor::images(images(4)));
    let other = renderer.render(&ContentDescriptor::images(images(2)));
    assert_eq!(hub.listener_count(), 2);

    drop(content);
    assert_eq!(hub.listener_count(), 1);
    drop(other);
    assert_eq!(hub.dispatch(Key::Escape), 0);
}

#[tokio::test]
async fn test_second_download_dispatches_no_fetch() {
    let gate = Arc::new(Notify::new());
    let fetch = Arc::new(CountingFetch {
        gate: Some(Arc::clone(&gate)),
        ..Default::default()
    });
    let sink = Arc::new(MemorySink::new());
    let manager = DownloadManager::new(fetch.clone(), sink.clone(), "image");
    let item = ImageItem::new("https://img.test/a.png", "Chart A");

    let first = tokio::spawn(manager.download(&item));
    // Wait for the first fetch to start.
    while fetch.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    assert!(manager.is_downloading());

    let second = manager.download(&item).await;
    assert_eq!(second, DownloadOutcome::Rejected);
    assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);

    gate.notify_one();
    let outcome = first.await.unwrap();
    assert!(outcome.is_saved());
    assert!(!manager.is_downloading());
    assert_eq!(sink.get("Chart A").unwrap(), b"https://img.test/a.png");
}

#[tokio::test]
async fn test_failed_download_releases_latch() {
    let fetch = Arc::new(CountingFetch {
        fail: true,
        ..Default::default()
    });
    let sink = Arc::new(MemorySink::new());
    let manager = DownloadManager::new(fetch.clone(), sink.clone(), "image");
    let item = ImageItem::new("https://img.test/b.png", "");

    assert_eq!(manager.download(&item).await, DownloadOutcome::Failed);
    assert!(!manager.is_downloading());
    assert!(sink.is_empty());

    // Retry is allowed and fetches again.
    assert_eq!(manager.download(&item).await, DownloadOutcome::Failed);
    assert_eq!(fetch.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_download_selected_uses_lightbox_image() {
    let hub = KeyboardHub::new();
    let sink = Arc::new(MemorySink::new());
    let downloads = DownloadManager::new(Arc::new(CountingFetch::default()), sink.clone(), "image");
    let mut c = MediaCarousel::mount(images(4), None, &hub, downloads);

    assert!(c.download_selected().is_none());

    c.open(2);
    c.next();
    let outcome = c.download_selected().unwrap().await;
    assert!(outcome.is_saved());
    assert_eq!(sink.get("photo 3").unwrap(), b"https://img.test/3.png");
}

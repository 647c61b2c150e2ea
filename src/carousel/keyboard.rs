//! Process-wide keyboard event hub.
//!
//! Hosts feed key presses into a [`KeyboardHub`]; every live
//! [`KeySubscription`] receives a copy over its own channel. Dropping the
//! subscription unregisters it, so a torn-down carousel never sees another
//! key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crossbeam_channel::{Receiver, Sender};
use once_cell::sync::Lazy;

/// A key press relevant to the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Previous image
    ArrowLeft,
    /// Next image
    ArrowRight,
    /// Close the lightbox
    Escape,
    /// Anything else
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"ArrowLeft"`, `"ArrowRight"`, `"Escape"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Default)]
struct Listeners {
    next_id: u64,
    senders: HashMap<u64, Sender<Key>>,
}

static GLOBAL: Lazy<KeyboardHub> = Lazy::new(KeyboardHub::new);

/// Fan-out point for key presses.
#[derive(Debug, Clone, Default)]
pub struct KeyboardHub {
    listeners: Arc<Mutex<Listeners>>,
}

impl KeyboardHub {
    /// Create an isolated hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide hub.
    pub fn global() -> &'static KeyboardHub {
        &GLOBAL
    }

    /// Register a listener. It stays registered until the subscription drops.
    pub fn subscribe(&self) -> KeySubscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut listeners = lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.senders.insert(id, sender);

        KeySubscription {
            id,
            receiver,
            hub: Arc::downgrade(&self.listeners),
        }
    }

    /// Deliver a key to every listener. Returns how many received it.
    pub fn dispatch(&self, key: Key) -> usize {
        let mut listeners = lock(&self.listeners);
        listeners
            .senders
            .retain(|_, sender| sender.send(key).is_ok());
        listeners.senders.len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).senders.len()
    }
}

fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A registered key listener.
#[derive(Debug)]
pub struct KeySubscription {
    id: u64,
    receiver: Receiver<Key>,
    hub: Weak<Mutex<Listeners>>,
}

impl KeySubscription {
    /// Keys received since the last drain, oldest first.
    pub fn drain(&self) -> Vec<Key> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.hub.upgrade() {
            lock(&listeners).senders.remove(&self.id);
        }
    }
}

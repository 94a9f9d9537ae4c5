use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chatbox_model::{Affordances, DisplaySurface, PlaceholderId, Sender};

/// An operation performed on a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    AppendMessage(String, Sender),
    AppendPlaceholder(PlaceholderId),
    UpdatePlaceholder(PlaceholderId, String),
    ScrollToBottom,
    Clear,
}

/// A rendered bubble, as a user would see it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bubble {
    pub sender: Sender,
    pub text: String,
}

#[derive(Default)]
struct SurfaceInner {
    events: Vec<SurfaceEvent>,
    bubbles: Vec<Bubble>,
    placeholders: HashMap<PlaceholderId, usize>,
    next_placeholder: u64,
}

/// A display surface that records every call and keeps a model of what
/// is currently on screen.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

impl RecordingSurface {
    #[inline]
    fn lock(&self) -> MutexGuard<'_, SurfaceInner> {
        self.inner.lock().expect("surface lock poisoned")
    }

    /// Returns all recorded calls in order.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().events.clone()
    }

    /// Returns the bubbles currently on screen.
    pub fn bubbles(&self) -> Vec<Bubble> {
        self.lock().bubbles.clone()
    }

    /// Returns the current content of the given placeholder.
    pub fn placeholder_text(&self, id: PlaceholderId) -> Option<String> {
        let inner = self.lock();
        let idx = *inner.placeholders.get(&id)?;
        inner.bubbles.get(idx).map(|b| b.text.clone())
    }

    /// Returns the content of the most recently created placeholder.
    pub fn last_placeholder_text(&self) -> Option<String> {
        let id = {
            let inner = self.lock();
            inner.placeholders.keys().max().copied()?
        };
        self.placeholder_text(id)
    }

    /// Counts scroll-to-bottom notifications.
    pub fn scroll_count(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::ScrollToBottom))
            .count()
    }
}

impl DisplaySurface for RecordingSurface {
    fn append_message(&mut self, text: &str, sender: Sender) {
        let mut inner = self.lock();
        inner
            .events
            .push(SurfaceEvent::AppendMessage(text.to_owned(), sender));
        inner.bubbles.push(Bubble {
            sender,
            text: text.to_owned(),
        });
    }

    fn append_placeholder(&mut self) -> PlaceholderId {
        let mut inner = self.lock();
        let id = PlaceholderId(inner.next_placeholder);
        inner.next_placeholder += 1;
        inner.events.push(SurfaceEvent::AppendPlaceholder(id));
        let idx = inner.bubbles.len();
        inner.bubbles.push(Bubble {
            sender: Sender::Bot,
            text: String::new(),
        });
        inner.placeholders.insert(id, idx);
        id
    }

    fn update_placeholder(&mut self, id: PlaceholderId, text: &str) {
        let mut inner = self.lock();
        inner
            .events
            .push(SurfaceEvent::UpdatePlaceholder(id, text.to_owned()));
        if let Some(idx) = inner.placeholders.get(&id).copied() {
            inner.bubbles[idx].text = text.to_owned();
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.lock().events.push(SurfaceEvent::ScrollToBottom);
    }

    fn clear(&mut self) {
        let mut inner = self.lock();
        inner.events.push(SurfaceEvent::Clear);
        inner.bubbles.clear();
        inner.placeholders.clear();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct AffordanceState {
    send_enabled: bool,
    stop_enabled: bool,
}

/// Affordances that just remember their latest state.
///
/// Send starts enabled and stop starts disabled, like a freshly loaded
/// page.
#[derive(Clone)]
pub struct RecordingAffordances {
    state: Arc<Mutex<AffordanceState>>,
}

impl Default for RecordingAffordances {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(AffordanceState {
                send_enabled: true,
                stop_enabled: false,
            })),
        }
    }
}

impl RecordingAffordances {
    /// Whether the send control is currently enabled.
    pub fn send_enabled(&self) -> bool {
        self.state.lock().expect("lock poisoned").send_enabled
    }

    /// Whether the stop control is currently enabled.
    pub fn stop_enabled(&self) -> bool {
        self.state.lock().expect("lock poisoned").stop_enabled
    }
}

impl Affordances for RecordingAffordances {
    fn set_send_enabled(&mut self, enabled: bool) {
        self.state.lock().expect("lock poisoned").send_enabled = enabled;
    }

    fn set_stop_enabled(&mut self, enabled: bool) {
        self.state.lock().expect("lock poisoned").stop_enabled = enabled;
    }
}

//! Character-by-character reveal of bot answers.

use std::future::pending;
use std::time::Duration;

use chatbox_model::{Affordances, DisplaySurface, PlaceholderId};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// The stage of a [`Presenter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresenterStage {
    /// No answer is being revealed.
    #[default]
    Idle,
    /// An answer is being revealed.
    Streaming,
}

struct Presentation {
    placeholder: PlaceholderId,
    text: String,
    /// Byte offset of the revealed prefix, always on a char boundary.
    revealed: usize,
    /// Armed lazily on the first wait, so a presentation can be started
    /// and ticked outside of a runtime.
    interval: Option<Interval>,
}

/// Streams answers to the display surface, one character per tick.
///
/// The presenter owns the display surface and the input affordances, so
/// nothing else can touch them while an answer is being revealed. At most
/// one presentation is active at a time.
///
/// A presentation ends either by completion, which hands the full text
/// back to the caller for persisting, or by cancellation, which leaves the
/// partial text on screen and persists nothing.
pub struct Presenter {
    surface: Box<dyn DisplaySurface>,
    affordances: Box<dyn Affordances>,
    tick_interval: Duration,
    active: Option<Presentation>,
}

impl Presenter {
    /// Creates an idle presenter.
    pub fn new<D, A>(surface: D, affordances: A, tick_interval: Duration) -> Self
    where
        D: DisplaySurface,
        A: Affordances,
    {
        Self::from_boxed(Box::new(surface), Box::new(affordances), tick_interval)
    }

    #[inline]
    pub(crate) fn from_boxed(
        surface: Box<dyn DisplaySurface>,
        affordances: Box<dyn Affordances>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            surface,
            affordances,
            tick_interval,
            active: None,
        }
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> PresenterStage {
        if self.active.is_some() {
            PresenterStage::Streaming
        } else {
            PresenterStage::Idle
        }
    }

    /// Returns `true` if an answer is being revealed.
    #[inline]
    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// Gives access to the display surface for rendering complete
    /// messages.
    ///
    /// Callers must not use this while streaming.
    #[inline]
    pub fn surface_mut(&mut self) -> &mut dyn DisplaySurface {
        debug_assert!(self.active.is_none(), "surface is busy");
        &mut *self.surface
    }

    /// Puts the affordances into their idle state.
    pub fn reset_affordances(&mut self) {
        self.affordances.set_send_enabled(true);
        self.affordances.set_stop_enabled(false);
    }

    /// Starts revealing `text`.
    ///
    /// If another presentation is still active it is cancelled first.
    pub fn start(&mut self, text: String) {
        if self.cancel() {
            warn!("a presentation was still active, cancelled it");
        }

        self.affordances.set_send_enabled(false);
        self.affordances.set_stop_enabled(true);
        let placeholder = self.surface.append_placeholder();
        self.surface.scroll_to_bottom();

        debug!("start presenting {} chars", text.chars().count());
        self.active = Some(Presentation {
            placeholder,
            text,
            revealed: 0,
            interval: None,
        });
    }

    /// Reveals the next character.
    ///
    /// Returns the full text once the last character has been revealed,
    /// at which point the presenter becomes idle again. Does nothing when
    /// idle.
    pub fn tick(&mut self) -> Option<String> {
        let presentation = self.active.as_mut()?;

        if let Some(ch) = presentation.text[presentation.revealed..].chars().next()
        {
            presentation.revealed += ch.len_utf8();
            self.surface.update_placeholder(
                presentation.placeholder,
                &presentation.text[..presentation.revealed],
            );
            self.surface.scroll_to_bottom();
        }

        if presentation.revealed < presentation.text.len() {
            return None;
        }

        let presentation = self.active.take()?;
        self.reset_affordances();
        debug!("presentation completed");
        Some(presentation.text)
    }

    /// Cancels the active presentation, if any.
    ///
    /// The revealed prefix stays on the surface. Returns `true` if a
    /// presentation was cancelled.
    pub fn cancel(&mut self) -> bool {
        let Some(presentation) = self.active.take() else {
            return false;
        };
        self.reset_affordances();
        debug!(
            "presentation cancelled after {} of {} bytes",
            presentation.revealed,
            presentation.text.len()
        );
        true
    }

    /// Waits until the next character is due.
    ///
    /// Never resolves while idle.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future before it resolves
    /// does not skip a tick.
    pub async fn next_tick(&mut self) {
        let Some(presentation) = self.active.as_mut() else {
            return pending().await;
        };
        let tick_interval = self.tick_interval;
        presentation
            .interval
            .get_or_insert_with(|| {
                let mut interval =
                    interval_at(Instant::now() + tick_interval, tick_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                interval
            })
            .tick()
            .await;
    }
}

#[cfg(test)]
mod tests {
    use chatbox_model::{Message, Sender};
    use chatbox_test_surface::{
        Bubble, MemoryStore, RecordingAffordances, RecordingSurface,
        SurfaceEvent,
    };

    use super::*;
    use crate::SessionStore;

    fn presenter() -> (Presenter, RecordingSurface, RecordingAffordances) {
        let surface = RecordingSurface::default();
        let affordances = RecordingAffordances::default();
        let presenter = Presenter::new(
            surface.clone(),
            affordances.clone(),
            Duration::from_millis(30),
        );
        (presenter, surface, affordances)
    }

    #[test]
    fn test_complete() {
        let (mut presenter, surface, affordances) = presenter();
        let mut history = SessionStore::open(MemoryStore::default(), "chat");

        presenter.start("OK".to_owned());
        assert_eq!(presenter.stage(), PresenterStage::Streaming);
        assert!(!affordances.send_enabled());
        assert!(affordances.stop_enabled());
        assert_eq!(surface.last_placeholder_text().as_deref(), Some(""));

        assert_eq!(presenter.tick(), None);
        assert_eq!(surface.last_placeholder_text().as_deref(), Some("O"));

        let completed = presenter.tick().unwrap();
        history.append(Message::bot(completed)).unwrap();
        assert_eq!(surface.last_placeholder_text().as_deref(), Some("OK"));
        assert_eq!(presenter.stage(), PresenterStage::Idle);
        assert!(affordances.send_enabled());
        assert!(!affordances.stop_enabled());
        assert_eq!(history.history(), [Message::bot("OK")]);

        // One scroll on start, one per character.
        assert_eq!(surface.scroll_count(), 3);
        assert_eq!(presenter.tick(), None);
    }

    #[test]
    fn test_cancel() {
        let (mut presenter, surface, affordances) = presenter();

        presenter.start("OK".to_owned());
        assert_eq!(presenter.tick(), None);
        assert!(presenter.cancel());

        assert_eq!(presenter.stage(), PresenterStage::Idle);
        assert!(affordances.send_enabled());
        assert!(!affordances.stop_enabled());
        assert_eq!(
            surface.bubbles(),
            [Bubble {
                sender: Sender::Bot,
                text: "O".to_owned()
            }]
        );

        // Nothing left to reveal or cancel.
        assert_eq!(presenter.tick(), None);
        assert!(!presenter.cancel());
        assert_eq!(surface.last_placeholder_text().as_deref(), Some("O"));
    }

    #[test]
    fn test_multibyte_characters() {
        let (mut presenter, surface, _) = presenter();

        presenter.start("héllo 👋".to_owned());
        let mut ticks = 1;
        let text = loop {
            if let Some(text) = presenter.tick() {
                break text;
            }
            ticks += 1;
        };
        assert_eq!(text, "héllo 👋");
        assert_eq!(ticks, 7);

        let updates: Vec<_> = surface
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::UpdatePlaceholder(_, text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(updates[1], "hé");
        assert_eq!(updates.last().map(String::as_str), Some("héllo 👋"));
    }

    #[test]
    fn test_empty_text_completes_on_first_tick() {
        let (mut presenter, surface, _) = presenter();

        presenter.start(String::new());
        assert_eq!(presenter.tick().as_deref(), Some(""));
        assert!(
            !surface
                .events()
                .iter()
                .any(|e| matches!(e, SurfaceEvent::UpdatePlaceholder(..)))
        );
    }

    #[test]
    fn test_restart_cancels_previous() {
        let (mut presenter, surface, _) = presenter();

        presenter.start("first".to_owned());
        presenter.tick();
        presenter.start("ab".to_owned());
        presenter.tick();
        assert_eq!(presenter.tick().as_deref(), Some("ab"));

        let texts: Vec<_> =
            surface.bubbles().into_iter().map(|b| b.text).collect();
        assert_eq!(texts, ["f", "ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_tick_follows_interval() {
        let (mut presenter, surface, _) = presenter();

        presenter.start("abc".to_owned());
        let started = Instant::now();
        let mut completed = None;
        while completed.is_none() {
            presenter.next_tick().await;
            completed = presenter.tick();
        }
        assert_eq!(completed.as_deref(), Some("abc"));
        assert_eq!(started.elapsed(), Duration::from_millis(90));
        assert_eq!(surface.last_placeholder_text().as_deref(), Some("abc"));
    }
}

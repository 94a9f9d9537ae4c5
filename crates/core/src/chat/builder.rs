use chatbox_model::{Affordances, DisplaySurface, DurableStore, Entry};

use super::Chat;
use crate::config::ChatConfig;

/// [`Chat`] builder.
pub struct ChatBuilder<S> {
    pub(crate) entries: Vec<Entry>,
    pub(crate) store: S,
    pub(crate) surface: Box<dyn DisplaySurface>,
    pub(crate) affordances: Box<dyn Affordances>,
    pub(crate) config: ChatConfig,
    pub(crate) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl<S: DurableStore> ChatBuilder<S> {
    /// Creates a new builder with the host's store, display surface and
    /// affordances.
    ///
    /// The knowledge base starts out empty, so every input gets the
    /// fallback answer until one is provided.
    #[inline]
    pub fn new<D, A>(store: S, surface: D, affordances: A) -> Self
    where
        D: DisplaySurface,
        A: Affordances,
    {
        Self {
            entries: vec![],
            store,
            surface: Box::new(surface),
            affordances: Box::new(affordances),
            config: ChatConfig::default(),
            on_idle: None,
        }
    }

    /// Sets the knowledge base, keeping the order of the entries.
    #[inline]
    pub fn with_knowledge_base<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        self.entries = entries.into_iter().collect();
        self
    }

    /// Sets the configuration.
    #[inline]
    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a callback to be invoked when the chat is idle, i.e. no
    /// answer is being revealed and no input is waiting.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the chat.
    ///
    /// The stored history is loaded right away and replayed to the display
    /// surface before any submitted input is handled.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[inline]
    pub fn build(self) -> Chat {
        Chat::spawn_from_builder(self)
    }
}

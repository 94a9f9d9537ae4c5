mod builder;
mod state;

use std::collections::VecDeque;

use chatbox_model::DurableStore;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::history::SessionStore;
use crate::matcher::Matcher;
use crate::presenter::Presenter;
pub use builder::ChatBuilder;
use state::{ChatState, Command, run_chat};

/// A running chat, which owns the matcher, the presenter and the history.
///
/// All work happens on one task spawned by [`ChatBuilder::build`]; this
/// handle only queues commands for it, so every method returns
/// immediately. Commands are handled in the order they were sent.
///
/// Inputs submitted while an answer is still being revealed are queued and
/// handled once the presenter becomes idle again, whether the answer
/// completes or is stopped.
///
/// The task quits once every handle has been dropped.
#[derive(Clone)]
pub struct Chat {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Chat {
    /// Submits a user input.
    ///
    /// The input is trimmed, and empty inputs are ignored.
    pub fn submit<S: Into<String>>(&self, input: S) {
        self.send(Command::Submit(input.into()));
    }

    /// Stops revealing the current answer, if any.
    ///
    /// The partially revealed answer stays visible but is not saved.
    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    /// Stops the current answer, erases the stored history and clears the
    /// display surface.
    pub fn clear(&self) {
        self.send(Command::Clear);
    }

    #[inline]
    fn send(&self, cmd: Command) {
        self.cmd_tx
            .send(cmd)
            .expect("chat task has been dropped too early");
    }
}

impl Chat {
    fn spawn_from_builder<S: DurableStore>(builder: ChatBuilder<S>) -> Self {
        let ChatBuilder {
            entries,
            store,
            surface,
            affordances,
            config,
            on_idle,
        } = builder;

        let state = ChatState {
            matcher: Matcher::new(entries, config.ladder.clone()),
            presenter: Presenter::from_boxed(
                surface,
                affordances,
                config.tick_interval,
            ),
            history: SessionStore::open(store, config.storage_key.clone()),
            fallback_answer: config.fallback_answer,
            pending_inputs: VecDeque::new(),
            on_idle,
        };

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_chat(state, cmd_rx).instrument(debug_span!("chat")));
        Self { cmd_tx }
    }
}

use std::collections::VecDeque;

use chatbox_model::{DurableStore, Message, Sender};
use tokio::select;
use tokio::sync::mpsc;

use crate::history::SessionStore;
use crate::matcher::Matcher;
use crate::presenter::Presenter;

#[derive(Debug)]
pub enum Command {
    Submit(String),
    Stop,
    Clear,
}

pub struct ChatState<S> {
    pub matcher: Matcher,
    pub presenter: Presenter,
    pub history: SessionStore<S>,
    pub fallback_answer: String,
    pub pending_inputs: VecDeque<String>,
    pub on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl<S: DurableStore> ChatState<S> {
    fn replay_history(&mut self) {
        let surface = self.presenter.surface_mut();
        for msg in self.history.history() {
            surface.append_message(&msg.text, msg.sender);
        }
        surface.scroll_to_bottom();
        debug!("replayed {} messages", self.history.history().len());
        self.presenter.reset_affordances();
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(input) => self.enqueue_user_input(input),
            Command::Stop => self.stop(),
            Command::Clear => self.clear(),
        }
    }

    fn enqueue_user_input(&mut self, input: String) {
        let input = input.trim();
        if input.is_empty() {
            trace!("ignored an empty input");
            return;
        }
        if self.presenter.is_streaming() {
            // The previous answer is still being revealed, handle this
            // input once it finishes.
            debug!("presenter is busy, input queued");
            self.pending_inputs.push_back(input.to_owned());
            return;
        }
        self.process_input_checked(input.to_owned());
    }

    fn process_next_input(&mut self) {
        if self.presenter.is_streaming() {
            return;
        }
        if let Some(input) = self.pending_inputs.pop_front() {
            self.process_input_checked(input);
        } else if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    /// Process the input string, assuming the presenter is idle.
    fn process_input_checked(&mut self, input: String) {
        let surface = self.presenter.surface_mut();
        surface.append_message(&input, Sender::User);
        surface.scroll_to_bottom();
        self.persist(Message::user(input.as_str()));

        let answer = match self.matcher.find(&input) {
            Some(m) => {
                debug!(
                    "answering with entry {} (score {:.3}, threshold {})",
                    m.index, m.score, m.threshold
                );
                m.answer().to_owned()
            }
            None => {
                debug!("no match, using the fallback answer");
                self.fallback_answer.clone()
            }
        };
        self.presenter.start(answer);
    }

    fn on_tick(&mut self) {
        let Some(answer) = self.presenter.tick() else {
            return;
        };
        self.persist(Message::bot(answer));
        self.process_next_input();
    }

    fn stop(&mut self) {
        if !self.presenter.cancel() {
            trace!("nothing to stop");
            return;
        }
        self.process_next_input();
    }

    fn clear(&mut self) {
        self.presenter.cancel();
        self.pending_inputs.clear();
        if let Err(err) = self.history.clear() {
            error!("failed to clear history: {err}");
        }
        self.presenter.surface_mut().clear();
        self.presenter.reset_affordances();
        debug!("conversation cleared");
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    fn persist(&mut self, message: Message) {
        // The conversation goes on even if it cannot be saved.
        if let Err(err) = self.history.append(message) {
            error!("failed to save message: {err}");
        }
    }
}

pub async fn run_chat<S: DurableStore>(
    mut state: ChatState<S>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    state.replay_history();

    loop {
        select! {
            biased;

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                trace!("received command: {cmd:?}");
                state.handle_command(cmd);
            }
            _ = state.presenter.next_tick(), if state.presenter.is_streaming() => {
                state.on_tick();
            }
        }
    }
    debug!("will terminate");
}

//! A display surface and affordances that render to the terminal.

use std::io::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard};

use chatbox_model::{Affordances, DisplaySurface, PlaceholderId, Sender};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";
const PROMPT: &str = "> ";

#[derive(Default)]
struct TerminalState {
    /// Whether the cursor is at the end of an unfinished bubble.
    line_open: bool,
    placeholder: Option<PlaceholderId>,
    /// Bytes of the current placeholder already written.
    printed: usize,
    next_placeholder: u64,
}

impl TerminalState {
    fn close_line(&mut self, out: &mut impl io::Write) {
        if self.line_open {
            writeln!(out).ok();
            self.line_open = false;
        }
    }
}

fn lock(state: &Mutex<TerminalState>) -> MutexGuard<'_, TerminalState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Creates a display surface and affordances sharing one terminal.
///
/// The surface writes bubbles to stdout. A placeholder can only grow, so
/// each update prints the newly revealed part. The affordances print the
/// input prompt whenever sending becomes possible.
pub fn terminal() -> (TerminalSurface, TerminalAffordances) {
    let state = Arc::new(Mutex::new(TerminalState::default()));
    (
        TerminalSurface {
            state: Arc::clone(&state),
        },
        TerminalAffordances { state },
    )
}

/// The terminal display surface. See [`terminal`].
pub struct TerminalSurface {
    state: Arc<Mutex<TerminalState>>,
}

impl DisplaySurface for TerminalSurface {
    fn append_message(&mut self, text: &str, sender: Sender) {
        let mut state = lock(&self.state);
        let mut out = io::stdout().lock();
        state.close_line(&mut out);
        let result = match sender {
            Sender::User => {
                writeln!(out, "{}🧑 {}", BAR_CHAR.bright_blue(), text.bold())
            }
            Sender::Bot => writeln!(
                out,
                "{}🤖 {}",
                BAR_CHAR.bright_cyan(),
                text.bright_white()
            ),
        };
        result.ok();
    }

    fn append_placeholder(&mut self) -> PlaceholderId {
        let mut state = lock(&self.state);
        let mut out = io::stdout().lock();
        state.close_line(&mut out);
        write!(out, "{}🤖 ", BAR_CHAR.bright_cyan()).ok();

        let id = PlaceholderId(state.next_placeholder);
        state.next_placeholder += 1;
        state.placeholder = Some(id);
        state.printed = 0;
        state.line_open = true;
        id
    }

    fn update_placeholder(&mut self, id: PlaceholderId, text: &str) {
        let mut state = lock(&self.state);
        if state.placeholder != Some(id) || !state.line_open {
            // Older bubbles have scrolled past, they cannot be redrawn.
            return;
        }
        let Some(delta) = text.get(state.printed..) else {
            warn!("placeholder text shrank, ignored the update");
            return;
        };
        write!(io::stdout().lock(), "{}", delta.bright_white()).ok();
        state.printed = text.len();
    }

    fn scroll_to_bottom(&mut self) {
        io::stdout().flush().ok();
    }

    fn clear(&mut self) {
        let mut state = lock(&self.state);
        // Clear the screen and move the cursor home.
        write!(io::stdout().lock(), "\x1b[2J\x1b[H").ok();
        state.line_open = false;
        state.placeholder = None;
        state.printed = 0;
    }
}

/// The terminal affordances. See [`terminal`].
pub struct TerminalAffordances {
    state: Arc<Mutex<TerminalState>>,
}

impl Affordances for TerminalAffordances {
    fn set_send_enabled(&mut self, enabled: bool) {
        if !enabled {
            return;
        }
        let mut state = lock(&self.state);
        let mut out = io::stdout().lock();
        state.close_line(&mut out);
        write!(out, "{PROMPT}").ok();
        out.flush().ok();
    }

    fn set_stop_enabled(&mut self, enabled: bool) {
        trace!("stop enabled: {enabled}");
    }
}

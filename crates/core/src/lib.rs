//! Core logic of the chat widget: answer matching, the typewriter-style
//! presentation of answers, and the durable conversation history.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod chat;
mod config;
mod error;
mod history;
pub mod matcher;
mod presenter;

pub use chat::{Chat, ChatBuilder};
pub use config::*;
pub use error::{Error, ErrorKind};
pub use history::SessionStore;
pub use matcher::{Match, Matcher, ThresholdLadder};
pub use presenter::{Presenter, PresenterStage};

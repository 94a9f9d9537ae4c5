//! Shared data model and host-facing interfaces for the chat widget.
//!
//! This crate establishes the protocol between the chat core and whatever
//! hosts it: the knowledge base records, the messages that make up a
//! conversation, and the traits a host implements to render messages,
//! toggle its input controls and persist data.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod entry;
mod error;
mod message;
mod store;
mod surface;

pub use entry::*;
pub use error::*;
pub use message::*;
pub use store::*;
pub use surface::*;

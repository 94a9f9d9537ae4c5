//! An out-of-the-box keyword chat for the terminal.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library, reusing the file-backed store and the knowledge base
//! loader in your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod file_store;
mod knowledge_base;
pub mod terminal;

pub use file_store::{FileStore, FileStoreError};
pub use knowledge_base::{
    KnowledgeBaseError, default_knowledge_base, load_knowledge_base,
    load_knowledge_base_or_default,
};

/// Re-exports of [`chatbox_core`] crate.
pub mod core {
    pub use chatbox_core::*;
}

/// Re-exports of [`chatbox_model`] crate.
pub mod model {
    pub use chatbox_model::*;
}

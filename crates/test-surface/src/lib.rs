//! Local fake hosts for testing purpose.
//!
//! Every fake here is a cheap handle around shared state, so a test can
//! hand one clone to the chat core and keep another to inspect what the
//! core did with it.

mod store;
mod surface;

pub use store::*;
pub use surface::*;

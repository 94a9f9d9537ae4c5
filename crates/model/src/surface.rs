use crate::message::Sender;

/// Identifies a placeholder bubble created by
/// [`DisplaySurface::append_placeholder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderId(pub u64);

/// The visual surface that renders the conversation.
///
/// The chat core only ever writes to the surface, it never reads back
/// what has been rendered.
pub trait DisplaySurface: Send + 'static {
    /// Renders a complete message immediately.
    fn append_message(&mut self, text: &str, sender: Sender);

    /// Appends an empty bot bubble whose content will be filled in later.
    fn append_placeholder(&mut self) -> PlaceholderId;

    /// Replaces the content of a placeholder with `text`.
    ///
    /// `text` is always the full content revealed so far, not a delta.
    fn update_placeholder(&mut self, id: PlaceholderId, text: &str);

    /// Scrolls the surface so that the latest message is visible.
    fn scroll_to_bottom(&mut self);

    /// Removes every rendered message.
    fn clear(&mut self);
}

/// The input controls next to the message box.
///
/// Both methods are idempotent toggles.
pub trait Affordances: Send + 'static {
    /// Enables or disables the "send" control.
    fn set_send_enabled(&mut self, enabled: bool);

    /// Enables or disables the "stop" control.
    fn set_stop_enabled(&mut self, enabled: bool);
}

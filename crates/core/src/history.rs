//! Durable conversation history.

use chatbox_model::{DurableStore, Message, StoreError as _};

use crate::error::Error;

/// Keeps the conversation history in a durable store.
///
/// The whole history is encoded as one JSON array under a single key, and
/// every append rewrites that value. The in-memory copy only changes once
/// a write has succeeded, so a failed append never loses or reorders the
/// messages stored before it.
///
/// If the stored value could not be read, the history reads as empty but
/// the next append reads the store again before writing, and fails rather
/// than overwrite messages it has never seen.
pub struct SessionStore<S> {
    store: S,
    key: String,
    history: Vec<Message>,
    /// Whether `history` reflects what is stored.
    synced: bool,
}

impl<S: DurableStore> SessionStore<S> {
    /// Opens the history stored under `key`, loading it into memory.
    pub fn open<K: Into<String>>(store: S, key: K) -> Self {
        let mut session_store = Self {
            store,
            key: key.into(),
            history: Vec::new(),
            synced: false,
        };
        session_store.load_all();
        session_store
    }

    /// Returns the history as currently known to be stored.
    #[inline]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Reads the full history back from the durable store.
    ///
    /// An absent or unreadable value is treated as an empty history.
    pub fn load_all(&mut self) -> Vec<Message> {
        match self.read_stored() {
            Ok(history) => {
                self.history = history;
                self.synced = true;
            }
            Err(err) => {
                warn!("failed to read history: {err}");
                self.history.clear();
                self.synced = false;
            }
        }
        trace!("loaded {} messages", self.history.len());
        self.history.clone()
    }

    /// Appends a message and writes the whole history back.
    pub fn append(&mut self, message: Message) -> Result<(), Error> {
        if !self.synced {
            let stored = self.read_stored().map_err(|err| {
                Error::persistence().with_reason(format!(
                    "not overwriting unreadable history: {}",
                    err.reason()
                ))
            })?;
            debug!("recovered {} stored messages", stored.len());
            self.history = stored;
            self.synced = true;
        }

        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.extend_from_slice(&self.history);
        history.push(message);

        let encoded = serde_json::to_string(&history)
            .map_err(|err| Error::persistence().with_reason(err.to_string()))?;
        self.store.set(&self.key, &encoded).map_err(|err| {
            Error::persistence().with_reason(format!("{}: {err}", err.kind()))
        })?;

        self.history = history;
        Ok(())
    }

    /// Erases the stored history.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.store.remove(&self.key).map_err(|err| {
            Error::persistence().with_reason(format!("{}: {err}", err.kind()))
        })?;
        self.history.clear();
        self.synced = true;
        Ok(())
    }

    /// Reads the stored history. Absent or malformed values are empty,
    /// only a failing store is an error.
    fn read_stored(&self) -> Result<Vec<Message>, Error> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(err) => {
                return Err(Error::persistence()
                    .with_reason(format!("{}: {err}", err.kind())));
            }
        };
        match serde_json::from_str(&raw) {
            Ok(history) => Ok(history),
            Err(err) => {
                warn!("discarding malformed history: {err}");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chatbox_model::DurableStore as _;
    use chatbox_test_surface::MemoryStore;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_round_trip() {
        let store = MemoryStore::default();
        let mut history = SessionStore::open(store.clone(), "chat");
        assert!(history.load_all().is_empty());

        let messages = vec![
            Message::user("hello"),
            Message::bot("Hi!"),
            Message::user("hello"),
            Message::bot("Hi!"),
        ];
        for msg in &messages {
            history.append(msg.clone()).unwrap();
        }
        assert_eq!(store.write_count(), 4);
        assert_eq!(history.load_all(), messages);

        // A fresh store sees the same history.
        let mut reopened = SessionStore::open(store, "chat");
        assert_eq!(reopened.history(), messages.as_slice());
        assert_eq!(reopened.load_all(), messages);
    }

    #[test]
    fn test_stored_format() {
        let store = MemoryStore::default();
        let mut history = SessionStore::open(store.clone(), "chat");
        history.append(Message::user("hello")).unwrap();
        assert_eq!(
            store.raw("chat").as_deref(),
            Some(r#"[{"sender":"user","message":"hello"}]"#)
        );
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::default();
        let mut history = SessionStore::open(store.clone(), "chat");
        history.append(Message::user("hello")).unwrap();

        history.clear().unwrap();
        assert!(history.history().is_empty());
        assert!(history.load_all().is_empty());
        assert_eq!(store.raw("chat"), None);

        // Clearing nothing is fine.
        history.clear().unwrap();
    }

    #[test]
    fn test_failed_append_keeps_history() {
        let store = MemoryStore::default();
        let mut history = SessionStore::open(store.clone(), "chat");
        history.append(Message::user("one")).unwrap();

        store.set_fail_writes(true);
        let err = history.append(Message::bot("two")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(history.history(), [Message::user("one")]);

        store.set_fail_writes(false);
        history.append(Message::user("three")).unwrap();
        assert_eq!(
            history.load_all(),
            [Message::user("one"), Message::user("three")]
        );
    }

    #[test]
    fn test_failed_clear_keeps_history() {
        let store = MemoryStore::default();
        let mut history = SessionStore::open(store.clone(), "chat");
        history.append(Message::user("one")).unwrap();

        store.set_fail_writes(true);
        assert_eq!(history.clear().unwrap_err().kind(), ErrorKind::Persistence);
        assert_eq!(history.history(), [Message::user("one")]);
    }

    #[test]
    fn test_unreadable_history_is_empty() {
        let store = MemoryStore::default();
        store.insert_raw("chat", "{not json");
        let mut history = SessionStore::open(store.clone(), "chat");
        assert!(history.history().is_empty());

        store.insert_raw("chat", r#"[{"sender":"alien","message":"hi"}]"#);
        assert!(history.load_all().is_empty());

        store.insert_raw("chat", r#"[{"sender":"bot","message":"hi"}]"#);
        store.set_fail_reads(true);
        assert!(history.load_all().is_empty());
        store.set_fail_reads(false);
        assert_eq!(history.load_all(), [Message::bot("hi")]);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut store = MemoryStore::default();
        store.set("other", "untouched").unwrap();
        let mut history = SessionStore::open(store.clone(), "chat");
        history.append(Message::user("hello")).unwrap();
        history.clear().unwrap();
        assert_eq!(store.raw("other").as_deref(), Some("untouched"));
    }

    #[test]
    fn test_append_after_failed_read_keeps_stored_history() {
        let store = MemoryStore::default();
        store.insert_raw(
            "chat",
            r#"[{"sender":"user","message":"one"},{"sender":"bot","message":"two"}]"#,
        );

        store.set_fail_reads(true);
        let mut history = SessionStore::open(store.clone(), "chat");
        assert!(history.history().is_empty());

        store.set_fail_reads(false);
        history.append(Message::user("three")).unwrap();
        let expected =
            [Message::user("one"), Message::bot("two"), Message::user("three")];
        assert_eq!(history.history(), expected);
        assert_eq!(SessionStore::open(store, "chat").history(), expected);
    }

    #[test]
    fn test_append_refuses_while_unreadable() {
        let store = MemoryStore::default();
        let seeded = r#"[{"sender":"user","message":"one"}]"#;
        store.insert_raw("chat", seeded);

        store.set_fail_reads(true);
        let mut history = SessionStore::open(store.clone(), "chat");
        let err = history.append(Message::user("two")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(store.raw("chat").as_deref(), Some(seeded));
        assert_eq!(store.write_count(), 0);
        assert!(history.history().is_empty());
    }

    #[test]
    fn test_malformed_history_is_overwritten() {
        let store = MemoryStore::default();
        store.insert_raw("chat", "{not json");
        let mut history = SessionStore::open(store.clone(), "chat");
        history.append(Message::user("hello")).unwrap();
        assert_eq!(
            store.raw("chat").as_deref(),
            Some(r#"[{"sender":"user","message":"hello"}]"#)
        );
    }
}

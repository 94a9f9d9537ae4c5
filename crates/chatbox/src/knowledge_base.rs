use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

use chatbox_model::Entry;

const DEFAULT_KNOWLEDGE_BASE: &str = include_str!("./knowledge_base.json");

/// The error returned when a knowledge base cannot be loaded.
#[derive(Debug)]
pub enum KnowledgeBaseError {
    /// The file could not be read.
    Io(io::Error),
    /// The file is not a JSON array of entries.
    Parse(serde_json::Error),
}

impl Display for KnowledgeBaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeBaseError::Io(err) => {
                write!(f, "failed to read knowledge base: {err}")
            }
            KnowledgeBaseError::Parse(err) => {
                write!(f, "malformed knowledge base: {err}")
            }
        }
    }
}

impl Error for KnowledgeBaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            KnowledgeBaseError::Io(err) => Some(err),
            KnowledgeBaseError::Parse(err) => Some(err),
        }
    }
}

/// Loads a knowledge base from a JSON file.
///
/// The file must contain an array of `{"keyword": ..., "answer": ...}`
/// objects. Their order is kept.
pub fn load_knowledge_base<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Entry>, KnowledgeBaseError> {
    let raw = fs::read_to_string(path).map_err(KnowledgeBaseError::Io)?;
    let entries: Vec<Entry> =
        serde_json::from_str(&raw).map_err(KnowledgeBaseError::Parse)?;
    debug!("loaded {} knowledge base entries", entries.len());
    Ok(entries)
}

/// Returns the knowledge base bundled with this crate.
pub fn default_knowledge_base() -> Vec<Entry> {
    serde_json::from_str(DEFAULT_KNOWLEDGE_BASE)
        .expect("bundled knowledge base is malformed")
}

/// Loads the knowledge base at `path`, or the bundled one if no path is
/// given.
///
/// Any path the OS accepts works, including ones that are not valid UTF-8.
pub fn load_knowledge_base_or_default<P: AsRef<Path>>(
    path: Option<P>,
) -> Result<Vec<Entry>, KnowledgeBaseError> {
    match path {
        Some(path) => load_knowledge_base(path),
        None => Ok(default_knowledge_base()),
    }
}

#[cfg(test)]
mod tests {
    use chatbox_core::{Matcher, ThresholdLadder};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_knowledge_base() {
        let entries = default_knowledge_base();
        assert!(!entries.is_empty());

        let matcher = Matcher::new(entries, ThresholdLadder::default());
        assert_eq!(
            matcher.find("Hello there!").unwrap().answer(),
            "Hey there! What would you like to know?"
        );
        assert_eq!(
            matcher.find("How do I clear the chat?").unwrap().answer(),
            "Type /clear and I'll forget the whole conversation."
        );
        assert!(matcher.find("quantum chromodynamics").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("kb.json");
        fs::write(&path, r#"[{"keyword": "ping", "answer": "pong"}]"#).unwrap();

        let entries = load_knowledge_base(&path).unwrap();
        assert_eq!(entries, [Entry::new("ping", "pong")]);
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("kb.json");

        assert!(matches!(
            load_knowledge_base(&path),
            Err(KnowledgeBaseError::Io(_))
        ));

        fs::write(&path, r#"{"keyword": "ping"}"#).unwrap();
        assert!(matches!(
            load_knowledge_base(&path),
            Err(KnowledgeBaseError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default() {
        let entries = load_knowledge_base_or_default(None::<&Path>).unwrap();
        assert_eq!(entries, default_knowledge_base());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            load_knowledge_base_or_default(Some(&missing)),
            Err(KnowledgeBaseError::Io(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_from_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(OsStr::from_bytes(b"kb-\xff.json"));
        if fs::write(&path, r#"[{"keyword": "ping", "answer": "pong"}]"#)
            .is_err()
        {
            // Some filesystems reject such names.
            return;
        }

        let entries =
            load_knowledge_base_or_default(Some(path.into_os_string())).unwrap();
        assert_eq!(entries, [Entry::new("ping", "pong")]);
    }
}

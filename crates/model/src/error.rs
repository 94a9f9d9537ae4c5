use std::fmt::{self, Display};

/// The kind of error that occurred in a durable store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The storage backend cannot be reached or is disabled.
    Unavailable,
    /// The storage backend refused the write because it is full.
    QuotaExceeded,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unavailable => write!(f, "Storage unavailable"),
            ErrorKind::QuotaExceeded => write!(f, "Storage quota exceeded"),
            ErrorKind::Other => write!(f, "Storage error"),
        }
    }
}

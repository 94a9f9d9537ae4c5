use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The history could not be written to the durable store.
    Persistence,
    /// The chat was configured with invalid values.
    InvalidConfig,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Persistence => write!(f, "Persistence error"),
            ErrorKind::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

/// Describes an error from the chat core.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `Persistence` kind.
    #[inline]
    pub fn persistence() -> Self {
        Self {
            kind: ErrorKind::Persistence,
            reason: None,
        }
    }

    /// Creates a new error with the `InvalidConfig` kind.
    #[inline]
    pub fn invalid_config() -> Self {
        Self {
            kind: ErrorKind::InvalidConfig,
            reason: None,
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", self.kind, reason),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {}

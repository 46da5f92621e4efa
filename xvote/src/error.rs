//! Error type for the round API.

use core::fmt;

/// Kinds of error reported by the non-panicking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `try_send` into a slot that still holds a value. A caller bug.
    SlotOccupied,
    /// `try_receive` from an empty slot. Retry on a later step.
    SlotEmpty,
    /// No task could move and the round is not terminal.
    Stalled,
    /// The round used up its step limit.
    StepLimit,
    /// A vote rule string did not parse.
    InvalidRule,
}

/// Error returned by the non-panicking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Error { kind }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// True only for an empty slot, which a polling receiver retries.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::SlotEmpty
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::SlotOccupied => write!(f, "Channel slot already holds a pending value"),
            ErrorKind::SlotEmpty => write!(f, "Channel slot is empty"),
            ErrorKind::Stalled => write!(f, "Round stalled: no task can make progress"),
            ErrorKind::StepLimit => write!(f, "Round did not finish within the step limit"),
            ErrorKind::InvalidRule => write!(f, "Invalid vote rule"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

use std::fmt;

use crate::stack::EmptyStack;

/// Which side of a loop failed to find its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Open,
    Close,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bracket::Open => f.write_str("'['"),
            Bracket::Close => f.write_str("']'"),
        }
    }
}

/// Everything that can end a run early. All variants are fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `[` with no reachable `]`, or a `]` with no open loop.
    #[error("unmatched {bracket} at position {position}")]
    UnmatchedBracket { position: usize, bracket: Bracket },

    #[error(transparent)]
    EmptyStack(#[from] EmptyStack),

    #[error("tape size must be positive")]
    InvalidTapeSize,

    #[error("step limit exceeded after {steps} steps")]
    StepLimitExceeded { steps: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unmatched_open(position: usize) -> Self {
        Error::UnmatchedBracket {
            position,
            bracket: Bracket::Open,
        }
    }

    pub(crate) fn unmatched_close(position: usize) -> Self {
        Error::UnmatchedBracket {
            position,
            bracket: Bracket::Close,
        }
    }
}

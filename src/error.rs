//! Error type for streaming hash computations

/// Failures surfaced by the streaming controller and its collaborators.
///
/// None of these carry a partial digest: once an error is returned the
/// accumulated state has already been dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The word source ended before `16 * blocks` words were delivered
    InputUnderrun { expected: u64, received: u64 },
    /// Declared block count disagrees with the padded message length
    BlockCountMismatch { declared: u64, actual: u64 },
    /// Padded input is not a whole number of 64-byte blocks
    UnalignedInput { len: usize },
    /// The word source failed while reading; carries the I/O kind and message
    SourceFailed {
        kind: std::io::ErrorKind,
        message: String,
    },
    /// The computation was stopped before the last block was folded
    Cancelled,
    /// A word arrived after the digest had already been emitted
    AlreadyFinished,
}

impl std::fmt::Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashError::InputUnderrun { expected, received } => write!(
                f,
                "Input underrun: expected {} words, source ended after {}",
                expected, received
            ),
            HashError::BlockCountMismatch { declared, actual } => write!(
                f,
                "Block count mismatch: declared {}, padded message has {}",
                declared, actual
            ),
            HashError::UnalignedInput { len } => {
                write!(f, "Padded input length {} is not a multiple of 64", len)
            }
            HashError::SourceFailed { message, .. } => {
                write!(f, "Word source failed: {}", message)
            }
            HashError::Cancelled => write!(f, "Hash computation cancelled"),
            HashError::AlreadyFinished => write!(f, "Digest already emitted"),
        }
    }
}

impl std::error::Error for HashError {}

impl From<std::io::Error> for HashError {
    fn from(e: std::io::Error) -> Self {
        HashError::SourceFailed {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HashError>;

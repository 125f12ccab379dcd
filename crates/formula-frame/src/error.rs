use chrono::TimeDelta;

pub type FrameResult<T> = Result<T, FrameError>;

/// Broad classification of a [`FrameError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The call was set up wrong (bad window, mismatched lengths, unsupported input type).
    Configuration,
    /// The call named a column, group or row that does not exist.
    Reference,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("window size must be at least 1, got {0}")]
    InvalidWindowSize(usize),

    #[error("window duration must be non-negative, got {0}")]
    NegativeWindowDuration(TimeDelta),

    #[error("unsupported element type: {0}")]
    UnsupportedElementType(&'static str),

    #[error("length mismatch for {context}: expected {expected} values, got {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("column {0} is not chronological")]
    NotChronological(String),

    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    #[error("group_by requires at least one label column")]
    NoLabels,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("row {row} out of bounds for length {len}")]
    RowOutOfBounds { row: usize, len: usize },
}

impl FrameError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FrameError::InvalidWindowSize(_)
            | FrameError::NegativeWindowDuration(_)
            | FrameError::UnsupportedElementType(_)
            | FrameError::LengthMismatch { .. }
            | FrameError::NotChronological(_)
            | FrameError::InvalidPermutation(_)
            | FrameError::NoLabels
            | FrameError::InvalidConfig(_) => ErrorCategory::Configuration,
            FrameError::UnknownColumn(_)
            | FrameError::UnknownGroup(_)
            | FrameError::RowOutOfBounds { .. } => ErrorCategory::Reference,
        }
    }

    pub(crate) fn length_mismatch(
        context: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        FrameError::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

/// Check that every position addresses a row of a `len`-row container.
pub(crate) fn check_positions(positions: &[usize], len: usize) -> FrameResult<()> {
    match positions.iter().find(|&&row| row >= len) {
        Some(&row) => Err(FrameError::RowOutOfBounds { row, len }),
        None => Ok(()),
    }
}

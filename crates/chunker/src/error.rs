use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while splitting or packing a document
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// A single unit is larger than the token ceiling and cannot be placed in any group
    #[error("Unpackable unit at index {index}: {tokens} tokens exceeds max_tokens={max_tokens}")]
    UnpackableUnit {
        index: usize,
        tokens: usize,
        max_tokens: usize,
    },

    /// No grouping of the prefix ending at `index` satisfies both bounds
    #[error(
        "No feasible grouping for units up to index {index} within [{min_tokens}, {max_tokens}] tokens"
    )]
    InfeasiblePartition {
        index: usize,
        min_tokens: usize,
        max_tokens: usize,
    },

    /// The token counter failed to encode a piece of text
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ChunkerError {
    /// Create a tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error comes from the token bounds rather than from I/O or the tokenizer
    #[must_use]
    pub const fn is_packing_error(&self) -> bool {
        matches!(
            self,
            Self::UnpackableUnit { .. } | Self::InfeasiblePartition { .. }
        )
    }
}

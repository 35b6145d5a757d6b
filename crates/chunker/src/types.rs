use serde::{Deserialize, Serialize};

/// A measured piece of text at some granularity (section, paragraph or sentence)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unit {
    /// Token count of `text`, measured when the unit was created
    pub tokens: usize,

    /// The text itself, trimmed
    pub text: String,
}

impl Unit {
    /// Create a new unit
    #[must_use]
    pub fn new(tokens: usize, text: impl Into<String>) -> Self {
        Self {
            tokens,
            text: text.into(),
        }
    }

    /// Check whether the unit fits under a token ceiling
    #[must_use]
    pub const fn fits(&self, max_tokens: usize) -> bool {
        self.tokens <= max_tokens
    }
}

/// A contiguous run of units merged into one text block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Sum of the member units' token counts
    pub tokens: usize,

    /// Joined text of the members
    pub text: String,

    /// Index of the first member in the packed sequence
    pub start: usize,

    /// Index of the last member in the packed sequence (inclusive)
    pub end: usize,
}

impl Group {
    /// Extract the joined text
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Chunking result for one document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkedDocument {
    /// Final chunks in document order, each measured on its joined text
    pub chunks: Vec<Unit>,

    /// Sum of the chunks' token counts
    pub total_tokens: usize,

    /// Token count of the whole, unsplit content
    pub content_tokens: usize,
}

impl ChunkedDocument {
    /// Number of chunks
    #[must_use]
    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the chunks hold fewer tokens than the source, which hints at dropped text
    #[must_use]
    pub const fn lost_tokens(&self) -> bool {
        self.total_tokens < self.content_tokens
    }
}

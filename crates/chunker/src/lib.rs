//! # Markdown Chunker
//!
//! Token-bounded chunking of markdown documents for embedding-based retrieval.
//!
//! ## Philosophy
//!
//! The chunker creates chunks that:
//! - Never exceed the embedding model's token budget
//! - Are cut at the coarsest structure that fits (sections, then paragraphs, then sentences)
//! - Are as few as possible, by merging adjacent small pieces
//! - Are reproducible: the same input and tokenizer give the same chunks
//!
//! ## Architecture
//!
//! ```text
//! Markdown
//!     │
//!     ├──> Unit Splitter (every candidate measured by the TokenCounter)
//!     │    ├─> Headings of level L  ──> oversized sections retry at L+1
//!     │    ├─> List items           ──> oversized items go to paragraphs
//!     │    ├─> Paragraphs           ──> oversized paragraphs go to sentences
//!     │    └─> Sentences            ──> packed immediately, final
//!     │
//!     └──> Chunk Packer
//!          ├─> Shortest-partition dynamic program over unit sizes
//!          └─> Joined, re-measured chunks in document order
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mdchunk_core::{ChunkerConfig, MarkdownChunker, WordCounter};
//!
//! let config = ChunkerConfig::default().with_max_tokens(8);
//! let chunker = MarkdownChunker::new(config, WordCounter).unwrap();
//!
//! let doc = "# Intro\nShort opening.\n# Usage\nRun the tool on a file.\n";
//! let chunked = chunker.chunk_str(doc).unwrap();
//!
//! assert_eq!(chunked.total_chunks(), 2);
//! for chunk in &chunked.chunks {
//!     assert!(chunk.tokens <= 8);
//! }
//! ```

mod chunker;
mod config;
mod counter;
mod error;
mod packer;
mod sentence;
mod splitter;
mod types;

pub use chunker::MarkdownChunker;
pub use config::{ChunkerConfig, JoinStyle, DEFAULT_MAX_TOKENS};
pub use counter::{HfTokenCounter, TokenCounter, WordCounter};
pub use error::{ChunkerError, Result};
pub use packer::group_chunks;
pub use sentence::split_sentences;
pub use splitter::{CutStrategy, HeadingCuts, ListCuts, UnitSplitter};
pub use types::{ChunkedDocument, Group, Unit};

/// Split `text` into units of at most `max_tokens`, starting at heading `level`
pub fn split_into_sections<C: TokenCounter>(
    counter: C,
    text: &str,
    level: Option<usize>,
    max_tokens: usize,
) -> Result<Vec<Unit>> {
    UnitSplitter::new(counter, max_tokens)?.split_into_sections(text, level)
}

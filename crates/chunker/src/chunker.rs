use crate::config::{ChunkerConfig, JoinStyle};
use crate::counter::TokenCounter;
use crate::error::{ChunkerError, Result};
use crate::packer::group_chunks;
use crate::splitter::UnitSplitter;
use crate::types::{ChunkedDocument, Unit};
use std::path::Path;

/// Main chunker interface for processing markdown documents
pub struct MarkdownChunker<C> {
    config: ChunkerConfig,
    splitter: UnitSplitter<C>,
}

impl<C: TokenCounter> MarkdownChunker<C> {
    /// Create a new chunker with configuration
    pub fn new(config: ChunkerConfig, counter: C) -> Result<Self> {
        config.validate().map_err(ChunkerError::InvalidConfig)?;
        let splitter = UnitSplitter::new(counter, config.max_tokens)?;
        Ok(Self { config, splitter })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split a document into section-level units without packing them
    pub fn split(&self, content: &str) -> Result<Vec<Unit>> {
        self.splitter
            .split_into_sections(content, self.config.top_level)
    }

    /// Chunk markdown from a string.
    ///
    /// Sections are packed with the section join style and every resulting chunk is measured
    /// again, since joined text does not always tokenize to the sum of its parts.
    pub fn chunk_str(&self, content: &str) -> Result<ChunkedDocument> {
        let content_tokens = self.splitter.counter().count_tokens(content)?;
        let sections = self.split(content)?;
        let groups = group_chunks(
            &sections,
            self.config.min_tokens,
            self.config.max_tokens,
            JoinStyle::Section,
        )?;

        let chunks = groups
            .into_iter()
            .map(|group| self.splitter.measure(&group.text))
            .collect::<Result<Vec<_>>>()?;
        let total_tokens = chunks.iter().map(|chunk| chunk.tokens).sum();

        log::debug!(
            "Chunked {content_tokens} tokens into {} chunks ({} sections)",
            chunks.len(),
            sections.len()
        );

        Ok(ChunkedDocument {
            chunks,
            total_tokens,
            content_tokens,
        })
    }

    /// Chunk markdown from a file
    pub fn chunk_file(&self, path: impl AsRef<Path>) -> Result<ChunkedDocument> {
        let content = std::fs::read_to_string(path)?;
        self.chunk_str(&content)
    }
}

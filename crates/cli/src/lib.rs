//! Driver for chunking markdown document collections.
//!
//! Loads a JSON array of documents, chunks each document's markdown content and writes the
//! collection back with a chunk list per document.

pub mod collection;
pub mod config;
pub mod report;

use anyhow::{Context as AnyhowContext, Result};
use config::Settings;
use mdchunk_core::{HfTokenCounter, MarkdownChunker, TokenCounter, WordCounter};

/// Build the token counter named by the settings, or fall back to word counting
pub fn build_counter(settings: &Settings) -> Result<Box<dyn TokenCounter>> {
    match &settings.tokenizer {
        Some(path) => {
            let counter = HfTokenCounter::from_file(path)
                .with_context(|| format!("Failed to load tokenizer {}", path.display()))?
                .with_special_tokens(settings.special_tokens);
            log::info!("Counting tokens with {}", path.display());
            Ok(Box::new(counter))
        }
        None => {
            log::warn!(
                "No tokenizer configured (--tokenizer or {}); counting whitespace-separated words",
                config::TOKENIZER_ENV
            );
            Ok(Box::new(WordCounter))
        }
    }
}

/// Build a chunker from resolved settings
pub fn build_chunker(settings: &Settings) -> Result<MarkdownChunker<Box<dyn TokenCounter>>> {
    let counter = build_counter(settings)?;
    MarkdownChunker::new(settings.chunker.clone(), counter).context("Failed to create chunker")
}

//! Token counting capability.
//!
//! The splitter and packer never tokenize on their own: every size is measured through a
//! [`TokenCounter`] handed in by the caller. Production code uses [`HfTokenCounter`] with the
//! embedding model's `tokenizer.json`; tests use [`WordCounter`].

use crate::error::{ChunkerError, Result};
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;

/// Measures how many tokens an embedding model would produce for a text
pub trait TokenCounter {
    /// Count tokens in `text`. Must be deterministic for a given counter.
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        (**self).count_tokens(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Box<T> {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        (**self).count_tokens(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Arc<T> {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        (**self).count_tokens(text)
    }
}

/// Token counter backed by a HuggingFace `tokenizer.json`
pub struct HfTokenCounter {
    tokenizer: Tokenizer,
    add_special_tokens: bool,
}

impl HfTokenCounter {
    /// Load a tokenizer from a `tokenizer.json` file.
    ///
    /// Padding and truncation stored in the file are disabled so counts reflect the full text.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ChunkerError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("tokenizer file not found: {}", path.display()),
            )));
        }

        // Counting runs once per candidate unit; keep it single-threaded unless the user
        // explicitly opted into parallel tokenization.
        if !tokenizers::utils::parallelism::is_parallelism_configured() {
            tokenizers::utils::parallelism::set_parallelism(false);
        }

        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            ChunkerError::tokenizer(format!("Tokenizer load failed ({}): {e}", path.display()))
        })?;
        Self::from_tokenizer(tokenizer)
    }

    /// Wrap an already-built tokenizer
    pub fn from_tokenizer(mut tokenizer: Tokenizer) -> Result<Self> {
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(None)
            .map_err(|e| ChunkerError::tokenizer(format!("Tokenizer truncation reset failed: {e}")))?;
        log::debug!(
            "Loaded tokenizer with vocabulary of {} entries",
            tokenizer.get_vocab_size(true)
        );
        Ok(Self {
            tokenizer,
            add_special_tokens: true,
        })
    }

    /// Builder: choose whether special tokens (CLS/SEP, BOS/EOS) are counted
    #[must_use]
    pub const fn with_special_tokens(mut self, add_special_tokens: bool) -> Self {
        self.add_special_tokens = add_special_tokens;
        self
    }
}

impl TokenCounter for HfTokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        self.tokenizer
            .encode(text, self.add_special_tokens)
            .map(|encoding| encoding.len())
            .map_err(|e| ChunkerError::tokenizer(format!("Encode failed: {e}")))
    }
}

/// Counts whitespace-separated words; a deterministic stand-in for a real tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

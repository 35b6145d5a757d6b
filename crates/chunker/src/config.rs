use serde::{Deserialize, Serialize};

/// Default token ceiling. Embedding models usually accept 512 tokens; the rest is headroom
/// for re-tokenization of joined text, which can grow slightly.
pub const DEFAULT_MAX_TOKENS: usize = 480;

/// Configuration for markdown chunking behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Maximum chunk size in tokens (hard limit, inclusive)
    pub max_tokens: usize,

    /// Minimum group size in tokens (inclusive, 0 disables the bound)
    pub min_tokens: usize,

    /// Heading level the document is first cut at (`None` starts at paragraphs)
    pub top_level: Option<usize>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            min_tokens: 0,
            top_level: Some(1),
        }
    }
}

impl ChunkerConfig {
    /// Builder: set the token ceiling
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Builder: set the token floor
    #[must_use]
    pub const fn with_min_tokens(mut self, min_tokens: usize) -> Self {
        self.min_tokens = min_tokens;
        self
    }

    /// Builder: set the first heading level
    #[must_use]
    pub const fn with_top_level(mut self, top_level: Option<usize>) -> Self {
        self.top_level = top_level;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be > 0".to_string());
        }

        if self.min_tokens > self.max_tokens {
            return Err(format!(
                "min_tokens ({}) cannot exceed max_tokens ({})",
                self.min_tokens, self.max_tokens
            ));
        }

        if self.top_level == Some(0) {
            return Err("top_level must be >= 1 (use none to start at paragraphs)".to_string());
        }

        Ok(())
    }
}

/// How the text of a group's members is joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum JoinStyle {
    /// Members are concatenated with a single space
    #[default]
    Paragraph,

    /// Members are joined with a markdown hard line break (two spaces and a newline)
    Section,
}

impl JoinStyle {
    /// Separator placed between two members of a group
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Paragraph => " ",
            Self::Section => "  \n",
        }
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Section => "section",
        }
    }
}

use mdchunk_core::{
    split_into_sections, ChunkerConfig, ChunkerError, MarkdownChunker, TokenCounter, Unit,
    UnitSplitter, WordCounter,
};
use pretty_assertions::assert_eq;

const GUIDE: &str = include_str!("fixtures/guide.md");

/// Counts characters in groups of four, closer to subword tokenizers than word counting
struct CharCounter;

impl TokenCounter for CharCounter {
    fn count_tokens(&self, text: &str) -> mdchunk_core::Result<usize> {
        Ok(text.chars().count().div_ceil(4))
    }
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn chunk_words(chunks: &[Unit]) -> Vec<&str> {
    chunks.iter().flat_map(|c| words(&c.text)).collect()
}

#[test]
fn guide_chunks_respect_ceiling_and_keep_every_word() {
    for max_tokens in [30, 60, 120, 480] {
        let chunker = MarkdownChunker::new(
            ChunkerConfig::default().with_max_tokens(max_tokens),
            WordCounter,
        )
        .unwrap();
        let doc = chunker.chunk_str(GUIDE).unwrap();

        assert!(doc.total_chunks() > 0);
        assert!(
            doc.chunks.iter().all(|c| c.tokens <= max_tokens),
            "max_tokens={max_tokens}"
        );
        assert_eq!(chunk_words(&doc.chunks), words(GUIDE), "max_tokens={max_tokens}");
        assert_eq!(doc.total_tokens, doc.content_tokens);
        assert!(!doc.lost_tokens());
    }
}

#[test]
fn whole_guide_fits_in_one_chunk_with_large_ceiling() {
    let chunker = MarkdownChunker::new(ChunkerConfig::default(), WordCounter).unwrap();
    let doc = chunker.chunk_str(GUIDE).unwrap();
    assert_eq!(doc.total_chunks(), 1);
}

#[test]
fn top_level_sections_start_at_their_headings() {
    let units = split_into_sections(WordCounter, GUIDE, Some(1), 480).unwrap();
    assert_eq!(units.len(), 3);
    assert!(units[0].text.starts_with("# Installation"));
    assert!(units[1].text.starts_with("# Usage"));
    assert!(units[2].text.starts_with("# Troubleshooting"));
}

#[test]
fn oversized_sections_descend_into_subsections() {
    let units = split_into_sections(WordCounter, GUIDE, Some(1), 60).unwrap();
    assert!(units.iter().all(|u| u.tokens <= 60));
    assert!(units.iter().any(|u| u.text.starts_with("## Requirements")));
    assert!(units.iter().any(|u| u.text.starts_with("## Tuning")));
}

#[test]
fn pipeline_is_deterministic() {
    let config = ChunkerConfig::default().with_max_tokens(40);
    let first = MarkdownChunker::new(config.clone(), CharCounter)
        .unwrap()
        .chunk_str(GUIDE)
        .unwrap();
    let second = MarkdownChunker::new(config, CharCounter)
        .unwrap()
        .chunk_str(GUIDE)
        .unwrap();
    assert_eq!(first, second);
    assert!(first.chunks.iter().all(|c| c.tokens <= 40));
}

#[test]
fn text_without_markers_matches_paragraph_splitting() {
    let text = "Plain prose without structure.\nA second line of prose.\n\nA third paragraph.";
    let splitter = UnitSplitter::new(WordCounter, 8).unwrap();
    assert_eq!(
        splitter.split_into_sections(text, None).unwrap(),
        splitter.split_into_paragraphs(text).unwrap()
    );
    assert_eq!(
        splitter.split_into_sections(text, Some(1)).unwrap(),
        splitter.split_into_paragraphs(text).unwrap()
    );
}

#[test]
fn single_block_falls_through_to_sentences() {
    let text = "First sentence here. Second sentence here. Third sentence here.";
    let units = split_into_sections(WordCounter, text, Some(1), 6).unwrap();
    let texts: Vec<_> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "First sentence here. Second sentence here.",
            "Third sentence here."
        ]
    );
}

#[test]
fn overlong_sentence_fails_the_document() {
    let chunker = MarkdownChunker::new(
        ChunkerConfig::default().with_max_tokens(5),
        WordCounter,
    )
    .unwrap();
    let err = chunker
        .chunk_str("# Title\nthis single sentence has far too many words in it.\n")
        .unwrap_err();
    assert!(matches!(err, ChunkerError::UnpackableUnit { .. }), "{err}");
}

#[test]
fn min_tokens_applies_to_final_chunks() {
    let config = ChunkerConfig::default()
        .with_max_tokens(10)
        .with_min_tokens(4);
    let chunker = MarkdownChunker::new(config, WordCounter).unwrap();
    let doc = chunker
        .chunk_str("# A\none two\n# B\nthree four\n# C\nfive six\n")
        .unwrap();
    assert!(doc.chunks.iter().all(|c| (4..=10).contains(&c.tokens)));
    assert_eq!(doc.total_chunks(), 2);
}

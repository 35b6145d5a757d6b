use crate::config::JoinStyle;
use crate::counter::TokenCounter;
use crate::error::{ChunkerError, Result};
use crate::packer::group_chunks;
use crate::sentence::split_sentences;
use crate::types::Unit;
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::{Entry, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

/// Produces candidate cut points for a block of markdown
pub trait CutStrategy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Byte offsets where a new section starts, ascending
    fn cut_points(&self, text: &str) -> Vec<usize>;

    /// Heading level used to re-split a section cut by this strategy that is still too large
    /// (`None` sends it to paragraph splitting)
    fn next_level(&self) -> Option<usize>;
}

/// Cuts before every heading of exactly `level` `#` characters
pub struct HeadingCuts {
    level: usize,
    pattern: Regex,
}

impl HeadingCuts {
    pub fn new(level: usize) -> Result<Self> {
        // Only complete lines count: a heading on the last line without a newline is not a cut.
        let pattern = build_pattern(&format!(r"^#{{{level}}} [^\n]+\n"))?;
        Ok(Self { level, pattern })
    }
}

impl CutStrategy for HeadingCuts {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn cut_points(&self, text: &str) -> Vec<usize> {
        self.pattern.find_iter(text).map(|m| m.start()).collect()
    }

    fn next_level(&self) -> Option<usize> {
        Some(self.level + 1)
    }
}

/// Cuts before list items, using whichever list kind (bulleted or numbered) appears first
pub struct ListCuts {
    bullet: Regex,
    numbered: Regex,
}

impl ListCuts {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bullet: build_pattern(r"^- [^\n]+\n")?,
            numbered: build_pattern(r"^\d+\. [^\n]+\n")?,
        })
    }
}

impl CutStrategy for ListCuts {
    fn name(&self) -> &'static str {
        "list"
    }

    fn cut_points(&self, text: &str) -> Vec<usize> {
        let bullets: Vec<usize> = self.bullet.find_iter(text).map(|m| m.start()).collect();
        let numbered: Vec<usize> = self.numbered.find_iter(text).map(|m| m.start()).collect();

        match (bullets.first(), numbered.first()) {
            (Some(b), Some(n)) if n < b => numbered,
            (None, Some(_)) => numbered,
            _ => bullets,
        }
    }

    fn next_level(&self) -> Option<usize> {
        None
    }
}

fn build_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|err| ChunkerError::invalid_config(format!("Invalid boundary pattern: {err}")))
}

/// Cut `text` at `points` (plus the start of the text), trim, and drop empty pieces
fn cut_at<'a>(text: &'a str, points: &[usize]) -> Vec<&'a str> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut bounds = Vec::with_capacity(points.len() + 2);
    if points[0] != 0 {
        bounds.push(0);
    }
    bounds.extend_from_slice(points);
    bounds.push(text.len());

    bounds
        .windows(2)
        .map(|w| text[w[0]..w[1]].trim())
        .filter(|section| !section.is_empty())
        .collect()
}

/// Decomposes markdown into units that each fit under the token ceiling, using the coarsest
/// granularity that achieves it.
pub struct UnitSplitter<C> {
    counter: C,
    max_tokens: usize,
    lists: ListCuts,
    headings: Mutex<HashMap<usize, Arc<HeadingCuts>>>,
}

impl<C: TokenCounter> UnitSplitter<C> {
    /// Create a splitter measuring with `counter`
    pub fn new(counter: C, max_tokens: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(ChunkerError::invalid_config("max_tokens must be > 0"));
        }
        Ok(Self {
            counter,
            max_tokens,
            lists: ListCuts::new()?,
            headings: Mutex::new(HashMap::new()),
        })
    }

    #[must_use]
    pub const fn counter(&self) -> &C {
        &self.counter
    }

    /// Measure a piece of text
    pub fn measure(&self, text: &str) -> Result<Unit> {
        Ok(Unit::new(self.counter.count_tokens(text)?, text))
    }

    /// Heading cuts for `level`, compiled on first use
    fn heading_cuts(&self, level: usize) -> Result<Arc<HeadingCuts>> {
        let mut cache = self.headings.lock().unwrap_or_else(PoisonError::into_inner);
        match cache.entry(level) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let cuts = Arc::new(HeadingCuts::new(level)?);
                Ok(Arc::clone(entry.insert(cuts)))
            }
        }
    }

    /// Split a document into sections at headings of `level`.
    ///
    /// Falls back to list items and then to paragraphs when no heading of that level exists.
    /// Sections over the ceiling are split again one heading level deeper (or by paragraph when
    /// they came from a list). `level = None` goes straight to paragraphs.
    pub fn split_into_sections(&self, text: &str, level: Option<usize>) -> Result<Vec<Unit>> {
        let Some(level) = level else {
            return self.split_into_paragraphs(text);
        };

        let headings = self.heading_cuts(level)?;
        let chain: [&dyn CutStrategy; 2] = [headings.as_ref(), &self.lists];

        for strategy in chain {
            let sections = cut_at(text, &strategy.cut_points(text));
            if sections.is_empty() {
                continue;
            }

            log::debug!(
                "Cut {} sections by {} (level {level})",
                sections.len(),
                strategy.name()
            );

            let mut units = Vec::with_capacity(sections.len());
            for section in sections {
                let unit = self.measure(section)?;
                if unit.fits(self.max_tokens) {
                    units.push(unit);
                } else {
                    units.extend(self.split_into_sections(section, strategy.next_level())?);
                }
            }
            return Ok(units);
        }

        log::debug!("No level {level} headings or list items, splitting by paragraph");
        self.split_into_paragraphs(text)
    }

    /// Split text on line breaks and pack the paragraphs.
    ///
    /// Oversized paragraphs are replaced by their sentence-level output. The result is final:
    /// each unit is a packed group, re-measured.
    pub fn split_into_paragraphs(&self, text: &str) -> Result<Vec<Unit>> {
        let mut units = Vec::new();
        for paragraph in text.split('\n').map(str::trim).filter(|p| !p.is_empty()) {
            let unit = self.measure(paragraph)?;
            if unit.fits(self.max_tokens) {
                units.push(unit);
            } else {
                units.extend(self.split_into_sentences(paragraph)?);
            }
        }
        self.pack(&units)
    }

    /// Split a paragraph into sentences and pack them into final, re-measured units
    pub fn split_into_sentences(&self, text: &str) -> Result<Vec<Unit>> {
        let sentences = split_sentences(text)
            .into_iter()
            .map(|sentence| self.measure(sentence))
            .collect::<Result<Vec<_>>>()?;
        self.pack(&sentences)
    }

    fn pack(&self, units: &[Unit]) -> Result<Vec<Unit>> {
        group_chunks(units, 0, self.max_tokens, JoinStyle::Paragraph)?
            .into_iter()
            .map(|group| self.measure(&group.text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::WordCounter;
    use pretty_assertions::assert_eq;

    fn splitter(max_tokens: usize) -> UnitSplitter<WordCounter> {
        UnitSplitter::new(WordCounter, max_tokens).unwrap()
    }

    fn texts(units: &[Unit]) -> Vec<&str> {
        units.iter().map(|u| u.text.as_str()).collect()
    }

    #[test]
    fn test_heading_cut_points() {
        let cuts = HeadingCuts::new(2).unwrap();
        let text = "intro\n## A\nbody\n### deeper\n## B\ntail";
        let points = cuts.cut_points(text);
        assert_eq!(points, vec![6, 27]);
        assert_eq!(cuts.next_level(), Some(3));
    }

    #[test]
    fn test_heading_requires_space_and_exact_level() {
        let cuts = HeadingCuts::new(1).unwrap();
        assert!(cuts.cut_points("#tag\n## sub\n").is_empty());
        assert_eq!(cuts.cut_points("# top\n"), vec![0]);
    }

    #[test]
    fn test_heading_on_last_line_is_ignored() {
        let cuts = HeadingCuts::new(1).unwrap();
        assert!(cuts.cut_points("text\n# trailing").is_empty());
    }

    #[test]
    fn test_list_cuts_prefer_first_list_kind() {
        let lists = ListCuts::new().unwrap();
        let text = "1. one\n2. two\n- bullet\n";
        assert_eq!(lists.cut_points(text), vec![0, 7]);

        let text = "intro\n- a\n- b\n1. n\n";
        assert_eq!(lists.cut_points(text), vec![6, 10]);
        assert_eq!(lists.next_level(), None);
    }

    #[test]
    fn test_cut_at_trims_and_drops_empty() {
        let text = "a\n\n# B\nb\n# C\n";
        assert_eq!(cut_at(text, &[3, 9]), vec!["a", "# B\nb", "# C"]);
        assert!(cut_at(text, &[]).is_empty());
    }

    #[test]
    fn test_two_top_level_headings() {
        let text = "# First\nalpha beta\n# Second\ngamma delta\n";
        let units = splitter(100).split_into_sections(text, Some(1)).unwrap();
        assert_eq!(
            texts(&units),
            vec!["# First\nalpha beta", "# Second\ngamma delta"]
        );
        assert_eq!(units[0].tokens, 4);
    }

    #[test]
    fn test_oversized_section_descends_a_level() {
        let text = "# Top\n## A\none two three\n## B\nfour five six\n";
        let units = splitter(6).split_into_sections(text, Some(1)).unwrap();
        assert_eq!(
            texts(&units),
            vec!["# Top", "## A\none two three", "## B\nfour five six"]
        );
        assert!(units.iter().all(|u| u.tokens <= 6));
    }

    #[test]
    fn test_heading_cuts_compiled_once_per_level() {
        let s = splitter(6);
        let text = "# Top\n## A\none two three\n## B\nfour five six\n";
        s.split_into_sections(text, Some(1)).unwrap();
        s.split_into_sections(text, Some(1)).unwrap();

        let mut levels: Vec<usize> = s.headings.lock().unwrap().keys().copied().collect();
        levels.sort_unstable();
        assert_eq!(levels, vec![1, 2]);

        let first = s.heading_cuts(2).unwrap();
        let again = s.heading_cuts(2).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_list_fallback_when_no_heading() {
        let text = "Shopping:\n- apples and pears\n- bread\n";
        let units = splitter(100).split_into_sections(text, Some(1)).unwrap();
        assert_eq!(
            texts(&units),
            vec!["Shopping:", "- apples and pears", "- bread"]
        );
    }

    #[test]
    fn test_paragraph_fallback_without_headings_or_lists() {
        let text = "one two\n\nthree four\nfive";
        let s = splitter(100);
        let by_sections = s.split_into_sections(text, Some(1)).unwrap();
        let by_none = s.split_into_sections(text, None).unwrap();
        let by_paragraphs = s.split_into_paragraphs(text).unwrap();
        assert_eq!(by_sections, by_paragraphs);
        assert_eq!(by_none, by_paragraphs);
        assert_eq!(texts(&by_paragraphs), vec!["one two three four five"]);
    }

    #[test]
    fn test_paragraphs_are_packed_under_ceiling() {
        let text = "a b c\nd e\nf g h i";
        let units = splitter(5).split_into_paragraphs(text).unwrap();
        assert_eq!(texts(&units), vec!["a b c d e", "f g h i"]);
    }

    #[test]
    fn test_long_paragraph_goes_to_sentences() {
        let text = "One two three. Four five six. Seven eight.";
        let units = splitter(4).split_into_paragraphs(text).unwrap();
        assert_eq!(
            texts(&units),
            vec!["One two three.", "Four five six.", "Seven eight."]
        );
    }

    #[test]
    fn test_sentences_are_packed() {
        let units = splitter(5)
            .split_into_sentences("A b. C d. E f g.")
            .unwrap();
        assert_eq!(texts(&units), vec!["A b. C d.", "E f g."]);
    }

    #[test]
    fn test_oversized_sentence_is_an_error() {
        let err = splitter(2)
            .split_into_sentences("one two three four.")
            .unwrap_err();
        assert!(matches!(err, ChunkerError::UnpackableUnit { index: 0, .. }));
    }

    #[test]
    fn test_empty_text() {
        let s = splitter(10);
        assert!(s.split_into_sections("", Some(1)).unwrap().is_empty());
        assert!(s.split_into_sections("  \n\n ", None).unwrap().is_empty());
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        assert!(UnitSplitter::new(WordCounter, 0).is_err());
    }
}

//! Sentence boundary heuristic.
//!
//! A boundary is a whitespace character that directly follows `.`, `?`, `!` or `:`, unless the
//! text before it looks like a dotted acronym (`e.g.`, `U.S.`) or a short capitalized
//! abbreviation preceded by whitespace or the start of the text:
//!
//! - one capital letter and the punctuation mark (`J.`, `A:`)
//! - a capital and a lowercase letter and a dot (`Mr.`, `Dr.`)
//! - a capital and two lowercase letters and a dot (`Mrs.`, `Col.`)
//!
//! The whitespace character at a boundary is consumed; pieces are trimmed and empty pieces
//! dropped.

const TERMINATORS: [char; 4] = ['.', '?', '!', ':'];

/// Split a paragraph into raw sentences, in order
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut pieces = Vec::new();
    let mut from = 0;

    for k in 1..chars.len() {
        let (byte, ch) = chars[k];
        if ch.is_whitespace() && is_boundary(&chars, k) {
            pieces.push(&text[from..byte]);
            from = byte + ch.len_utf8();
        }
    }
    pieces.push(&text[from..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Whether the whitespace at char index `k` ends a sentence
fn is_boundary(chars: &[(usize, char)], k: usize) -> bool {
    let back = |offset: usize| k.checked_sub(offset).map(|idx| chars[idx].1);

    if !back(1).is_some_and(|c| TERMINATORS.contains(&c)) {
        return false;
    }

    let dotted_acronym = back(4).is_some_and(is_word)
        && back(3) == Some('.')
        && back(2).is_some_and(is_word);
    if dotted_acronym {
        return false;
    }

    let single_letter = opens_word(back(3)) && back(2).is_some_and(|c| c.is_ascii_uppercase());
    let two_letters = opens_word(back(4))
        && back(3).is_some_and(|c| c.is_ascii_uppercase())
        && back(2).is_some_and(|c| c.is_ascii_lowercase())
        && back(1) == Some('.');
    let three_letters = opens_word(back(5))
        && back(4).is_some_and(|c| c.is_ascii_uppercase())
        && back(3).is_some_and(|c| c.is_ascii_lowercase())
        && back(2).is_some_and(|c| c.is_ascii_lowercase())
        && back(1) == Some('.');

    !(single_letter || two_letters || three_letters)
}

/// Start of text or whitespace
fn opens_word(c: Option<char>) -> bool {
    c.map_or(true, char::is_whitespace)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

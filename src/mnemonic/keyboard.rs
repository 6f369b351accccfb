//! Phrase keyboard - prefix filter over a sorted wordlist
//!
//! The on-screen keyboard only lets the user type letters that continue at
//! least one dictionary word, so a recovery phrase can never contain a typo.

use bip39::Language;
use std::collections::BTreeSet;

/// Letter rows as laid out on screen
pub const KEY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// The wide key at the end of the last row deletes
pub const BACKSPACE: &str = " ";

/// Suggestions shown above the keyboard
pub const MAX_SUGGESTIONS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct PhraseKeyboard {
    words: &'static [&'static str],
}

impl Default for PhraseKeyboard {
    fn default() -> Self { Self::english() }
}

impl PhraseKeyboard {
    pub fn english() -> Self {
        Self { words: Language::English.word_list() }
    }

    /// `words` must be sorted and lowercase.
    pub fn with_words(words: &'static [&'static str]) -> Self {
        debug_assert!(words.windows(2).all(|w| w[0] < w[1]), "wordlist must be sorted");
        Self { words }
    }

    pub fn words(&self) -> &'static [&'static str] { self.words }

    /// All words starting with `prefix`. Empty prefix yields the whole list.
    pub fn candidates(&self, prefix: &str) -> &'static [&'static str] {
        let start = self.words.partition_point(|w| *w < prefix);
        let len = self.words[start..].partition_point(|w| w.starts_with(prefix));
        &self.words[start..start + len]
    }

    /// Letters that continue at least one candidate.
    pub fn enabled_keys(&self, prefix: &str) -> BTreeSet<char> {
        if prefix.is_empty() {
            return ('a'..='z').collect();
        }
        self.candidates(prefix)
            .iter()
            .filter_map(|w| w[prefix.len()..].chars().next())
            .collect()
    }

    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.candidates(prefix)
            .iter()
            .take(limit)
            .map(|w| w.to_string())
            .collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.binary_search(&word).is_ok()
    }

    /// The only candidate for `prefix`, when the prefix already spells it.
    pub fn completed(&self, prefix: &str) -> Option<&'static str> {
        match self.candidates(prefix) {
            [only] if *only == prefix => Some(only),
            _ => None,
        }
    }
}

/// Splits pasted or scanned text into lowercase words.
///
/// Accepts whitespace or comma separated lists and numbered lists such as
/// `1. abandon 2. ability`.
pub fn normalize_phrase(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| {
            token
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')', ':'])
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

//! Mnemonic - Recovery phrase sizes, keyboard matching and validation

mod keyboard;

pub use keyboard::{normalize_phrase, PhraseKeyboard, BACKSPACE, KEY_ROWS, MAX_SUGGESTIONS};

use bip39::{Language, Mnemonic};
use serde::{Deserialize, Serialize};

/// Phrase lengths offered on the entry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecoveryPhraseSize {
    #[default]
    Twelve,
    TwentyFour,
    /// Legacy 24 words encrypted with a password
    TwentySeven,
}

impl RecoveryPhraseSize {
    pub const ALL: [RecoveryPhraseSize; 3] = [Self::Twelve, Self::TwentyFour, Self::TwentySeven];

    pub fn words(&self) -> usize {
        match self {
            Self::Twelve => 12,
            Self::TwentyFour => 24,
            Self::TwentySeven => 27,
        }
    }

    pub fn from_word_count(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.words() == count)
    }

    /// Smallest size that holds `count` words.
    pub fn fitting(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.words() >= count)
    }

    /// Words are laid out three per row.
    pub fn rows(&self) -> usize { self.words().div_ceil(3) }

    pub fn is_encrypted(&self) -> bool { matches!(self, Self::TwentySeven) }
}

pub trait MnemonicValidator: Send + Sync {
    fn is_valid(&self, words: &[String]) -> bool;
}

/// Checks BIP39 checksums for 12/24 words, wordlist membership for 27.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bip39Validator {
    keyboard: PhraseKeyboard,
}

impl MnemonicValidator for Bip39Validator {
    fn is_valid(&self, words: &[String]) -> bool {
        match RecoveryPhraseSize::from_word_count(words.len()) {
            Some(RecoveryPhraseSize::TwentySeven) => words.iter().all(|w| self.keyboard.contains(w)),
            Some(_) => Mnemonic::parse_in_normalized(Language::English, &words.join(" ")).is_ok(),
            None => false,
        }
    }
}

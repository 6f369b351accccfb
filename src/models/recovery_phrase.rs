//! EnterRecoveryPhraseViewModel - restore a wallet from its recovery phrase
//!
//! The phrase is typed on a restricted keyboard: only letters that continue a
//! wordlist entry are enabled and a word is committed by tapping one of the
//! suggestions, so there is no free-text advancement past an unknown word.
//! Pasting or scanning fills the whole phrase at once.

use crate::mnemonic::{
    normalize_phrase, Bip39Validator, MnemonicValidator, PhraseKeyboard, RecoveryPhraseSize, BACKSPACE,
    MAX_SUGGESTIONS,
};
use crate::models::{Secret, SideEffect, ViewModel, ViewModelBase};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;

pub const HINT_NO_MATCHING_WORDS: &str = "id_no_matching_words";
pub const HINT_UNKNOWN_WORD: &str = "id_unknown_word_s";

#[derive(Debug, Clone)]
pub enum RecoveryPhraseEvent {
    /// A letter, [`BACKSPACE`], or a suggested word
    KeyAction(String),
    SetActiveWord(usize),
    /// Clipboard or QR text
    SetRecoveryPhrase(String),
    SetRecoveryPhraseSize(RecoveryPhraseSize),
    MnemonicEncryptionPassword(Secret),
    LaunchHelp,
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryPhraseState {
    pub recovery_phrase: Vec<String>,
    pub recovery_phrase_size: RecoveryPhraseSize,
    /// Word being edited; `None` once every slot is filled and nothing is selected
    pub active_word: Option<usize>,
    pub rows: usize,
    pub matched_words: Vec<String>,
    pub enabled_keys: BTreeSet<char>,
    pub hint_message: String,
    pub is_recovery_phrase_valid: bool,
    pub show_invalid_mnemonic_error: bool,
    pub show_type_next_word_hint: bool,
    pub show_input_buttons: bool,
}

impl RecoveryPhraseState {
    fn empty(size: RecoveryPhraseSize) -> Self {
        Self {
            recovery_phrase: Vec::new(),
            recovery_phrase_size: size,
            active_word: Some(0),
            rows: size.rows(),
            matched_words: Vec::new(),
            enabled_keys: BTreeSet::new(),
            hint_message: String::new(),
            is_recovery_phrase_valid: false,
            show_invalid_mnemonic_error: false,
            show_type_next_word_hint: false,
            show_input_buttons: true,
        }
    }

    /// Text of the active word ("" for a fresh slot)
    pub fn active_text(&self) -> &str {
        self.active_word
            .and_then(|i| self.recovery_phrase.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn is_complete(&self) -> bool {
        self.recovery_phrase.len() == self.recovery_phrase_size.words()
            && self.recovery_phrase.iter().all(|w| !w.is_empty())
    }

    /// First empty word, else the slot after the last word, else none.
    fn next_free(&self) -> Option<usize> {
        let len = self.recovery_phrase.len();
        self.recovery_phrase
            .iter()
            .position(String::is_empty)
            .or_else(|| (len < self.recovery_phrase_size.words()).then_some(len))
    }

    fn write_active(&mut self, text: String) {
        let Some(i) = self.active_word else { return };
        if i < self.recovery_phrase.len() {
            self.recovery_phrase[i] = text;
        } else if !text.is_empty() {
            self.recovery_phrase.push(text);
        }
    }

    /// Drops the word at `i` if it is empty and last, so the phrase never ends in a gap.
    fn trim_tail(&mut self, i: usize) {
        if i + 1 == self.recovery_phrase.len() && self.recovery_phrase[i].is_empty() {
            self.recovery_phrase.pop();
        }
    }
}

pub struct EnterRecoveryPhraseViewModel {
    base: ViewModelBase,
    keyboard: PhraseKeyboard,
    validator: Box<dyn MnemonicValidator>,
    state: watch::Sender<RecoveryPhraseState>,
}

impl EnterRecoveryPhraseViewModel {
    pub fn new() -> Arc<Self> {
        Self::with_validator(PhraseKeyboard::english(), Box::new(Bip39Validator::default()))
    }

    pub fn with_validator(keyboard: PhraseKeyboard, validator: Box<dyn MnemonicValidator>) -> Arc<Self> {
        let vm = Self {
            base: ViewModelBase::new("EnterRecoveryPhrase"),
            keyboard,
            validator,
            state: watch::channel(RecoveryPhraseState::empty(RecoveryPhraseSize::default())).0,
        };
        vm.state.send_modify(|s| vm.derive(s));
        Arc::new(vm)
    }

    pub fn state(&self) -> watch::Receiver<RecoveryPhraseState> { self.state.subscribe() }

    pub fn current(&self) -> RecoveryPhraseState { self.state.borrow().clone() }

    fn update(&self, f: impl FnOnce(&mut RecoveryPhraseState, &PhraseKeyboard)) {
        self.state.send_modify(|s| {
            f(s, &self.keyboard);
            self.derive(s);
        });
    }

    fn key_action(&self, key: &str) {
        if key == BACKSPACE {
            self.update(backspace);
        } else if key.chars().count() == 1 {
            if let Some(letter) = key.chars().next() {
                self.update(|s, kb| type_letter(s, kb, letter.to_ascii_lowercase()));
            }
        } else {
            self.update(|s, kb| commit_word(s, kb, key));
        }
    }

    fn set_active_word(&self, index: usize) {
        self.update(|s, _| {
            let len = s.recovery_phrase.len();
            if index < len || (index == len && index < s.recovery_phrase_size.words()) {
                s.active_word = Some(index);
            }
        });
    }

    fn set_recovery_phrase(&self, text: &str) {
        let words = normalize_phrase(text);
        if words.is_empty() {
            return;
        }
        let Some(size) = RecoveryPhraseSize::fitting(words.len()) else {
            tracing::info!(words = words.len(), "pasted phrase too long");
            self.base.post_side_effect(SideEffect::Snackbar("id_invalid_mnemonic".into()));
            return;
        };
        self.update(|s, _| {
            s.recovery_phrase = words;
            s.recovery_phrase_size = size;
            s.active_word = s.next_free();
        });
    }

    fn set_size(&self, size: RecoveryPhraseSize) {
        self.update(|s, _| {
            s.recovery_phrase_size = size;
            s.recovery_phrase.truncate(size.words());
            s.active_word = s.next_free();
        });
    }

    fn phrase_ready(&self, password: Option<Secret>) {
        let state = self.current();
        if !state.is_recovery_phrase_valid {
            return;
        }
        if state.recovery_phrase_size.is_encrypted() && password.is_none() {
            self.base.post_side_effect(SideEffect::RequestMnemonicPassword);
            return;
        }
        let mnemonic = Secret::new(state.recovery_phrase.join(" "));
        self.base.post_side_effect(SideEffect::RecoveryPhraseReady { mnemonic, password });
    }

    fn derive(&self, s: &mut RecoveryPhraseState) {
        let text = s.active_text().to_string();
        let has_candidates = !self.keyboard.candidates(&text).is_empty();

        s.rows = s.recovery_phrase_size.rows();
        s.matched_words = self.keyboard.suggestions(&text, MAX_SUGGESTIONS);
        s.enabled_keys = if s.active_word.is_some() { self.keyboard.enabled_keys(&text) } else { BTreeSet::new() };
        s.hint_message = if !has_candidates {
            HINT_NO_MATCHING_WORDS.to_string()
        } else if let Some(w) = s.recovery_phrase.iter().find(|w| !w.is_empty() && !self.keyboard.contains(w)) {
            format!("{HINT_UNKNOWN_WORD}|{w}")
        } else {
            String::new()
        };

        let complete = s.is_complete();
        s.is_recovery_phrase_valid = complete && self.validator.is_valid(&s.recovery_phrase);
        s.show_invalid_mnemonic_error = complete && !s.is_recovery_phrase_valid;
        s.show_type_next_word_hint = !s.recovery_phrase.is_empty() && !complete && text.is_empty();
        s.show_input_buttons = s.recovery_phrase.is_empty();
    }
}

fn type_letter(s: &mut RecoveryPhraseState, kb: &PhraseKeyboard, letter: char) {
    if s.active_word.is_none() {
        return;
    }
    let text = format!("{}{letter}", s.active_text());
    // Disabled key
    if kb.candidates(&text).is_empty() {
        return;
    }
    s.write_active(text.clone());
    if let Some(word) = kb.completed(&text) {
        commit_word(s, kb, word);
    }
}

fn commit_word(s: &mut RecoveryPhraseState, kb: &PhraseKeyboard, word: &str) {
    if s.active_word.is_none() || !kb.contains(word) || !word.starts_with(s.active_text()) {
        return;
    }
    s.write_active(word.to_string());
    s.active_word = s.next_free();
}

fn backspace(s: &mut RecoveryPhraseState, _: &PhraseKeyboard) {
    // An empty slot deletes into the previous word.
    let target = match s.active_word {
        None => match s.recovery_phrase.len().checked_sub(1) {
            Some(last) => last,
            None => return,
        },
        Some(i) if s.active_text().is_empty() => match i.checked_sub(1) {
            Some(prev) => prev,
            None => return,
        },
        Some(i) => i,
    };
    s.active_word = Some(target);
    if let Some(word) = s.recovery_phrase.get_mut(target) {
        word.pop();
    }
    s.trim_tail(target);
}

#[async_trait]
impl ViewModel for EnterRecoveryPhraseViewModel {
    type Event = RecoveryPhraseEvent;

    fn base(&self) -> &ViewModelBase { &self.base }

    async fn handle_event(&self, event: RecoveryPhraseEvent) {
        match event {
            RecoveryPhraseEvent::KeyAction(key) => self.key_action(&key),
            RecoveryPhraseEvent::SetActiveWord(index) => self.set_active_word(index),
            RecoveryPhraseEvent::SetRecoveryPhrase(text) => self.set_recovery_phrase(&text),
            RecoveryPhraseEvent::SetRecoveryPhraseSize(size) => self.set_size(size),
            RecoveryPhraseEvent::MnemonicEncryptionPassword(password) => self.phrase_ready(Some(password)),
            RecoveryPhraseEvent::LaunchHelp => self.base.post_side_effect(SideEffect::LaunchHelp),
            RecoveryPhraseEvent::Continue => self.phrase_ready(None),
        }
    }
}

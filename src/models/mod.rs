//! Models - per-screen state holders
//!
//! Each view-model owns one `watch` state container (read by the UI), a
//! `broadcast` side-effect channel, and a scope for its background tasks.
//!
//! | View-model | Screen | Events |
//! |------------|--------|--------|
//! | `EnterRecoveryPhraseViewModel` | restore from phrase | keys, paste/scan, size, continue |
//! | `RecoverFundsViewModel` | Lightning sweep / swap refund | address, fee tier, custom fee, continue |
//! | `WatchOnlyViewModel` | watch-only settings | refresh, copied |
//!
//! Events are applied with `handle_event(..).await`, or queued through
//! `spawn_event_loop`, whose single task is then the only writer of the state.

mod base;
mod recover_funds;
mod recovery_phrase;
mod watch_only;

pub use base::{spawn_event_loop, EventSender, Secret, SideEffect, ViewModel, ViewModelBase};
pub use recover_funds::{RecoverFundsEvent, RecoverFundsState, RecoverFundsViewModel};
pub use recovery_phrase::{
    EnterRecoveryPhraseViewModel, RecoveryPhraseEvent, RecoveryPhraseState, HINT_NO_MATCHING_WORDS,
    HINT_UNKNOWN_WORD,
};
pub use watch_only::{WatchOnlyEvent, WatchOnlyLook, WatchOnlyState, WatchOnlyViewModel};

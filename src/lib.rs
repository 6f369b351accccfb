//! Satchel: wallet screen logic shared by every front end.
//!
//! # Architecture
//!
//! ```text
//! Host app (Android / iOS / desktop / CLI)
//!   │
//!   ├── implements WalletSession + LightningSdk (session)
//!   │
//!   └── drives view-models (models), one per screen
//!         ├── EnterRecoveryPhraseViewModel ── mnemonic (BIP39 keyboard, sizes, validation)
//!         ├── RecoverFundsViewModel ───────── fees + amount (tiers, clamping, formatting)
//!         └── WatchOnlyViewModel ──────────── keys (xpub, descriptors)
//! ```
//!
//! Every view-model exposes:
//!
//! | Output | Type | Description |
//! |--------|------|-------------|
//! | state | `watch::Receiver<State>` | Latest screen state |
//! | side effects | `broadcast::Receiver<SideEffect>` | Snackbars, dialogs, navigation |
//! | progress | `watch::Receiver<bool>` | A backend call is running |
//!
//! # Features
//!
//! - `native` - log subscriber and platform data dirs (CLI, mobile FFI)
//!
//! # Usage
//!
//! ```ignore
//! use satchel::models::{EnterRecoveryPhraseViewModel, RecoveryPhraseEvent};
//! use satchel::ViewModel;
//!
//! let vm = EnterRecoveryPhraseViewModel::new();
//! vm.handle_event(RecoveryPhraseEvent::KeyAction("a".into())).await;
//! let keys = vm.current().enabled_keys;
//! ```

pub mod amount;
pub mod config;
pub mod error;
pub mod fees;
pub mod keys;
#[cfg(feature = "native")]
pub mod logging;
pub mod mnemonic;
pub mod models;
pub mod runtime;
pub mod session;
pub mod twofactor;

pub use amount::{to_amount_look, Denomination, Settings};
pub use config::{AppConfig, AppKeys};
pub use error::{ErrorReport, Result, WalletError};
pub use fees::{FeeSelection, FeeTier, RecommendedFees};
pub use keys::SinglesigKeys;
pub use mnemonic::{Bip39Validator, MnemonicValidator, PhraseKeyboard, RecoveryPhraseSize};
pub use models::{spawn_event_loop, EventSender, Secret, SideEffect, ViewModel, ViewModelBase};
pub use runtime::ViewModelScope;
pub use session::{Account, LightningSdk, Network, WalletSession};
pub use twofactor::{CodeResolver, PromptCodeResolver, TwoFactorMethod};

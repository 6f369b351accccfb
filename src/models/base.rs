//! Shared plumbing of every screen: side effects, progress, error reporting,
//! and the event loop that makes a view-model the single writer of its state.

use crate::error::{ErrorReport, Result, WalletError};
use crate::runtime::ViewModelScope;
use crate::twofactor::TwoFactorMethod;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use zeroize::Zeroizing;

const SIDE_EFFECT_CAPACITY: usize = 32;

/// Secret text (mnemonics, passwords). Wiped on drop, hidden from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self { Self(Zeroizing::new(value.into())) }
    pub fn expose(&self) -> &str { self.0.as_str() }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// One-shot instructions for the UI
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// String id, optionally `id|arg`
    Snackbar(String),
    ErrorDialog { error: String, report: Option<ErrorReport> },
    Success,
    Dismiss,
    LaunchHelp,
    RequestMnemonicPassword,
    RecoveryPhraseReady { mnemonic: Secret, password: Option<Secret> },
    TwoFactorCode { method: TwoFactorMethod, attempts_remaining: u32 },
}

pub struct ViewModelBase {
    screen_name: String,
    side_effects: broadcast::Sender<SideEffect>,
    on_progress: watch::Sender<bool>,
    scope: ViewModelScope,
}

impl ViewModelBase {
    pub fn new(screen_name: impl Into<String>) -> Self {
        let (side_effects, _) = broadcast::channel(SIDE_EFFECT_CAPACITY);
        let (on_progress, _) = watch::channel(false);
        Self { screen_name: screen_name.into(), side_effects, on_progress, scope: ViewModelScope::new() }
    }

    pub fn screen_name(&self) -> &str { &self.screen_name }

    pub fn scope(&self) -> &ViewModelScope { &self.scope }

    pub fn side_effects(&self) -> broadcast::Receiver<SideEffect> { self.side_effects.subscribe() }

    pub(crate) fn side_effect_sender(&self) -> broadcast::Sender<SideEffect> { self.side_effects.clone() }

    pub fn on_progress(&self) -> watch::Receiver<bool> { self.on_progress.subscribe() }

    pub fn post_side_effect(&self, effect: SideEffect) {
        tracing::debug!(screen = %self.screen_name, ?effect, "side effect");
        // Nobody listening is fine: the screen is gone.
        let _ = self.side_effects.send(effect);
    }

    /// Runs one backend call with the progress flag raised. Single attempt.
    pub async fn do_async<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.on_progress.send_replace(true);
        let result = call.await;
        self.on_progress.send_replace(false);
        if let Err(e) = &result {
            if e.is_user_error() {
                tracing::info!(screen = %self.screen_name, error = %e, "rejected");
            } else {
                tracing::warn!(screen = %self.screen_name, error = %e, "backend call failed");
            }
        }
        result
    }

    pub fn post_error(&self, error: &WalletError, network: Option<&str>) {
        let report = (!error.is_user_error()).then(|| ErrorReport::create(error, &self.screen_name, network));
        self.post_side_effect(SideEffect::ErrorDialog { error: error.message(), report });
    }
}

#[async_trait]
pub trait ViewModel: Send + Sync + 'static {
    type Event: Send + 'static;

    fn base(&self) -> &ViewModelBase;

    async fn handle_event(&self, event: Self::Event);

    fn screen_name(&self) -> &str { self.base().screen_name() }

    /// Ends the screen: stops its background tasks and its event loop.
    async fn close(&self) { self.base().scope().close().await }
}

/// Queue into a view-model's event loop
pub struct EventSender<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self { Self { tx: self.tx.clone() } }
}

impl<E> EventSender<E> {
    /// `false` once the screen is closed
    pub fn post_event(&self, event: E) -> bool { self.tx.send(event).is_ok() }
}

/// Drains events one at a time in the view-model's scope.
pub fn spawn_event_loop<V: ViewModel>(view_model: Arc<V>) -> EventSender<V::Event> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let scope = view_model.base().scope().clone();
    scope.launch(async move {
        while let Some(event) = rx.recv().await {
            view_model.handle_event(event).await;
        }
    });
    EventSender { tx }
}

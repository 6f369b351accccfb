//! Two-factor codes requested by the wallet SDK while signing or changing settings

use crate::models::{SideEffect, ViewModelBase};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Mutex;
use tokio::sync::{broadcast, oneshot};

pub const CODE_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TwoFactorMethod { Email, Sms, Gauth, Phone, Telegram }

impl TwoFactorMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TwoFactorMethod::Email => "email",
            TwoFactorMethod::Sms => "sms",
            TwoFactorMethod::Gauth => "gauth",
            TwoFactorMethod::Phone => "phone",
            TwoFactorMethod::Telegram => "telegram",
        }
    }
}

impl FromStr for TwoFactorMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(TwoFactorMethod::Email),
            "sms" => Ok(TwoFactorMethod::Sms),
            "gauth" => Ok(TwoFactorMethod::Gauth),
            "phone" | "call" => Ok(TwoFactorMethod::Phone),
            "telegram" => Ok(TwoFactorMethod::Telegram),
            other => Err(format!("unknown 2fa method: {other}")),
        }
    }
}

/// Asks the user for a 2FA code. `None` means cancelled.
#[async_trait]
pub trait CodeResolver: Send + Sync {
    async fn code(&self, method: TwoFactorMethod, attempts_remaining: u32) -> Option<String>;
    fn dismiss(&self);
}

/// Resolver backed by a screen: posts a `TwoFactorCode` side effect and waits
/// for [`submit`](Self::submit) or [`cancel`](Self::cancel).
pub struct PromptCodeResolver {
    side_effects: broadcast::Sender<SideEffect>,
    pending: Mutex<Option<oneshot::Sender<Option<String>>>>,
}

impl PromptCodeResolver {
    pub fn new(base: &ViewModelBase) -> Self {
        Self { side_effects: base.side_effect_sender(), pending: Mutex::new(None) }
    }

    pub fn is_valid_code(input: &str) -> bool {
        input.len() == CODE_LENGTH && input.bytes().all(|b| b.is_ascii_digit())
    }

    /// Returns `false` and keeps waiting when the input is not a full code.
    pub fn submit(&self, input: &str) -> bool {
        if !Self::is_valid_code(input) {
            return false;
        }
        let accepted = self.resolve(Some(input.to_string()));
        if accepted {
            tracing::debug!("2fa code submitted");
            self.dismiss();
        }
        accepted
    }

    pub fn cancel(&self) {
        tracing::debug!("2fa prompt cancelled");
        self.resolve(None);
    }

    fn resolve(&self, value: Option<String>) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|p| p.into_inner()).take();
        match pending {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl CodeResolver for PromptCodeResolver {
    async fn code(&self, method: TwoFactorMethod, attempts_remaining: u32) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        // A newer request replaces an unanswered one, which then resolves to None.
        *self.pending.lock().unwrap_or_else(|p| p.into_inner()) = Some(tx);
        tracing::debug!(method = method.as_str(), attempts_remaining, "2fa code requested");
        let _ = self.side_effects.send(SideEffect::TwoFactorCode { method, attempts_remaining });
        rx.await.unwrap_or(None)
    }

    fn dismiss(&self) {
        let _ = self.side_effects.send(SideEffect::Dismiss);
    }
}

//! Errors surfaced to screens.
//!
//! `Display` renders the string id the frontends translate, so an error can
//! be shown directly as a message.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("id_insufficient_funds")]
    InsufficientFunds { available: u64, fee: u64 },
    #[error("id_invalid_address")]
    InvalidAddress(String),
    #[error("id_invalid_mnemonic")]
    InvalidMnemonic,
    #[error("id_fee_rate_is_not_available")]
    FeesUnavailable,
    #[error("id_you_are_not_connected")]
    NotConnected,
    #[error("id_invalid_app_keys: {0}")]
    AppKeys(String),
    #[error("id_key_derivation_failed: {0}")]
    Derivation(String),
    /// Failure reported by the wallet or Lightning SDK
    #[error("{0}")]
    Sdk(#[from] anyhow::Error),
}

impl WalletError {
    /// Message shown to the user: the string id, or the SDK's own text.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Errors that come from user input rather than the backend
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            WalletError::InsufficientFunds { .. }
                | WalletError::InvalidAddress(_)
                | WalletError::InvalidMnemonic
        )
    }
}

/// Attached to error dialogs so the user can send the failure to support.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub screen: String,
    pub network: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
    pub fn create(error: &WalletError, screen: &str, network: Option<&str>) -> Self {
        Self {
            error: error.message(),
            screen: screen.to_string(),
            network: network.map(str::to_string),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

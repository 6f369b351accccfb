//! App configuration - passed in by the host application

use crate::error::{Result, WalletError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Build-time service keys, shipped as JSON (optionally base64-wrapped).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppKeys {
    pub breez_api_key: Option<String>,
    pub greenlight_key: Option<String>,
    pub greenlight_cert: Option<String>,
    pub zendesk_client_id: Option<String>,
}

impl AppKeys {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WalletError::AppKeys(format!("json: {e}")))
    }

    pub fn from_base64(value: &str) -> Result<Self> {
        let bytes = decode_base64(value.trim())?;
        let json = String::from_utf8(bytes).map_err(|e| WalletError::AppKeys(format!("utf8: {e}")))?;
        Self::from_json(&json)
    }

    /// Reads a keys file, plain JSON or base64 of it.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WalletError::AppKeys(format!("read {}: {e}", path.display())))?;
        if contents.trim_start().starts_with('{') {
            Self::from_json(&contents)
        } else {
            Self::from_base64(&contents)
        }
    }

    pub fn has_lightning(&self) -> bool {
        self.breez_api_key.is_some() && self.greenlight_key.is_some() && self.greenlight_cert.is_some()
    }
}

fn decode_base64(value: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| WalletError::AppKeys(format!("base64: {e}")))
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub is_debug: bool,
    pub data_dir: PathBuf,
    pub breez_api_key: Option<String>,
    pub greenlight_key: Option<String>,
    pub greenlight_cert: Option<String>,
    pub zendesk_client_id: Option<String>,
    pub analytics_feature_enabled: bool,
    pub lightning_feature_enabled: bool,
    pub store_rate_enabled: bool,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Default::default() }
    }
    pub fn with_debug(mut self, on: bool) -> Self { self.is_debug = on; self }
    pub fn with_keys(mut self, keys: AppKeys) -> Self {
        self.breez_api_key = keys.breez_api_key;
        self.greenlight_key = keys.greenlight_key;
        self.greenlight_cert = keys.greenlight_cert;
        self.zendesk_client_id = keys.zendesk_client_id;
        self
    }
    pub fn with_analytics(mut self, on: bool) -> Self { self.analytics_feature_enabled = on; self }
    pub fn with_lightning(mut self, on: bool) -> Self { self.lightning_feature_enabled = on; self }
    pub fn with_store_rate(mut self, on: bool) -> Self { self.store_rate_enabled = on; self }

    /// Lightning is only kept on when every Greenlight/Breez key is present.
    pub fn default_for(
        is_debug: bool,
        data_dir: impl Into<PathBuf>,
        app_keys: Option<AppKeys>,
        analytics_feature_enabled: bool,
        lightning_feature_enabled: bool,
        store_rate_enabled: bool,
    ) -> Self {
        let keys = app_keys.unwrap_or_default();
        let lightning = lightning_feature_enabled && keys.has_lightning();
        if lightning_feature_enabled && !lightning {
            tracing::info!("Lightning feature turned off: missing Greenlight or Breez keys");
        }
        Self::new(data_dir)
            .with_debug(is_debug)
            .with_keys(keys)
            .with_analytics(analytics_feature_enabled)
            .with_lightning(lightning)
            .with_store_rate(store_rate_enabled)
    }

    pub fn lightning_dir(&self) -> PathBuf { self.data_dir.join("lightning") }
}

/// `$SATCHEL_DATA_DIR`, else the platform's local data dir, joined with `app`.
pub fn default_data_dir(app: &str) -> PathBuf {
    let root = std::env::var("SATCHEL_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| platform_data_dir());
    root.join(app)
}

#[cfg(feature = "native")]
fn platform_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(not(feature = "native"))]
fn platform_data_dir() -> PathBuf {
    PathBuf::from(".")
}

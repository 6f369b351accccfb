//! Session - the wallet and Lightning SDKs, seen through traits
//!
//! Screens never build transactions or talk to servers themselves. Everything
//! goes through a [`WalletSession`] (accounts, addresses, settings) or a
//! [`LightningSdk`] (fee recommendations, sweep, swap refunds). Both are
//! provided by the host application; failures come back as `anyhow::Error`
//! and are turned into [`crate::WalletError::Sdk`] at the view-model boundary.

mod types;

pub use types::{
    Account, AccountType, Chain, MultisigWatchOnly, Network, Policy, PrepareRefundResponse,
    PrepareSweepResponse, ReceiveAddress, RefundResponse, SweepResponse,
};

use crate::amount::Settings;
use crate::fees::RecommendedFees;
use async_trait::async_trait;
use tokio::sync::watch;

#[async_trait]
pub trait WalletSession: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Accounts of the logged in wallet; updates as accounts are added or archived.
    fn accounts(&self) -> watch::Receiver<Vec<Account>>;

    /// Detailed account (extended pubkey, output descriptors).
    async fn get_account(&self, account: &Account) -> anyhow::Result<Account>;

    async fn get_receive_address(&self, account: &Account) -> anyhow::Result<ReceiveAddress>;

    fn active_multisig(&self) -> Vec<Network>;
    fn active_singlesig(&self) -> Vec<Network>;

    fn bitcoin_multisig(&self) -> Option<Network>;
    fn liquid_multisig(&self) -> Option<Network>;

    /// Multisig watch-only usernames, when set
    fn multisig_watch_only(&self) -> watch::Receiver<MultisigWatchOnly>;

    fn settings(&self) -> Settings;

    /// Network used to validate manually typed on-chain addresses
    fn bitcoin_network(&self) -> bitcoin::Network;

    /// Network of the Lightning node, for error reports
    fn lightning_network(&self) -> Option<Network>;
}

#[async_trait]
pub trait LightningSdk: Send + Sync {
    async fn recommended_fees(&self) -> anyhow::Result<RecommendedFees>;

    async fn prepare_sweep(&self, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<PrepareSweepResponse>;
    async fn sweep(&self, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<SweepResponse>;

    async fn prepare_refund(&self, swap_address: &str, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<PrepareRefundResponse>;
    async fn refund(&self, swap_address: &str, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<RefundResponse>;
}

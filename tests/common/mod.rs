//! Shared test doubles: an in-memory wallet session and Lightning SDK.
#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use satchel::amount::Settings;
use satchel::fees::RecommendedFees;
use satchel::session::{
    Account, AccountType, Chain, LightningSdk, MultisigWatchOnly, Network, Policy, PrepareRefundResponse,
    PrepareSweepResponse, ReceiveAddress, RefundResponse, SweepResponse, WalletSession,
};
use std::sync::Mutex;
use tokio::sync::watch;

// Test mnemonic (well-known, never use with real funds)
pub const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// BIP84 receive address 0 of the test mnemonic (mainnet)
pub const MAINNET_ADDRESS: &str = "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu";
pub const TESTNET_ADDRESS: &str = "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx";

pub fn bitcoin_singlesig() -> Network {
    Network::new("mainnet", "Bitcoin", Chain::Bitcoin, Policy::Singlesig, true)
}

pub fn bitcoin_multisig() -> Network {
    Network::new("electrum-mainnet", "Bitcoin Multisig", Chain::Bitcoin, Policy::Multisig, true)
}

pub fn liquid_multisig() -> Network {
    Network::new("liquid", "Liquid Multisig", Chain::Liquid, Policy::Multisig, true)
}

pub fn lightning() -> Network {
    Network::new("lightning-mainnet", "Lightning", Chain::Bitcoin, Policy::Lightning, true)
}

pub fn segwit_account(pointer: u32) -> Account {
    Account::new(pointer, format!("Account {pointer}"), bitcoin_singlesig(), AccountType::P2wpkh)
}

pub fn lightning_account() -> Account {
    Account::new(0, "Instant", lightning(), AccountType::Lightning)
}

pub fn liquid_account() -> Account {
    Account::new(0, "Liquid", liquid_multisig(), AccountType::Multisig)
}

pub fn fees() -> RecommendedFees {
    RecommendedFees { fastest_fee: 40, half_hour_fee: 30, hour_fee: 20, economy_fee: 10, minimum_fee: 5 }
}

pub struct MockSession {
    pub connected: Mutex<bool>,
    pub accounts: watch::Sender<Vec<Account>>,
    pub multisig_watch_only: watch::Sender<MultisigWatchOnly>,
    pub settings: Mutex<Settings>,
    pub multisig_networks: Vec<Network>,
    pub singlesig_networks: Vec<Network>,
    /// Account ids whose detail lookup fails
    pub broken_accounts: Mutex<Vec<String>>,
}

impl MockSession {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            connected: Mutex::new(true),
            accounts: watch::channel(accounts).0,
            multisig_watch_only: watch::channel(MultisigWatchOnly::default()).0,
            settings: Mutex::new(Settings::default()),
            multisig_networks: Vec::new(),
            singlesig_networks: vec![bitcoin_singlesig()],
            broken_accounts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_multisig(mut self) -> Self {
        self.multisig_networks = vec![bitcoin_multisig(), liquid_multisig()];
        self
    }

    pub fn set_connected(&self, connected: bool) {
        *self.connected.lock().unwrap() = connected;
    }

    pub fn set_accounts(&self, accounts: Vec<Account>) {
        self.accounts.send_replace(accounts);
    }

    pub fn set_exchange_rate(&self, rate: f64) {
        self.settings.lock().unwrap().exchange_rate = Some(rate);
    }
}

#[async_trait]
impl WalletSession for MockSession {
    fn is_connected(&self) -> bool { *self.connected.lock().unwrap() }

    fn accounts(&self) -> watch::Receiver<Vec<Account>> { self.accounts.subscribe() }

    async fn get_account(&self, account: &Account) -> anyhow::Result<Account> {
        if self.broken_accounts.lock().unwrap().contains(&account.id()) {
            return Err(anyhow!("account {} unavailable", account.id()));
        }
        let mut detailed = account.clone();
        detailed.extended_pubkey = Some(format!("xpub-{}", account.pointer));
        detailed.output_descriptors = Some(format!("wpkh(xpub-{}/0/*)", account.pointer));
        Ok(detailed)
    }

    async fn get_receive_address(&self, _account: &Account) -> anyhow::Result<ReceiveAddress> {
        Ok(ReceiveAddress { address: MAINNET_ADDRESS.into(), pointer: 0 })
    }

    fn active_multisig(&self) -> Vec<Network> { self.multisig_networks.clone() }

    fn active_singlesig(&self) -> Vec<Network> { self.singlesig_networks.clone() }

    fn bitcoin_multisig(&self) -> Option<Network> {
        self.multisig_networks.iter().find(|n| n.is_bitcoin()).cloned()
    }

    fn liquid_multisig(&self) -> Option<Network> {
        self.multisig_networks.iter().find(|n| !n.is_bitcoin()).cloned()
    }

    fn multisig_watch_only(&self) -> watch::Receiver<MultisigWatchOnly> { self.multisig_watch_only.subscribe() }

    fn settings(&self) -> Settings { self.settings.lock().unwrap().clone() }

    fn bitcoin_network(&self) -> bitcoin::Network { bitcoin::Network::Bitcoin }

    fn lightning_network(&self) -> Option<Network> { Some(lightning()) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightningCall {
    PrepareSweep { to: String, rate: Option<u32> },
    Sweep { to: String, rate: Option<u32> },
    PrepareRefund { swap: String, to: String, rate: Option<u32> },
    Refund { swap: String, to: String, rate: Option<u32> },
}

pub struct MockLightning {
    pub fees: Mutex<Option<RecommendedFees>>,
    /// Fee quoted by prepare calls, per sat/vB of the requested rate
    pub fee_per_vbyte: u64,
    pub fail_with: Mutex<Option<String>>,
    pub calls: Mutex<Vec<LightningCall>>,
}

impl MockLightning {
    pub fn new(fee_per_vbyte: u64) -> Self {
        Self { fees: Mutex::new(Some(fees())), fee_per_vbyte, fail_with: Mutex::new(None), calls: Mutex::new(Vec::new()) }
    }

    pub fn without_fees(self) -> Self {
        *self.fees.lock().unwrap() = None;
        self
    }

    pub fn fail(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<LightningCall> { self.calls.lock().unwrap().clone() }

    fn check(&self) -> anyhow::Result<()> {
        match self.fail_with.lock().unwrap().clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        }
    }

    fn quote(&self, rate: Option<u32>) -> u64 {
        self.fee_per_vbyte.saturating_mul(u64::from(rate.unwrap_or(1)))
    }
}

#[async_trait]
impl LightningSdk for MockLightning {
    async fn recommended_fees(&self) -> anyhow::Result<RecommendedFees> {
        self.fees.lock().unwrap().ok_or_else(|| anyhow!("mempool unreachable"))
    }

    async fn prepare_sweep(&self, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<PrepareSweepResponse> {
        self.calls.lock().unwrap().push(LightningCall::PrepareSweep { to: to_address.into(), rate: sat_per_vbyte });
        self.check()?;
        Ok(PrepareSweepResponse { sweep_tx_weight: 440, sweep_tx_fee_sat: self.quote(sat_per_vbyte) })
    }

    async fn sweep(&self, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<SweepResponse> {
        self.calls.lock().unwrap().push(LightningCall::Sweep { to: to_address.into(), rate: sat_per_vbyte });
        self.check()?;
        Ok(SweepResponse { txid: "sweep-txid".into() })
    }

    async fn prepare_refund(&self, swap_address: &str, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<PrepareRefundResponse> {
        self.calls.lock().unwrap().push(LightningCall::PrepareRefund {
            swap: swap_address.into(),
            to: to_address.into(),
            rate: sat_per_vbyte,
        });
        self.check()?;
        Ok(PrepareRefundResponse { refund_tx_weight: 560, refund_tx_fee_sat: self.quote(sat_per_vbyte) })
    }

    async fn refund(&self, swap_address: &str, to_address: &str, sat_per_vbyte: Option<u32>) -> anyhow::Result<RefundResponse> {
        self.calls.lock().unwrap().push(LightningCall::Refund {
            swap: swap_address.into(),
            to: to_address.into(),
            rate: sat_per_vbyte,
        });
        self.check()?;
        Ok(RefundResponse { refund_tx_id: "refund-txid".into() })
    }
}

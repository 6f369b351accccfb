use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain { Bitcoin, Liquid }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy { Singlesig, Multisig, Lightning }

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub chain: Chain,
    pub policy: Policy,
    pub mainnet: bool,
}

impl Network {
    pub fn new(id: impl Into<String>, name: impl Into<String>, chain: Chain, policy: Policy, mainnet: bool) -> Self {
        Self { id: id.into(), name: name.into(), chain, policy, mainnet }
    }

    pub fn is_bitcoin(&self) -> bool { self.chain == Chain::Bitcoin }
    pub fn is_lightning(&self) -> bool { self.policy == Policy::Lightning }
    pub fn is_singlesig(&self) -> bool { self.policy == Policy::Singlesig }
    pub fn is_multisig(&self) -> bool { self.policy == Policy::Multisig }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// BIP44 legacy
    P2pkh,
    /// BIP49 wrapped segwit
    P2shP2wpkh,
    /// BIP84 native segwit
    P2wpkh,
    /// BIP86 taproot
    P2tr,
    /// Green 2of2 / 2of3
    Multisig,
    Lightning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub pointer: u32,
    pub name: String,
    pub network: Network,
    pub account_type: AccountType,
    /// Only on detailed accounts
    pub extended_pubkey: Option<String>,
    /// Only on detailed accounts
    pub output_descriptors: Option<String>,
}

impl Account {
    pub fn new(pointer: u32, name: impl Into<String>, network: Network, account_type: AccountType) -> Self {
        Self { pointer, name: name.into(), network, account_type, extended_pubkey: None, output_descriptors: None }
    }

    /// Stable id across networks
    pub fn id(&self) -> String { format!("{}:{}", self.network.id, self.pointer) }

    pub fn is_bitcoin(&self) -> bool { self.network.is_bitcoin() }
    pub fn is_lightning(&self) -> bool { self.network.is_lightning() }
    pub fn is_singlesig(&self) -> bool { self.network.is_singlesig() }
    pub fn is_multisig(&self) -> bool { self.network.is_multisig() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveAddress {
    pub address: String,
    pub pointer: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultisigWatchOnly {
    pub bitcoin: Option<String>,
    pub liquid: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareSweepResponse {
    pub sweep_tx_weight: u64,
    pub sweep_tx_fee_sat: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResponse {
    pub txid: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareRefundResponse {
    pub refund_tx_weight: u32,
    pub refund_tx_fee_sat: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResponse {
    pub refund_tx_id: String,
}

//! Singlesig watch-only keys - account xpub and output descriptors from a mnemonic
//!
//! Software wallets export the same material a hardware wallet would: the
//! account-level extended public key and the receive/change descriptors,
//! with key origin and BIP380 checksum.
//!
//! | Script | Purpose | Descriptor |
//! |--------|---------|------------|
//! | P2pkh | 44' | `pkh(..)` |
//! | P2shP2wpkh | 49' | `sh(wpkh(..))` |
//! | P2wpkh | 84' | `wpkh(..)` |
//! | P2tr | 86' | `tr(..)` |
//!
//! Reference: https://bips.xyz/380

use crate::error::{Result, WalletError};
use crate::session::AccountType;
use bdk_wallet::descriptor::{calc_checksum, ExtendedDescriptor};
use bdk_wallet::miniscript::descriptor::{DescriptorPublicKey, DescriptorXKey, Wildcard};
use bdk_wallet::miniscript::Descriptor;
use bip39::{Language, Mnemonic};
use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv, Xpub};
use bitcoin::secp256k1::Secp256k1;
use serde::Serialize;
use std::str::FromStr;
use zeroize::Zeroizing;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinglesigKeys {
    /// Master key fingerprint, lowercase hex
    pub fingerprint: String,
    /// Account path, e.g. `m/84'/0'/0'`
    pub path: String,
    pub xpub: String,
    /// Receive (`/0/*`) then change (`/1/*`)
    pub descriptors: Vec<String>,
}

pub fn purpose(account_type: AccountType) -> Option<u32> {
    match account_type {
        AccountType::P2pkh => Some(44),
        AccountType::P2shP2wpkh => Some(49),
        AccountType::P2wpkh => Some(84),
        AccountType::P2tr => Some(86),
        AccountType::Multisig | AccountType::Lightning => None,
    }
}

impl SinglesigKeys {
    pub fn derive(
        mnemonic: &str,
        passphrase: Option<&str>,
        network: bitcoin::Network,
        account_type: AccountType,
        account: u32,
    ) -> Result<Self> {
        let purpose = purpose(account_type)
            .ok_or_else(|| WalletError::Derivation(format!("{account_type:?} has no singlesig path")))?;
        let coin_type = if network == bitcoin::Network::Bitcoin { 0 } else { 1 };

        let mnemonic = Mnemonic::parse_in_normalized(Language::English, mnemonic)
            .map_err(|_| WalletError::InvalidMnemonic)?;
        let seed = Zeroizing::new(mnemonic.to_seed(passphrase.unwrap_or("")));

        let secp = Secp256k1::new();
        let master = Xpriv::new_master(network, &seed[..])
            .map_err(|e| WalletError::Derivation(e.to_string()))?;
        let fingerprint = master.fingerprint(&secp);

        let path = [purpose, coin_type, account]
            .into_iter()
            .map(ChildNumber::from_hardened_idx)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(DerivationPath::from)
            .map_err(|e| WalletError::Derivation(e.to_string()))?;
        let account_key = master
            .derive_priv(&secp, &path)
            .map_err(|e| WalletError::Derivation(e.to_string()))?;
        let xpub = Xpub::from_priv(&secp, &account_key);

        let descriptors = [0, 1]
            .into_iter()
            .map(|chain| {
                let key = DescriptorPublicKey::XPub(DescriptorXKey {
                    origin: Some((fingerprint, path.clone())),
                    xkey: xpub,
                    derivation_path: DerivationPath::from_str(&format!("m/{chain}"))
                        .map_err(|e| WalletError::Derivation(e.to_string()))?,
                    wildcard: Wildcard::Unhardened,
                });
                Ok(descriptor(account_type, key)?.to_string())
            })
            .collect::<Result<Vec<_>>>()?;

        let path = format!("m/{}", path.to_string().trim_start_matches("m/"));
        tracing::debug!(%fingerprint, %path, "derived account keys");
        Ok(Self { fingerprint: fingerprint.to_string(), path, xpub: xpub.to_string(), descriptors })
    }
}

/// Single-key descriptor for `account_type`; `Display` appends the checksum.
fn descriptor(account_type: AccountType, key: DescriptorPublicKey) -> Result<ExtendedDescriptor> {
    let descriptor = match account_type {
        AccountType::P2pkh => Descriptor::new_pkh(key),
        AccountType::P2shP2wpkh => Descriptor::new_sh_wpkh(key),
        AccountType::P2tr => Descriptor::new_tr(key, None),
        _ => Descriptor::new_wpkh(key),
    };
    descriptor.map_err(|e| WalletError::Derivation(e.to_string()))
}

/// Eight-character BIP380 checksum of a descriptor without `#`.
pub fn descriptor_checksum(descriptor: &str) -> Result<String> {
    calc_checksum(descriptor).map_err(|e| WalletError::Derivation(e.to_string()))
}

pub fn with_checksum(descriptor: &str) -> Result<String> {
    Ok(format!("{descriptor}#{}", descriptor_checksum(descriptor)?))
}

/// True when `descriptor` ends in `#` and its correct checksum.
pub fn has_valid_checksum(descriptor: &str) -> bool {
    match descriptor.rsplit_once('#') {
        Some((body, checksum)) => descriptor_checksum(body).map(|c| c == checksum).unwrap_or(false),
        None => false,
    }
}

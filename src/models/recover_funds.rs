//! RecoverFundsViewModel - Lightning sweep and on-chain swap refund
//!
//! A swap address makes this a refund of a failed swap; without one it sweeps
//! the Lightning node's on-chain balance. Either way the user picks a
//! destination (a Bitcoin account of the wallet or a typed address) and a fee
//! tier, and the screen shows what will arrive after fees.
//!
//! ```text
//! fee tier / custom fee / recommended fees / address
//!     │
//!     ▼
//! prepare_refund | prepare_sweep  (SDK quote)
//!     │
//!     ├── ok    → amount_to_be_refunded = satoshi - fee
//!     └── error → error message, amount cleared
//! ```

use crate::amount::{to_amount_look, Denomination};
use crate::error::{Result, WalletError};
use crate::fees::{fee_rate_with_unit, FeeSelection, FeeTier, RecommendedFees};
use crate::models::{SideEffect, ViewModel, ViewModelBase};
use crate::session::{Account, LightningSdk, WalletSession};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub enum RecoverFundsEvent {
    SetAddress(String),
    SetShowManualAddress(bool),
    SetAccount(Account),
    /// Tier index, 0 = custom
    SetFeeSlider(u8),
    SetCustomFee(Option<u64>),
    Continue,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecoverFundsState {
    pub address: String,
    /// Receive address of `account`, kept so toggling manual entry restores it
    pub account_address: String,
    pub account: Option<Account>,
    pub amount: String,
    pub amount_to_be_refunded: Option<String>,
    pub amount_to_be_refunded_fiat: Option<String>,
    pub fee: Option<String>,
    pub fee_fiat: Option<String>,
    pub error: Option<String>,
    pub fee_selection: FeeSelection,
    pub fee_amount_rate: String,
    pub recommended_fees: Option<RecommendedFees>,
    pub has_bitcoin_account: bool,
    pub show_manual_address: bool,
}

impl RecoverFundsState {
    pub fn fee_slider(&self) -> u8 { self.fee_selection.tier.index() }

    pub fn custom_fee(&self) -> u64 { self.fee_selection.custom_fee }

    /// sat/vB for the current selection, once recommendations are known
    pub fn fee_rate(&self) -> Option<u64> {
        self.recommended_fees.as_ref().map(|fees| self.fee_selection.resolve(fees))
    }

    fn clear_amounts(&mut self) {
        self.amount_to_be_refunded = None;
        self.amount_to_be_refunded_fiat = None;
    }
}

fn is_recovery_destination(account: &Account) -> bool {
    account.is_bitcoin() && !account.is_lightning()
}

pub struct RecoverFundsViewModel {
    base: ViewModelBase,
    session: Arc<dyn WalletSession>,
    lightning: Arc<dyn LightningSdk>,
    swap_address: Option<String>,
    satoshi: i64,
    state: watch::Sender<RecoverFundsState>,
}

impl RecoverFundsViewModel {
    pub fn new(
        session: Arc<dyn WalletSession>,
        lightning: Arc<dyn LightningSdk>,
        swap_address: Option<String>,
        satoshi: i64,
    ) -> Arc<Self> {
        let screen = if swap_address.is_some() { "OnChainRefund" } else { "LightningSweep" };
        Arc::new(Self {
            base: ViewModelBase::new(screen),
            session,
            lightning,
            swap_address,
            satoshi,
            state: watch::channel(RecoverFundsState::default()).0,
        })
    }

    pub fn is_refund(&self) -> bool { self.swap_address.is_some() }
    pub fn is_sweep(&self) -> bool { self.swap_address.is_none() }

    pub fn state(&self) -> watch::Receiver<RecoverFundsState> { self.state.subscribe() }

    pub fn current(&self) -> RecoverFundsState { self.state.borrow().clone() }

    /// Bootstraps the screen and follows the session's accounts until the scope closes.
    pub async fn start(self: &Arc<Self>) {
        self.bootstrap().await;

        let vm = self.clone();
        let mut accounts = self.session.accounts();
        self.base.scope().launch(async move {
            while accounts.changed().await.is_ok() {
                let has_bitcoin_account = accounts.borrow_and_update().iter().any(is_recovery_destination);
                vm.state.send_modify(|s| s.has_bitcoin_account = has_bitcoin_account);
            }
        });
    }

    pub async fn bootstrap(&self) {
        if self.session.is_connected() {
            let amount = to_amount_look(self.satoshi.saturating_abs(), &self.session.settings(), true, None).unwrap_or_default();
            self.state.send_modify(|s| s.amount = amount);
        }

        let first_account = self.session.accounts().borrow().iter().find(|a| is_recovery_destination(a)).cloned();
        self.state.send_modify(|s| {
            s.has_bitcoin_account = first_account.is_some();
            s.show_manual_address = first_account.is_none();
        });
        if let Some(account) = first_account {
            self.select_account(account).await;
        }

        match self.lightning.recommended_fees().await {
            Ok(fees) => {
                tracing::debug!(?fees, "recommended fees");
                self.state.send_modify(|s| {
                    s.fee_selection.custom_fee = fees.minimum_fee;
                    s.recommended_fees = Some(fees);
                });
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "recommended fees unavailable");
                self.state.send_modify(|s| s.error = Some(WalletError::FeesUnavailable.message()));
            }
        }
    }

    async fn select_account(&self, account: Account) {
        if !is_recovery_destination(&account) {
            return;
        }
        let address = match self.base.do_async(async {
            Ok::<_, WalletError>(self.session.get_receive_address(&account).await?)
        }).await {
            Ok(address) => address.address,
            Err(e) => {
                self.state.send_modify(|s| s.error = Some(e.message()));
                return;
            }
        };
        self.state.send_modify(|s| {
            s.account = Some(account);
            s.account_address = address.clone();
            if !s.show_manual_address {
                s.address = address;
            }
        });
    }

    fn set_custom_fee(&self, fee: Option<u64>) {
        let minimum = self.current().recommended_fees.map(|f| f.minimum_fee).unwrap_or(1);
        let mut outcome = None;
        self.state.send_modify(|s| outcome = Some(s.fee_selection.set_custom(fee, minimum)));
        if let Some(notice) = outcome.and_then(|o| o.notice()) {
            self.base.post_side_effect(SideEffect::Snackbar(notice));
        }
    }

    /// Fee label and quote for the current inputs. Waits for recommended fees.
    async fn refresh(&self) {
        let Some(rate) = self.current().fee_rate() else { return };
        self.state.send_modify(|s| s.fee_amount_rate = fee_rate_with_unit(rate));
        self.prepare().await;
    }

    async fn prepare(&self) {
        let (address, rate) = {
            let s = self.state.borrow();
            (s.address.clone(), s.fee_rate())
        };
        if address.is_empty() {
            self.state.send_modify(|s| {
                s.clear_amounts();
                s.error = None;
            });
            return;
        }

        match self.base.do_async(self.quote(&address, rate)).await {
            Ok((fee, remaining)) => {
                let settings = self.session.settings();
                self.state.send_modify(|s| {
                    s.amount_to_be_refunded = to_amount_look(remaining, &settings, true, None);
                    s.amount_to_be_refunded_fiat = to_amount_look(remaining, &settings, true, Some(Denomination::Fiat));
                    s.fee = to_amount_look(fee, &settings, true, None);
                    s.fee_fiat = to_amount_look(fee, &settings, true, Some(Denomination::Fiat));
                    s.error = None;
                });
            }
            Err(e) => self.state.send_modify(|s| {
                s.error = Some(e.message());
                s.clear_amounts();
            }),
        }
    }

    /// SDK fee for moving the funds to `address`, and what is left after it
    async fn quote(&self, address: &str, rate: Option<u64>) -> Result<(i64, i64)> {
        self.check_address(address)?;
        let sat_per_vbyte = rate.map(sat_per_vbyte);
        let fee_sat = match &self.swap_address {
            Some(swap) => self.lightning.prepare_refund(swap, address, sat_per_vbyte).await?.refund_tx_fee_sat,
            None => self.lightning.prepare_sweep(address, sat_per_vbyte).await?.sweep_tx_fee_sat,
        };
        let fee = i64::try_from(fee_sat).ok();
        match fee.and_then(|fee| Some((fee, self.satoshi.checked_sub(fee)?))) {
            Some((fee, remaining)) if remaining >= 0 => Ok((fee, remaining)),
            _ => Err(WalletError::InsufficientFunds {
                available: u64::try_from(self.satoshi).unwrap_or(0),
                fee: fee_sat,
            }),
        }
    }

    fn check_address(&self, address: &str) -> Result<()> {
        let network = self.session.bitcoin_network();
        bitcoin::Address::from_str(address)
            .map_err(|e| WalletError::InvalidAddress(e.to_string()))?
            .require_network(network)
            .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        Ok(())
    }

    async fn recover_funds(&self) {
        let (address, rate) = {
            let s = self.state.borrow();
            (s.address.clone(), s.fee_rate())
        };
        let result = self.base.do_async(async {
            if !self.session.is_connected() {
                return Err(WalletError::NotConnected);
            }
            self.check_address(&address)?;
            let sat_per_vbyte = Some(sat_per_vbyte(rate.ok_or(WalletError::FeesUnavailable)?));
            Ok(match &self.swap_address {
                Some(swap) => self.lightning.refund(swap, &address, sat_per_vbyte).await?.refund_tx_id,
                None => self.lightning.sweep(&address, sat_per_vbyte).await?.txid,
            })
        }).await;

        match result {
            Ok(txid) => {
                tracing::info!(%txid, screen = self.screen_name(), "funds recovered");
                self.base.post_side_effect(SideEffect::Success);
            }
            Err(e) => {
                let network = self.session.lightning_network().map(|n| n.id);
                self.base.post_error(&e, network.as_deref());
            }
        }
    }
}

fn sat_per_vbyte(rate: u64) -> u32 {
    u32::try_from(rate).unwrap_or(u32::MAX)
}

#[async_trait]
impl ViewModel for RecoverFundsViewModel {
    type Event = RecoverFundsEvent;

    fn base(&self) -> &ViewModelBase { &self.base }

    async fn handle_event(&self, event: RecoverFundsEvent) {
        match event {
            RecoverFundsEvent::SetAddress(address) => {
                self.state.send_modify(|s| s.address = address.trim().to_string());
            }
            RecoverFundsEvent::SetShowManualAddress(show) => {
                self.state.send_modify(|s| {
                    s.show_manual_address = show;
                    if !show {
                        s.address = s.account_address.clone();
                    }
                });
            }
            RecoverFundsEvent::SetAccount(account) => self.select_account(account).await,
            RecoverFundsEvent::SetFeeSlider(index) => match FeeTier::try_from(index) {
                Ok(tier) => self.state.send_modify(|s| s.fee_selection.tier = tier),
                Err(index) => {
                    tracing::debug!(index, "ignoring unknown fee tier");
                    return;
                }
            },
            RecoverFundsEvent::SetCustomFee(fee) => self.set_custom_fee(fee),
            RecoverFundsEvent::Continue => {
                self.recover_funds().await;
                return;
            }
        }
        self.refresh().await;
    }
}

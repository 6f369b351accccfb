//! WatchOnlyViewModel - watch-only settings: multisig logins, xpubs and descriptors

use crate::models::{SideEffect, ViewModel, ViewModelBase};
use crate::session::{Account, MultisigWatchOnly, Network, WalletSession};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// One row of the watch-only screen
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WatchOnlyLook {
    pub account: Option<Account>,
    pub network: Option<Network>,
    pub username: Option<String>,
    pub extended_pubkey: Option<String>,
    pub output_descriptors: Option<String>,
}

impl WatchOnlyLook {
    pub fn multisig(network: Network, username: String) -> Self {
        Self { network: Some(network), username: Some(username), ..Default::default() }
    }

    pub fn extended_pubkey(account: Account) -> Self {
        let extended_pubkey = account.extended_pubkey.clone();
        Self { account: Some(account), extended_pubkey, ..Default::default() }
    }

    pub fn output_descriptors(account: Account) -> Self {
        let output_descriptors = account.output_descriptors.clone();
        Self { account: Some(account), output_descriptors, ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WatchOnlyState {
    pub has_multisig: bool,
    pub has_singlesig: bool,
    pub multisig_watch_only: Vec<WatchOnlyLook>,
    pub extended_public_keys_accounts: Vec<WatchOnlyLook>,
    pub output_descriptors_accounts: Vec<WatchOnlyLook>,
}

#[derive(Debug, Clone)]
pub enum WatchOnlyEvent {
    Refresh,
    /// The UI copied a key or descriptor
    Copied,
}

pub struct WatchOnlyViewModel {
    base: ViewModelBase,
    session: Arc<dyn WalletSession>,
    state: watch::Sender<WatchOnlyState>,
}

impl WatchOnlyViewModel {
    pub fn new(session: Arc<dyn WalletSession>) -> Arc<Self> {
        let state = WatchOnlyState {
            has_multisig: !session.active_multisig().is_empty(),
            has_singlesig: !session.active_singlesig().is_empty(),
            ..Default::default()
        };
        Arc::new(Self {
            base: ViewModelBase::new("WalletSettingsWatchOnly"),
            session,
            state: watch::channel(state).0,
        })
    }

    pub fn state(&self) -> watch::Receiver<WatchOnlyState> { self.state.subscribe() }

    pub fn current(&self) -> WatchOnlyState { self.state.borrow().clone() }

    /// Loads the rows, then keeps them in sync with the session until the scope closes.
    pub async fn start(self: &Arc<Self>) {
        self.refresh().await;

        let vm = self.clone();
        let mut accounts = self.session.accounts();
        self.base.scope().launch(async move {
            while accounts.changed().await.is_ok() {
                let list = accounts.borrow_and_update().clone();
                vm.refresh_accounts(list).await;
            }
        });

        let vm = self.clone();
        let mut multisig = self.session.multisig_watch_only();
        self.base.scope().launch(async move {
            while multisig.changed().await.is_ok() {
                let logins = multisig.borrow_and_update().clone();
                vm.refresh_multisig(&logins);
            }
        });
    }

    pub async fn refresh(&self) {
        let logins = self.session.multisig_watch_only().borrow().clone();
        self.refresh_multisig(&logins);
        let accounts = self.session.accounts().borrow().clone();
        self.refresh_accounts(accounts).await;
    }

    fn refresh_multisig(&self, logins: &MultisigWatchOnly) {
        let rows: Vec<WatchOnlyLook> = [
            (self.session.bitcoin_multisig(), logins.bitcoin.clone()),
            (self.session.liquid_multisig(), logins.liquid.clone()),
        ]
        .into_iter()
        .filter_map(|(network, username)| Some(WatchOnlyLook::multisig(network?, username?)))
        .collect();
        self.state.send_modify(|s| {
            s.has_multisig = !self.session.active_multisig().is_empty();
            s.multisig_watch_only = rows;
        });
    }

    async fn refresh_accounts(&self, accounts: Vec<Account>) {
        let mut detailed = Vec::new();
        for account in accounts.iter().filter(|a| a.is_singlesig() && a.is_bitcoin()) {
            // Only the detailed account carries keys.
            match self.session.get_account(account).await {
                Ok(account) => detailed.push(account),
                Err(e) => tracing::warn!(account = %account.id(), error = %e, "account details unavailable"),
            }
        }
        tracing::debug!(accounts = detailed.len(), "watch-only accounts");
        self.state.send_modify(|s| {
            s.has_singlesig = !self.session.active_singlesig().is_empty();
            s.extended_public_keys_accounts = detailed.iter().cloned().map(WatchOnlyLook::extended_pubkey).collect();
            s.output_descriptors_accounts = detailed.into_iter().map(WatchOnlyLook::output_descriptors).collect();
        });
    }
}

#[async_trait]
impl ViewModel for WatchOnlyViewModel {
    type Event = WatchOnlyEvent;

    fn base(&self) -> &ViewModelBase { &self.base }

    async fn handle_event(&self, event: WatchOnlyEvent) {
        match event {
            WatchOnlyEvent::Refresh => self.refresh().await,
            WatchOnlyEvent::Copied => self.base.post_side_effect(SideEffect::Snackbar("id_copied_to_clipboard".into())),
        }
    }
}

//! Integration Tests: Lightning sweep and on-chain swap refund
//!
//! These tests verify:
//! 1. Bootstrap picks the first Bitcoin account and quotes at the hour tier
//! 2. Fee tiers and custom fee clamping
//! 3. Insufficient funds clears the amount
//! 4. Manual addresses are checked before the SDK is asked
//! 5. Continue sweeps or refunds, or reports why it cannot

mod common;

use common::*;
use satchel::models::{RecoverFundsEvent, RecoverFundsViewModel};
use satchel::{spawn_event_loop, SideEffect, ViewModel};
use std::sync::Arc;
use std::time::Duration;

const SWAP_ADDRESS: &str = "bc1qswapaddress";

async fn sweep(satoshi: i64, session: MockSession, lightning: MockLightning) -> (Arc<RecoverFundsViewModel>, Arc<MockSession>, Arc<MockLightning>) {
    let session = Arc::new(session);
    let lightning = Arc::new(lightning);
    let vm = RecoverFundsViewModel::new(session.clone(), lightning.clone(), None, satoshi);
    vm.start().await;
    (vm, session, lightning)
}

#[tokio::test]
async fn bootstrap_quotes_sweep_at_hour_tier() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![lightning_account(), segwit_account(0)]), MockLightning::new(100)).await;
    let state = vm.current();

    assert!(vm.is_sweep());
    assert_eq!(vm.screen_name(), "LightningSweep");
    assert_eq!(state.amount, "0.00010000 BTC");
    assert_eq!(state.account, Some(segwit_account(0)));
    assert_eq!(state.address, MAINNET_ADDRESS);
    assert!(state.has_bitcoin_account);
    assert!(!state.show_manual_address);
    assert_eq!(state.fee_slider(), 2);
    assert_eq!(state.custom_fee(), 5);
    assert_eq!(state.fee_amount_rate, "20.00 sat/vbyte");
    assert_eq!(state.fee.as_deref(), Some("0.00002000 BTC"));
    assert_eq!(state.amount_to_be_refunded.as_deref(), Some("0.00008000 BTC"));
    assert_eq!(state.amount_to_be_refunded_fiat, None);
    assert_eq!(state.error, None);
    assert_eq!(
        lightning.calls(),
        vec![LightningCall::PrepareSweep { to: MAINNET_ADDRESS.into(), rate: Some(20) }]
    );
}

#[tokio::test]
async fn fiat_amounts_follow_exchange_rate() {
    let session = MockSession::new(vec![segwit_account(0)]);
    session.set_exchange_rate(50_000.0);
    let (vm, _, _) = sweep(10_000, session, MockLightning::new(100)).await;
    let state = vm.current();
    assert_eq!(state.amount_to_be_refunded_fiat.as_deref(), Some("4.00 USD"));
    assert_eq!(state.fee_fiat.as_deref(), Some("1.00 USD"));
}

#[tokio::test]
async fn fee_exceeding_balance_is_insufficient_funds() {
    let (vm, _, _) = sweep(1_500, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    let state = vm.current();
    assert_eq!(state.error.as_deref(), Some("id_insufficient_funds"));
    assert_eq!(state.amount_to_be_refunded, None);
    assert_eq!(state.amount_to_be_refunded_fiat, None);

    // A cheaper tier fits again.
    vm.handle_event(RecoverFundsEvent::SetFeeSlider(0)).await;
    let state = vm.current();
    assert_eq!(state.error, None);
    assert_eq!(state.amount_to_be_refunded.as_deref(), Some("0.00001000 BTC"));
}

#[tokio::test]
async fn custom_fee_below_minimum_is_clamped_with_notice() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    let mut effects = vm.base().side_effects();

    vm.handle_event(RecoverFundsEvent::SetCustomFee(Some(2))).await;

    assert_eq!(effects.recv().await.unwrap(), SideEffect::Snackbar("id_fee_rate_must_be_at_least_s|5".into()));
    let state = vm.current();
    assert_eq!(state.fee_slider(), 0);
    assert_eq!(state.custom_fee(), 5);
    assert_eq!(state.fee_amount_rate, "5.00 sat/vbyte");
    assert_eq!(
        lightning.calls().last(),
        Some(&LightningCall::PrepareSweep { to: MAINNET_ADDRESS.into(), rate: Some(5) })
    );

    vm.handle_event(RecoverFundsEvent::SetCustomFee(Some(12))).await;
    assert_eq!(vm.current().custom_fee(), 12);
    assert!(effects.try_recv().is_err());

    vm.handle_event(RecoverFundsEvent::SetCustomFee(None)).await;
    assert_eq!(vm.current().custom_fee(), 5);
}

#[tokio::test]
async fn huge_custom_fee_is_insufficient_funds() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    let events = spawn_event_loop(vm.clone());
    let mut rx = vm.state();

    assert!(events.post_event(RecoverFundsEvent::SetCustomFee(Some(u64::MAX / 100))));
    tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.error.as_deref() == Some("id_insufficient_funds")))
        .await
        .expect("custom fee applied")
        .expect("state open");
    let state = vm.current();
    assert_eq!(state.fee_amount_rate, format!("{}.00 sat/vbyte", u64::MAX / 100));
    assert_eq!(state.amount_to_be_refunded, None);
    assert_eq!(
        lightning.calls().last(),
        Some(&LightningCall::PrepareSweep { to: MAINNET_ADDRESS.into(), rate: Some(u32::MAX) })
    );

    // The loop is still alive and takes the next event.
    assert!(events.post_event(RecoverFundsEvent::SetFeeSlider(2)));
    tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.error.is_none() && s.fee_rate() == Some(20)))
        .await
        .expect("slider applied")
        .expect("state open");
}

#[tokio::test]
async fn sdk_fee_beyond_signed_range_is_insufficient_funds() {
    let (vm, _, _) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(u64::MAX)).await;
    let state = vm.current();
    assert_eq!(state.error.as_deref(), Some("id_insufficient_funds"));
    assert_eq!(state.fee, None);
}

#[tokio::test]
async fn extreme_negative_balance_does_not_panic() {
    let (vm, _, _) = sweep(i64::MIN, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    let state = vm.current();
    assert_eq!(state.amount, "92233720368.54775807 BTC");
    assert_eq!(state.error.as_deref(), Some("id_insufficient_funds"));
}

#[tokio::test]
async fn slider_switches_tiers() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;

    vm.handle_event(RecoverFundsEvent::SetFeeSlider(4)).await;
    assert_eq!(vm.current().fee_amount_rate, "40.00 sat/vbyte");
    assert_eq!(vm.current().fee.as_deref(), Some("0.00004000 BTC"));

    vm.handle_event(RecoverFundsEvent::SetFeeSlider(3)).await;
    assert_eq!(vm.current().fee_rate(), Some(30));

    let calls = lightning.calls().len();
    vm.handle_event(RecoverFundsEvent::SetFeeSlider(9)).await;
    assert_eq!(vm.current().fee_slider(), 3);
    assert_eq!(lightning.calls().len(), calls);
}

#[tokio::test]
async fn refund_quotes_the_swap() {
    let session = Arc::new(MockSession::new(vec![segwit_account(0)]));
    let lightning = Arc::new(MockLightning::new(10));
    let vm = RecoverFundsViewModel::new(session, lightning.clone(), Some(SWAP_ADDRESS.into()), 50_000);
    vm.start().await;

    assert!(vm.is_refund());
    assert_eq!(vm.screen_name(), "OnChainRefund");
    assert_eq!(vm.current().amount_to_be_refunded.as_deref(), Some("0.00049800 BTC"));
    assert_eq!(
        lightning.calls(),
        vec![LightningCall::PrepareRefund { swap: SWAP_ADDRESS.into(), to: MAINNET_ADDRESS.into(), rate: Some(20) }]
    );

    let mut effects = vm.base().side_effects();
    vm.handle_event(RecoverFundsEvent::Continue).await;
    assert_eq!(effects.recv().await.unwrap(), SideEffect::Success);
    assert_eq!(
        lightning.calls().last(),
        Some(&LightningCall::Refund { swap: SWAP_ADDRESS.into(), to: MAINNET_ADDRESS.into(), rate: Some(20) })
    );
}

#[tokio::test]
async fn manual_address_is_checked_locally() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    let calls = lightning.calls().len();

    vm.handle_event(RecoverFundsEvent::SetShowManualAddress(true)).await;
    vm.handle_event(RecoverFundsEvent::SetAddress(format!("  {TESTNET_ADDRESS} "))).await;
    let state = vm.current();
    assert_eq!(state.address, TESTNET_ADDRESS);
    assert_eq!(state.error.as_deref(), Some("id_invalid_address"));
    assert_eq!(state.amount_to_be_refunded, None);

    vm.handle_event(RecoverFundsEvent::SetAddress(String::new())).await;
    assert_eq!(vm.current().error, None);
    assert_eq!(lightning.calls().len(), calls + 1);

    vm.handle_event(RecoverFundsEvent::SetShowManualAddress(false)).await;
    let state = vm.current();
    assert_eq!(state.address, MAINNET_ADDRESS);
    assert!(state.amount_to_be_refunded.is_some());
}

#[tokio::test]
async fn sdk_failure_clears_amount() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    lightning.fail("swap not refundable");
    vm.handle_event(RecoverFundsEvent::SetFeeSlider(3)).await;
    let state = vm.current();
    assert_eq!(state.error.as_deref(), Some("swap not refundable"));
    assert_eq!(state.amount_to_be_refunded, None);
}

#[tokio::test]
async fn no_recommended_fees_means_no_quote() {
    let (vm, _, lightning) =
        sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100).without_fees()).await;
    let state = vm.current();
    assert_eq!(state.error.as_deref(), Some("id_fee_rate_is_not_available"));
    assert_eq!(state.fee_rate(), None);
    assert!(lightning.calls().is_empty());

    let mut effects = vm.base().side_effects();
    vm.handle_event(RecoverFundsEvent::Continue).await;
    match effects.recv().await.unwrap() {
        SideEffect::ErrorDialog { error, report } => {
            assert_eq!(error, "id_fee_rate_is_not_available");
            assert!(report.is_some());
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(lightning.calls().is_empty());
}

#[tokio::test]
async fn continue_sweeps_to_selected_address() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    let mut effects = vm.base().side_effects();
    vm.handle_event(RecoverFundsEvent::Continue).await;
    assert_eq!(effects.recv().await.unwrap(), SideEffect::Success);
    assert_eq!(
        lightning.calls().last(),
        Some(&LightningCall::Sweep { to: MAINNET_ADDRESS.into(), rate: Some(20) })
    );
}

#[tokio::test]
async fn continue_while_disconnected_reports_error() {
    let (vm, session, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    session.set_connected(false);
    let mut effects = vm.base().side_effects();

    vm.handle_event(RecoverFundsEvent::Continue).await;

    match effects.recv().await.unwrap() {
        SideEffect::ErrorDialog { error, report: Some(report) } => {
            assert_eq!(error, "id_you_are_not_connected");
            assert_eq!(report.screen, "LightningSweep");
            assert_eq!(report.network.as_deref(), Some("lightning-mainnet"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!lightning.calls().iter().any(|c| matches!(c, LightningCall::Sweep { .. })));
}

#[tokio::test]
async fn follows_accounts_until_closed() {
    let (vm, session, _) = sweep(10_000, MockSession::new(vec![lightning_account(), liquid_account()]), MockLightning::new(100)).await;
    let state = vm.current();
    assert!(!state.has_bitcoin_account);
    assert!(state.show_manual_address);
    assert!(state.address.is_empty());
    assert_eq!(state.amount_to_be_refunded, None);

    let mut rx = vm.state();
    session.set_accounts(vec![lightning_account(), segwit_account(3)]);
    tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.has_bitcoin_account))
        .await
        .expect("account update")
        .expect("state open");

    vm.close().await;
    session.set_accounts(vec![lightning_account()]);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(vm.current().has_bitcoin_account);
}

#[tokio::test]
async fn event_loop_applies_events_in_order() {
    let (vm, _, lightning) = sweep(10_000, MockSession::new(vec![segwit_account(0)]), MockLightning::new(100)).await;
    let events = spawn_event_loop(vm.clone());
    let mut rx = vm.state();

    assert!(events.post_event(RecoverFundsEvent::SetFeeSlider(4)));
    assert!(events.post_event(RecoverFundsEvent::SetFeeSlider(3)));
    tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.fee_rate() == Some(30) && s.fee.as_deref() == Some("0.00003000 BTC")))
        .await
        .expect("events applied")
        .expect("state open");
    assert_eq!(
        lightning.calls().last(),
        Some(&LightningCall::PrepareSweep { to: MAINNET_ADDRESS.into(), rate: Some(30) })
    );

    vm.close().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!events.post_event(RecoverFundsEvent::SetFeeSlider(1)));
}

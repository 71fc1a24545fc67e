//! Ledger integration tests: balance derivation, fee application,
//! purchase pairing, transfers, withdrawals and deposit idempotency.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{create_user, fund_wallet, test_storage};
use vinaji::services::{LedgerService, PurchaseRequest};
use vinaji::storage::backend::settings::SettingsPatch;
use vinaji::storage::{SaleKind, TxKind, TxStatus};

#[tokio::test]
async fn test_empty_wallet_balance_is_zero() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "alice", None).await;

    let ledger = LedgerService::new(storage.clone());
    let balance = ledger.balance(user.id).await.unwrap();

    assert_eq!(balance.available, Decimal::ZERO);
    assert_eq!(balance.total_credits, Decimal::ZERO);
    assert_eq!(balance.total_debits, Decimal::ZERO);
}

#[tokio::test]
async fn test_balance_sums_credits_minus_debits() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "alice", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, user.id, dec!(10000)).await;
    fund_wallet(&storage, user.id, dec!(2500)).await;

    let balance = ledger.balance(user.id).await.unwrap();
    assert_eq!(balance.available, dec!(12500));
    assert_eq!(balance.total_credits, dec!(12500));
}

#[tokio::test]
async fn test_purchase_pairing_moves_gross_and_charges_fee() {
    let (storage, _dir) = test_storage().await;
    let buyer = create_user(&storage, "buyer", None).await;
    let seller = create_user(&storage, "seller", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, buyer.id, dec!(10000)).await;

    let outcome = ledger
        .record_purchase(PurchaseRequest {
            buyer_id: buyer.id,
            seller_id: seller.id,
            gross: dec!(4000),
            kind: SaleKind::Course,
            description: "Course enrollment: Rust 101".to_string(),
            metadata: None,
        })
        .await
        .unwrap();

    // 默认课程费率 3%
    assert_eq!(outcome.admin_fee, dec!(120));
    assert_eq!(outcome.net_amount, dec!(3880));

    let buyer_balance = ledger.balance(buyer.id).await.unwrap();
    assert_eq!(buyer_balance.available, dec!(6000));

    // 卖家贷记全额、借记平台费 → 净得 3880
    let seller_balance = ledger.balance(seller.id).await.unwrap();
    assert_eq!(seller_balance.available, dec!(3880));
}

#[tokio::test]
async fn test_purchase_rejected_on_insufficient_balance() {
    let (storage, _dir) = test_storage().await;
    let buyer = create_user(&storage, "buyer", None).await;
    let seller = create_user(&storage, "seller", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, buyer.id, dec!(100)).await;

    let result = ledger
        .record_purchase(PurchaseRequest {
            buyer_id: buyer.id,
            seller_id: seller.id,
            gross: dec!(4000),
            kind: SaleKind::Product,
            description: "Too expensive".to_string(),
            metadata: None,
        })
        .await;

    assert!(result.is_err());

    // 失败的购买不能留下任何流水
    let buyer_balance = ledger.balance(buyer.id).await.unwrap();
    assert_eq!(buyer_balance.available, dec!(100));
    let seller_balance = ledger.balance(seller.id).await.unwrap();
    assert_eq!(seller_balance.available, Decimal::ZERO);
}

#[tokio::test]
async fn test_transfer_charges_sender_and_credits_recipient() {
    let (storage, _dir) = test_storage().await;
    let sender = create_user(&storage, "sender", None).await;
    let recipient = create_user(&storage, "recipient", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, sender.id, dec!(5000)).await;

    let (out_tx, in_tx) = ledger
        .transfer(sender.id, recipient.id, dec!(1000), Some("rent".to_string()))
        .await
        .unwrap();

    assert_eq!(out_tx.kind, TxKind::TransferOut.to_string());
    assert_eq!(in_tx.kind, TxKind::TransferIn.to_string());

    // 默认转账费率 0.5% → 5
    let sender_balance = ledger.balance(sender.id).await.unwrap();
    assert_eq!(sender_balance.available, dec!(3995));

    let recipient_balance = ledger.balance(recipient.id).await.unwrap();
    assert_eq!(recipient_balance.available, dec!(1000));
}

#[tokio::test]
async fn test_transfer_to_self_rejected() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "solo", None).await;
    let ledger = LedgerService::new(storage.clone());
    fund_wallet(&storage, user.id, dec!(5000)).await;

    assert!(ledger.transfer(user.id, user.id, dec!(100), None).await.is_err());
}

#[tokio::test]
async fn test_withdrawal_holds_available_balance() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "saver", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, user.id, dec!(10000)).await;

    let tx = ledger
        .request_withdrawal(user.id, dec!(2000), "bank_transfer".to_string())
        .await
        .unwrap();

    assert_eq!(tx.status, TxStatus::Pending.to_string());
    // 1% + 50 固定 → 总扣 2070
    assert_eq!(tx.amount, dec!(2070));

    let balance = ledger.balance(user.id).await.unwrap();
    assert_eq!(balance.available, dec!(7930));
    assert_eq!(balance.pending_debits, dec!(2070));
    // pending 借记尚未计入已完成借方
    assert_eq!(balance.total_debits, Decimal::ZERO);
}

#[tokio::test]
async fn test_withdrawal_below_minimum_rejected() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "small", None).await;
    let ledger = LedgerService::new(storage.clone());
    fund_wallet(&storage, user.id, dec!(10000)).await;

    // 默认最低提现 1000
    assert!(
        ledger
            .request_withdrawal(user.id, dec!(500), "bank_transfer".to_string())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_withdrawal_rejection_releases_hold() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "blocked", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, user.id, dec!(10000)).await;
    let tx = ledger
        .request_withdrawal(user.id, dec!(2000), "bank_transfer".to_string())
        .await
        .unwrap();

    let rejected = ledger.review_withdrawal(tx.id, false).await.unwrap();
    assert_eq!(rejected.status, TxStatus::Rejected.to_string());

    let balance = ledger.balance(user.id).await.unwrap();
    assert_eq!(balance.available, dec!(10000));
    assert_eq!(balance.pending_debits, Decimal::ZERO);
}

#[tokio::test]
async fn test_withdrawal_approval_completes_debit() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "payout", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, user.id, dec!(10000)).await;
    let tx = ledger
        .request_withdrawal(user.id, dec!(2000), "bank_transfer".to_string())
        .await
        .unwrap();

    let approved = ledger.review_withdrawal(tx.id, true).await.unwrap();
    assert_eq!(approved.status, TxStatus::Completed.to_string());
    assert!(approved.completed_at.is_some());

    let balance = ledger.balance(user.id).await.unwrap();
    assert_eq!(balance.available, dec!(7930));
    assert_eq!(balance.total_debits, dec!(2070));

    // 二次审批被拒
    assert!(ledger.review_withdrawal(tx.id, true).await.is_err());
}

#[tokio::test]
async fn test_commission_recorded_for_referred_buyer() {
    let (storage, _dir) = test_storage().await;
    let referrer = create_user(&storage, "referrer", None).await;
    let buyer = create_user(&storage, "referred", Some(referrer.referral_code.clone())).await;
    let seller = create_user(&storage, "vendor", None).await;
    let ledger = LedgerService::new(storage.clone());

    fund_wallet(&storage, buyer.id, dec!(10000)).await;

    let outcome = ledger
        .record_purchase(PurchaseRequest {
            buyer_id: buyer.id,
            seller_id: seller.id,
            gross: dec!(2000),
            kind: SaleKind::Product,
            description: "Product purchase: Template pack".to_string(),
            metadata: None,
        })
        .await
        .unwrap();

    // 默认推荐佣金 5%
    let commission = outcome.commission.expect("commission recorded");
    assert_eq!(commission.commission_amount, dec!(100));
    assert_eq!(commission.status, "pending");

    // 打款后推荐人入账
    let paid_tx = ledger.pay_commission(commission.id).await.unwrap();
    assert_eq!(paid_tx.user_id, referrer.id);

    let referrer_balance = ledger.balance(referrer.id).await.unwrap();
    assert_eq!(referrer_balance.available, dec!(100));

    // 重复打款被拒
    assert!(ledger.pay_commission(commission.id).await.is_err());
}

#[tokio::test]
async fn test_commission_skipped_when_affiliates_paused() {
    let (storage, _dir) = test_storage().await;
    let referrer = create_user(&storage, "ref2", None).await;
    let buyer = create_user(&storage, "buyer2", Some(referrer.referral_code.clone())).await;
    let seller = create_user(&storage, "seller2", None).await;

    storage
        .update_site_settings(SettingsPatch {
            pause_affiliates: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    let ledger = LedgerService::new(storage.clone());
    fund_wallet(&storage, buyer.id, dec!(10000)).await;

    let outcome = ledger
        .record_purchase(PurchaseRequest {
            buyer_id: buyer.id,
            seller_id: seller.id,
            gross: dec!(2000),
            kind: SaleKind::Product,
            description: "No commission sale".to_string(),
            metadata: None,
        })
        .await
        .unwrap();

    assert!(outcome.commission.is_none());
}

#[tokio::test]
async fn test_manual_deposit_approval_credits_once() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "manual", None).await;
    let admin = create_user(&storage, "admin", None).await;
    let ledger = LedgerService::new(storage.clone());

    let deposit = storage
        .create_manual_deposit(
            user.id,
            dec!(3000),
            "Test Depositor".to_string(),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            None,
        )
        .await
        .unwrap();

    let tx = ledger
        .review_manual_deposit(deposit.id, admin.id, true, None)
        .await
        .unwrap()
        .expect("deposit transaction");
    assert_eq!(tx.kind, TxKind::Deposit.to_string());

    // 默认入账费 1.5% → 45，净到账 2955
    let balance = ledger.balance(user.id).await.unwrap();
    assert_eq!(balance.available, dec!(2955));

    // 同一申请不能二次审批
    assert!(
        ledger
            .review_manual_deposit(deposit.id, admin.id, true, None)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_custom_fee_rates_apply() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "fees", None).await;
    let ledger = LedgerService::new(storage.clone());

    storage
        .update_site_settings(SettingsPatch {
            withdraw_fee_pct: Some(dec!(2.0)),
            withdraw_fixed_fee: Some(dec!(100)),
            min_withdrawal_amount: Some(dec!(500)),
            ..Default::default()
        })
        .await
        .unwrap();

    fund_wallet(&storage, user.id, dec!(10000)).await;
    let tx = ledger
        .request_withdrawal(user.id, dec!(1000), "bank_transfer".to_string())
        .await
        .unwrap();

    // 2% of 1000 + 100 = 120
    assert_eq!(tx.amount, dec!(1120));
}

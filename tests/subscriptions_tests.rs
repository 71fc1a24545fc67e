//! Subscription purchase and effective-level tests.

mod common;

use rust_decimal_macros::dec;
use serde_json::json;

use common::{create_user, fund_wallet, test_storage};
use vinaji::services::{LedgerService, SubscriptionService};
use vinaji::storage::SubscriptionLevel;

#[tokio::test]
async fn test_purchase_plan_debits_wallet_and_raises_level() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "upgrader", None).await;

    let plan = storage
        .upsert_subscription_plan(
            "pro".to_string(),
            Some("Pro tier".to_string()),
            dec!(2500),
            30,
            json!(["priority support"]),
        )
        .await
        .unwrap();

    fund_wallet(&storage, user.id, dec!(5000)).await;

    let subscriptions = SubscriptionService::new(storage.clone());
    let purchase = subscriptions.purchase_plan(user.id, plan.id).await.unwrap();

    assert_eq!(purchase.status, "active");
    assert!(purchase.end_date.is_some());
    assert!(purchase.transaction_id.is_some());

    let ledger = LedgerService::new(storage.clone());
    assert_eq!(ledger.balance(user.id).await.unwrap().available, dec!(2500));

    let user = storage.find_user(user.id).await.unwrap().unwrap();
    assert_eq!(user.subscription_level, "pro");

    let level = subscriptions.effective_level(&user).await.unwrap();
    assert_eq!(level, SubscriptionLevel::Pro);
}

#[tokio::test]
async fn test_purchase_plan_requires_balance() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "broke", None).await;

    let plan = storage
        .upsert_subscription_plan(
            "mentorship".to_string(),
            None,
            dec!(10000),
            30,
            json!([]),
        )
        .await
        .unwrap();

    let subscriptions = SubscriptionService::new(storage.clone());
    assert!(subscriptions.purchase_plan(user.id, plan.id).await.is_err());

    // 失败不会改变档位
    let user = storage.find_user(user.id).await.unwrap().unwrap();
    assert_eq!(user.subscription_level, "starter");
}

#[tokio::test]
async fn test_invalid_plan_name_rejected() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "odd", None).await;

    let plan = storage
        .upsert_subscription_plan("platinum".to_string(), None, dec!(100), 30, json!([]))
        .await
        .unwrap();

    let subscriptions = SubscriptionService::new(storage.clone());
    assert!(subscriptions.purchase_plan(user.id, plan.id).await.is_err());
}

#[tokio::test]
async fn test_effective_level_falls_back_without_active_subscription() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "lapsed", None).await;

    // 档位字段声称 pro，但没有有效订阅 → 回落 starter 并修正字段
    storage
        .set_user_subscription_level(user.id, "pro")
        .await
        .unwrap();
    let user = storage.find_user(user.id).await.unwrap().unwrap();

    let subscriptions = SubscriptionService::new(storage.clone());
    let level = subscriptions.effective_level(&user).await.unwrap();
    assert_eq!(level, SubscriptionLevel::Starter);

    let user = storage.find_user(user.id).await.unwrap().unwrap();
    assert_eq!(user.subscription_level, "starter");
}

#[tokio::test]
async fn test_free_plan_activates_without_transaction() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "freebie", None).await;

    let plan = storage
        .upsert_subscription_plan("starter".to_string(), None, dec!(0), 0, json!([]))
        .await
        .unwrap();

    let subscriptions = SubscriptionService::new(storage.clone());
    let purchase = subscriptions.purchase_plan(user.id, plan.id).await.unwrap();

    assert_eq!(purchase.status, "active");
    assert!(purchase.transaction_id.is_none());
    assert!(purchase.end_date.is_none());
}

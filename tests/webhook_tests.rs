//! Provider deposit ingestion tests: signature verification and
//! idempotent webhook-driven crediting.

mod common;

use rust_decimal_macros::dec;
use serde_json::json;

use common::{create_user, test_storage};
use vinaji::services::LedgerService;
use vinaji::services::monnify::{compute_webhook_signature, verify_webhook_signature};
use vinaji::storage::backend::kyc::ProvisionedAccount;

async fn provision_account(
    storage: &std::sync::Arc<vinaji::storage::SeaOrmStorage>,
    user_id: i64,
    reference: &str,
) {
    storage
        .insert_virtual_accounts(
            user_id,
            reference,
            vec![ProvisionedAccount {
                account_number: "9012345678".to_string(),
                account_name: "ADA O".to_string(),
                bank_name: "Wema Bank".to_string(),
                bank_code: "035".to_string(),
            }],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_webhook_deposit_credits_account_owner() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "depositor", None).await;
    provision_account(&storage, user.id, "VINAJI_1_ABCD1234").await;

    let ledger = LedgerService::new(storage.clone());
    let tx = ledger
        .record_provider_deposit(
            "VINAJI_1_ABCD1234",
            "MNFY|TX|0001",
            dec!(7500),
            json!({ "eventType": "SUCCESSFUL_TRANSACTION" }),
        )
        .await
        .unwrap()
        .expect("deposit recorded");

    assert_eq!(tx.user_id, user.id);
    assert_eq!(tx.reference, "MNFY|TX|0001");

    let balance = ledger.balance(user.id).await.unwrap();
    assert_eq!(balance.available, dec!(7500));
}

#[tokio::test]
async fn test_duplicate_webhook_delivery_is_ignored() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "dupes", None).await;
    provision_account(&storage, user.id, "VINAJI_2_REF").await;

    let ledger = LedgerService::new(storage.clone());
    let payload = json!({ "eventType": "SUCCESSFUL_TRANSACTION" });

    let first = ledger
        .record_provider_deposit("VINAJI_2_REF", "MNFY|TX|0002", dec!(1000), payload.clone())
        .await
        .unwrap();
    assert!(first.is_some());

    // 服务商重投同一流水号
    let second = ledger
        .record_provider_deposit("VINAJI_2_REF", "MNFY|TX|0002", dec!(1000), payload)
        .await
        .unwrap();
    assert!(second.is_none());

    let balance = ledger.balance(user.id).await.unwrap();
    assert_eq!(balance.available, dec!(1000), "credited exactly once");
}

#[tokio::test]
async fn test_unknown_account_reference_is_acknowledged() {
    let (storage, _dir) = test_storage().await;
    let _user = create_user(&storage, "nobody", None).await;

    let ledger = LedgerService::new(storage.clone());
    let result = ledger
        .record_provider_deposit(
            "UNKNOWN_REFERENCE",
            "MNFY|TX|0003",
            dec!(500),
            json!({}),
        )
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_zero_amount_rejected() {
    let (storage, _dir) = test_storage().await;
    let ledger = LedgerService::new(storage.clone());

    assert!(
        ledger
            .record_provider_deposit("REF", "MNFY|TX|0004", dec!(0), json!({}))
            .await
            .is_err()
    );
}

#[test]
fn test_signature_verification_roundtrip() {
    let secret = "monnify-secret";
    let body = br#"{"eventType":"SUCCESSFUL_TRANSACTION","eventData":{"amount":7500}}"#;

    let signature = compute_webhook_signature(secret, body);
    assert!(verify_webhook_signature(secret, body, &signature));
    assert!(!verify_webhook_signature(secret, b"tampered body", &signature));
    assert!(!verify_webhook_signature("other-secret", body, &signature));
}

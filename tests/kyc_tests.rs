//! KYC workflow tests: submission, review, idempotent provisioning and the
//! one-primary-account invariant, using a mocked banking provider.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use common::{create_user, test_storage};
use vinaji::errors::{Result, VinajiError};
use vinaji::services::monnify::{
    BankingProvider, ProviderBankInfo, ProviderTransaction, ReservedAccountRequest,
};
use vinaji::services::KycService;
use vinaji::storage::backend::kyc::{KycSubmission, ProvisionedAccount};

fn submission() -> KycSubmission {
    KycSubmission {
        id_type: "nin".to_string(),
        id_number: "12345678901".to_string(),
        legal_first_name: "Ada".to_string(),
        legal_last_name: "Obi".to_string(),
        date_of_birth: chrono::NaiveDate::from_ymd_opt(1995, 5, 17).unwrap(),
        address: "1 Marina Road".to_string(),
        city: "Lagos".to_string(),
        state: "Lagos".to_string(),
        country: "Nigeria".to_string(),
        postal_code: None,
        id_document_front_url: Some("https://cdn.example.com/doc-front.jpg".to_string()),
        id_document_back_url: None,
        selfie_url: None,
    }
}

/// Mock provider: records calls, optionally fails the first N create calls.
struct MockProvider {
    create_calls: AtomicUsize,
    fail_first: usize,
    seen_references: std::sync::Mutex<Vec<String>>,
}

impl MockProvider {
    fn new(fail_first: usize) -> Arc<Self> {
        Arc::new(Self {
            create_calls: AtomicUsize::new(0),
            fail_first,
            seen_references: std::sync::Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl BankingProvider for MockProvider {
    async fn create_reserved_account(
        &self,
        request: ReservedAccountRequest,
    ) -> Result<Vec<ProvisionedAccount>> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_references
            .lock()
            .unwrap()
            .push(request.account_reference.clone());

        if call < self.fail_first {
            return Err(VinajiError::provider("simulated outage"));
        }

        Ok(vec![
            ProvisionedAccount {
                account_number: format!("90{:08}", call),
                account_name: request.account_name.clone(),
                bank_name: "Wema Bank".to_string(),
                bank_code: "035".to_string(),
            },
            ProvisionedAccount {
                account_number: format!("80{:08}", call),
                account_name: request.account_name,
                bank_name: "Sterling Bank".to_string(),
                bank_code: "232".to_string(),
            },
        ])
    }

    async fn get_banks(&self) -> Result<Vec<ProviderBankInfo>> {
        Ok(vec![
            ProviderBankInfo {
                code: "035".to_string(),
                name: "Wema Bank".to_string(),
            },
            ProviderBankInfo {
                code: "232".to_string(),
                name: "Sterling Bank".to_string(),
            },
        ])
    }

    async fn verify_transaction(&self, _reference: &str) -> Result<Option<ProviderTransaction>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_submit_and_approve_provisions_accounts() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "ada", None).await;
    let admin = create_user(&storage, "reviewer", None).await;

    let provider = MockProvider::new(0);
    let kyc = KycService::new(storage.clone(), Some(provider.clone() as Arc<dyn BankingProvider>));

    let submitted = kyc.submit(user.id, submission()).await.unwrap();
    assert_eq!(submitted.status, "pending");

    let outcome = kyc.review(submitted.id, admin.id, true, None).await.unwrap();
    assert_eq!(outcome.kyc.status, "approved");
    assert!(outcome.provisioning_error.is_none());
    assert_eq!(outcome.accounts.len(), 2);

    // 只有一个主账户
    let accounts = storage.list_virtual_accounts(user.id).await.unwrap();
    assert_eq!(accounts.iter().filter(|a| a.is_primary).count(), 1);

    // KYC 通过后用户标记为已认证
    let user = storage.find_user(user.id).await.unwrap().unwrap();
    assert!(user.is_verified);
}

#[tokio::test]
async fn test_provisioning_failure_keeps_approval_and_is_retriable() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "bode", None).await;
    let admin = create_user(&storage, "reviewer2", None).await;

    // 第一次开户失败
    let provider = MockProvider::new(1);
    let kyc = KycService::new(storage.clone(), Some(provider.clone() as Arc<dyn BankingProvider>));

    let submitted = kyc.submit(user.id, submission()).await.unwrap();
    let outcome = kyc.review(submitted.id, admin.id, true, None).await.unwrap();

    // 审核结果已生效，但开户失败被记录
    assert_eq!(outcome.kyc.status, "approved");
    assert!(outcome.provisioning_error.is_some());
    assert!(outcome.accounts.is_empty());

    let row = storage.get_kyc_by_user(user.id).await.unwrap().unwrap();
    assert!(row.provisioning_error.is_some());
    let first_reference = row.provider_customer_reference.clone().unwrap();

    // 重试成功，并复用同一引用（幂等开户）
    let accounts = kyc.retrigger_provisioning(user.id).await.unwrap();
    assert_eq!(accounts.len(), 2);

    let row = storage.get_kyc_by_user(user.id).await.unwrap().unwrap();
    assert_eq!(row.provider_customer_reference.unwrap(), first_reference);
    assert!(row.provisioning_error.is_none());

    let seen = provider.seen_references.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1], "retry must reuse the stored reference");
}

#[tokio::test]
async fn test_retrigger_skips_existing_banks() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "cee", None).await;
    let admin = create_user(&storage, "reviewer3", None).await;

    let provider = MockProvider::new(0);
    let kyc = KycService::new(storage.clone(), Some(provider.clone() as Arc<dyn BankingProvider>));

    let submitted = kyc.submit(user.id, submission()).await.unwrap();
    kyc.review(submitted.id, admin.id, true, None).await.unwrap();

    // 再次开户：同一银行的账户不重复入库
    let created = kyc.retrigger_provisioning(user.id).await.unwrap();
    assert!(created.is_empty());
    assert_eq!(storage.list_virtual_accounts(user.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejection_records_reason() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "dee", None).await;
    let admin = create_user(&storage, "reviewer4", None).await;

    let provider = MockProvider::new(0);
    let kyc = KycService::new(storage.clone(), Some(provider.clone() as Arc<dyn BankingProvider>));

    let submitted = kyc.submit(user.id, submission()).await.unwrap();
    let outcome = kyc
        .review(submitted.id, admin.id, false, Some("Blurry document".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.kyc.status, "rejected");
    assert_eq!(outcome.kyc.rejection_reason.as_deref(), Some("Blurry document"));
    // 驳回不触发开户
    assert_eq!(provider.create_calls.load(Ordering::SeqCst), 0);

    // 被拒后可以重新提交
    let resubmitted = kyc.submit(user.id, submission()).await.unwrap();
    assert_eq!(resubmitted.status, "pending");
    assert!(resubmitted.rejection_reason.is_none());
}

#[tokio::test]
async fn test_approved_kyc_cannot_resubmit() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "efe", None).await;
    let admin = create_user(&storage, "reviewer5", None).await;

    let provider = MockProvider::new(0);
    let kyc = KycService::new(storage.clone(), Some(provider as Arc<dyn BankingProvider>));

    let submitted = kyc.submit(user.id, submission()).await.unwrap();
    kyc.review(submitted.id, admin.id, true, None).await.unwrap();

    assert!(kyc.submit(user.id, submission()).await.is_err());
}

#[tokio::test]
async fn test_sync_banks_upserts() {
    let (storage, _dir) = test_storage().await;
    let provider = MockProvider::new(0);
    let kyc = KycService::new(storage.clone(), Some(provider as Arc<dyn BankingProvider>));

    let count = kyc.sync_banks().await.unwrap();
    assert_eq!(count, 2);

    // 再跑一遍不会重复
    let count = kyc.sync_banks().await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(storage.list_provider_banks().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_set_primary_demotes_others() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "gigi", None).await;
    let admin = create_user(&storage, "reviewer6", None).await;

    let provider = MockProvider::new(0);
    let kyc = KycService::new(storage.clone(), Some(provider as Arc<dyn BankingProvider>));

    let submitted = kyc.submit(user.id, submission()).await.unwrap();
    kyc.review(submitted.id, admin.id, true, None).await.unwrap();

    let accounts = storage.list_virtual_accounts(user.id).await.unwrap();
    let secondary = accounts.iter().find(|a| !a.is_primary).unwrap();

    storage
        .set_primary_virtual_account(user.id, secondary.id)
        .await
        .unwrap();

    let accounts = storage.list_virtual_accounts(user.id).await.unwrap();
    assert_eq!(accounts.iter().filter(|a| a.is_primary).count(), 1);
    assert!(accounts.iter().find(|a| a.id == secondary.id).unwrap().is_primary);
}

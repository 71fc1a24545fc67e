//! KYC review and virtual-account provisioning workflow.
//!
//! Approval triggers provisioning through the payment provider. The account
//! reference is generated once and persisted on the KYC row *before* the
//! provider call, so retries reuse the same reference and the provider
//! treats them as the same account (idempotent creation). A provisioning
//! failure never rolls back the approval; it is recorded on the row and can
//! be re-triggered from the admin API.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::{Result, VinajiError};
use crate::services::monnify::{BankingProvider, ReservedAccountRequest};
use crate::storage::backend::kyc::KycSubmission;
use crate::storage::backend::notifications;
use crate::storage::{KycStatus, SeaOrmStorage};
use crate::utils::generate_random_code;

use migration::entities::{kyc_verification, virtual_account};

/// Monnify 账户名长度上限
const ACCOUNT_NAME_MAX: usize = 150;

pub struct KycService {
    storage: Arc<SeaOrmStorage>,
    provider: Option<Arc<dyn BankingProvider>>,
}

/// 审核结果：KYC 状态 + 开户产物
pub struct ReviewOutcome {
    pub kyc: kyc_verification::Model,
    pub accounts: Vec<virtual_account::Model>,
    /// 开户失败时的提示（KYC 审核本身已生效）
    pub provisioning_error: Option<String>,
}

impl KycService {
    pub fn new(storage: Arc<SeaOrmStorage>, provider: Option<Arc<dyn BankingProvider>>) -> Self {
        if provider.is_none() {
            warn!("KYC service running without a banking provider; provisioning disabled");
        }
        Self { storage, provider }
    }

    /// 用户提交 / 重新提交 KYC
    pub async fn submit(&self, user_id: i64, form: KycSubmission) -> Result<kyc_verification::Model> {
        if let Some(existing) = self.storage.get_kyc_by_user(user_id).await?
            && existing.status == KycStatus::Approved.to_string()
        {
            return Err(VinajiError::conflict("KYC 已通过，无需重复提交"));
        }

        if form.id_number.trim().is_empty() {
            return Err(VinajiError::validation("证件号码不能为空"));
        }

        let kyc = self.storage.upsert_kyc(user_id, form).await?;
        info!("KYC submitted for user {}", user_id);
        Ok(kyc)
    }

    pub async fn status_of(&self, user_id: i64) -> Result<Option<kyc_verification::Model>> {
        self.storage.get_kyc_by_user(user_id).await
    }

    /// 管理员审核。通过时连带触发虚拟账户开户。
    pub async fn review(
        &self,
        kyc_id: i64,
        reviewer: i64,
        approve: bool,
        rejection_reason: Option<String>,
    ) -> Result<ReviewOutcome> {
        let kyc = self
            .storage
            .find_kyc(kyc_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("KYC 记录不存在: {}", kyc_id)))?;

        if kyc.status == KycStatus::Approved.to_string() {
            return Err(VinajiError::conflict("KYC 已通过"));
        }

        if !approve {
            let kyc = self
                .storage
                .set_kyc_status(kyc_id, KycStatus::Rejected, reviewer, rejection_reason)
                .await?;

            notifications::insert_notification(
                self.storage.get_db(),
                kyc.user_id,
                "approval",
                "KYC Rejected",
                "Your KYC verification was rejected. Please review the reason and resubmit.",
                Some((kyc.id, "kyc")),
            )
            .await?;

            return Ok(ReviewOutcome {
                kyc,
                accounts: Vec::new(),
                provisioning_error: None,
            });
        }

        let kyc = self
            .storage
            .set_kyc_status(kyc_id, KycStatus::Approved, reviewer, None)
            .await?;
        self.storage.set_user_verified(kyc.user_id, true).await?;

        notifications::insert_notification(
            self.storage.get_db(),
            kyc.user_id,
            "approval",
            "KYC Approved",
            "Your identity has been verified. A virtual account is being set up for you.",
            Some((kyc.id, "kyc")),
        )
        .await?;

        // 开户失败不回滚审核结果
        match self.provision(&kyc).await {
            Ok(accounts) => {
                self.storage.set_kyc_provisioning_error(kyc.id, None).await?;
                Ok(ReviewOutcome {
                    kyc,
                    accounts,
                    provisioning_error: None,
                })
            }
            Err(e) => {
                let message = e.to_string();
                error!(
                    "Virtual account provisioning failed for user {}: {}",
                    kyc.user_id, message
                );
                self.storage
                    .set_kyc_provisioning_error(kyc.id, Some(message.clone()))
                    .await?;
                Ok(ReviewOutcome {
                    kyc,
                    accounts: Vec::new(),
                    provisioning_error: Some(message),
                })
            }
        }
    }

    /// 管理员：对已通过但未开户的用户重新触发开户
    pub async fn retrigger_provisioning(&self, user_id: i64) -> Result<Vec<virtual_account::Model>> {
        let kyc = self
            .storage
            .get_kyc_by_user(user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("用户无 KYC 记录: {}", user_id)))?;

        if kyc.status != KycStatus::Approved.to_string() {
            return Err(VinajiError::validation("KYC 尚未通过，不能开户"));
        }

        let accounts = self.provision(&kyc).await?;
        self.storage.set_kyc_provisioning_error(kyc.id, None).await?;
        Ok(accounts)
    }

    /// 调服务商开预留账户并落库。引用只生成一次，重试幂等。
    async fn provision(
        &self,
        kyc: &kyc_verification::Model,
    ) -> Result<Vec<virtual_account::Model>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| VinajiError::provider("banking provider not configured"))?;

        let user = self
            .storage
            .find_user(kyc.user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("用户不存在: {}", kyc.user_id)))?;

        let settings = self.storage.site_settings().await?;

        // 复用已存在的引用，否则生成并先落库
        let reference = match &kyc.provider_customer_reference {
            Some(reference) if !reference.is_empty() => reference.clone(),
            _ => {
                let reference = format!(
                    "{}_{}_{}",
                    settings.account_reference_prefix,
                    user.id,
                    generate_random_code(8).to_uppercase()
                );
                self.storage
                    .set_kyc_provider_reference(kyc.id, reference.clone())
                    .await?;
                reference
            }
        };

        // 账户名受服务商长度限制，按字符截断
        let mut account_name = format!(
            "{} {}",
            kyc.legal_first_name,
            kyc.legal_last_name.chars().next().map(String::from).unwrap_or_default()
        )
        .trim()
        .to_string();
        if account_name.chars().count() > ACCOUNT_NAME_MAX {
            account_name = account_name.chars().take(ACCOUNT_NAME_MAX - 3).collect();
            account_name.push_str("...");
        }

        let preferred_banks = {
            let prefs = self.storage.list_bank_preferences(user.id).await?;
            if prefs.is_empty() {
                settings.default_bank_code.clone().into_iter().collect()
            } else {
                prefs.into_iter().map(|p| p.bank_code).collect()
            }
        };

        let request = ReservedAccountRequest {
            account_reference: reference.clone(),
            account_name,
            currency_code: settings.currency.clone(),
            customer_email: user.email.clone(),
            customer_name: format!("{} {}", kyc.legal_first_name, kyc.legal_last_name),
            preferred_banks,
        };

        let provisioned = provider.create_reserved_account(request).await?;
        self.storage
            .insert_virtual_accounts(user.id, &reference, provisioned)
            .await
    }

    /// 管理端：到服务商侧核对一笔交易（入账争议排查）
    pub async fn verify_provider_transaction(
        &self,
        reference: &str,
    ) -> Result<Option<crate::services::monnify::ProviderTransaction>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| VinajiError::provider("banking provider not configured"))?;
        provider.verify_transaction(reference).await
    }

    /// 同步服务商银行列表
    pub async fn sync_banks(&self) -> Result<usize> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| VinajiError::provider("banking provider not configured"))?;

        let banks = provider.get_banks().await?;
        self.storage
            .upsert_provider_banks(banks.into_iter().map(|b| (b.code, b.name)).collect())
            .await
    }
}

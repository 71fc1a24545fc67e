//! KYC and virtual account storage operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use super::SeaOrmStorage;
use crate::errors::{Result, VinajiError};
use crate::storage::models::KycStatus;

use migration::entities::{bank_preference, kyc_verification, provider_bank, virtual_account};

/// KYC 提交表单
#[derive(Debug, Clone)]
pub struct KycSubmission {
    pub id_type: String,
    pub id_number: String,
    pub legal_first_name: String,
    pub legal_last_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: Option<String>,
    pub id_document_front_url: Option<String>,
    pub id_document_back_url: Option<String>,
    pub selfie_url: Option<String>,
}

/// 服务商返回的虚拟账户
#[derive(Debug, Clone)]
pub struct ProvisionedAccount {
    pub account_number: String,
    pub account_name: String,
    pub bank_name: String,
    pub bank_code: String,
}

impl SeaOrmStorage {
    pub async fn get_kyc_by_user(&self, user_id: i64) -> Result<Option<kyc_verification::Model>> {
        Ok(kyc_verification::Entity::find()
            .filter(kyc_verification::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn find_kyc(&self, id: i64) -> Result<Option<kyc_verification::Model>> {
        Ok(kyc_verification::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// 首次提交创建记录；重新提交（被拒 / 需补充）时重置为 pending
    pub async fn upsert_kyc(
        &self,
        user_id: i64,
        form: KycSubmission,
    ) -> Result<kyc_verification::Model> {
        let now = Utc::now();

        match self.get_kyc_by_user(user_id).await? {
            Some(existing) => {
                let mut active: kyc_verification::ActiveModel = existing.into();
                active.status = Set(KycStatus::Pending.to_string());
                active.id_type = Set(form.id_type);
                active.id_number = Set(form.id_number);
                active.legal_first_name = Set(form.legal_first_name);
                active.legal_last_name = Set(form.legal_last_name);
                active.date_of_birth = Set(form.date_of_birth);
                active.address = Set(form.address);
                active.city = Set(form.city);
                active.state = Set(form.state);
                active.country = Set(form.country);
                active.postal_code = Set(form.postal_code);
                active.id_document_front_url = Set(form.id_document_front_url);
                active.id_document_back_url = Set(form.id_document_back_url);
                active.selfie_url = Set(form.selfie_url);
                active.rejection_reason = Set(None);
                active.submitted_at = Set(now);
                active.reviewed_at = Set(None);
                active.reviewed_by = Set(None);
                Ok(active.update(&self.db).await?)
            }
            None => Ok(kyc_verification::ActiveModel {
                user_id: Set(user_id),
                status: Set(KycStatus::Pending.to_string()),
                id_type: Set(form.id_type),
                id_number: Set(form.id_number),
                legal_first_name: Set(form.legal_first_name),
                legal_last_name: Set(form.legal_last_name),
                date_of_birth: Set(form.date_of_birth),
                address: Set(form.address),
                city: Set(form.city),
                state: Set(form.state),
                country: Set(form.country),
                postal_code: Set(form.postal_code),
                id_document_front_url: Set(form.id_document_front_url),
                id_document_back_url: Set(form.id_document_back_url),
                selfie_url: Set(form.selfie_url),
                submitted_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await?),
        }
    }

    pub async fn set_kyc_status(
        &self,
        id: i64,
        status: KycStatus,
        reviewer: i64,
        rejection_reason: Option<String>,
    ) -> Result<kyc_verification::Model> {
        let kyc = self
            .find_kyc(id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("KYC 记录不存在: {}", id)))?;

        let mut active: kyc_verification::ActiveModel = kyc.into();
        active.status = Set(status.to_string());
        active.reviewed_at = Set(Some(Utc::now()));
        active.reviewed_by = Set(Some(reviewer));
        active.rejection_reason = Set(rejection_reason);
        Ok(active.update(&self.db).await?)
    }

    /// 落库服务商引用，保证重试时幂等
    pub async fn set_kyc_provider_reference(
        &self,
        id: i64,
        reference: String,
    ) -> Result<kyc_verification::Model> {
        let kyc = self
            .find_kyc(id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("KYC 记录不存在: {}", id)))?;
        let mut active: kyc_verification::ActiveModel = kyc.into();
        active.provider_customer_reference = Set(Some(reference));
        Ok(active.update(&self.db).await?)
    }

    pub async fn set_kyc_provisioning_error(
        &self,
        id: i64,
        error: Option<String>,
    ) -> Result<()> {
        let kyc = self
            .find_kyc(id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("KYC 记录不存在: {}", id)))?;
        let mut active: kyc_verification::ActiveModel = kyc.into();
        active.provisioning_error = Set(error);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn list_pending_kyc(&self) -> Result<Vec<kyc_verification::Model>> {
        Ok(kyc_verification::Entity::find()
            .filter(kyc_verification::Column::Status.eq(KycStatus::Pending.to_string()))
            .order_by_asc(kyc_verification::Column::SubmittedAt)
            .all(&self.db)
            .await?)
    }

    // ============ 虚拟账户 ============

    pub async fn list_virtual_accounts(&self, user_id: i64) -> Result<Vec<virtual_account::Model>> {
        Ok(virtual_account::Entity::find()
            .filter(virtual_account::Column::UserId.eq(user_id))
            .order_by_desc(virtual_account::Column::IsPrimary)
            .all(&self.db)
            .await?)
    }

    pub async fn find_virtual_account_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<virtual_account::Model>> {
        Ok(virtual_account::Entity::find()
            .filter(virtual_account::Column::Reference.eq(reference))
            .one(&self.db)
            .await?)
    }

    /// 写入服务商返回的账户；同一银行已有账户则跳过（幂等）。
    /// 用户名下还没有主账户时，把第一条设为主账户。
    pub async fn insert_virtual_accounts(
        &self,
        user_id: i64,
        reference: &str,
        accounts: Vec<ProvisionedAccount>,
    ) -> Result<Vec<virtual_account::Model>> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let mut has_primary = virtual_account::Entity::find()
            .filter(virtual_account::Column::UserId.eq(user_id))
            .filter(virtual_account::Column::IsPrimary.eq(true))
            .one(&txn)
            .await?
            .is_some();

        let mut created = Vec::new();
        for account in accounts {
            let exists = virtual_account::Entity::find()
                .filter(virtual_account::Column::UserId.eq(user_id))
                .filter(virtual_account::Column::BankCode.eq(&account.bank_code))
                .one(&txn)
                .await?;
            if exists.is_some() {
                continue;
            }

            let model = virtual_account::ActiveModel {
                user_id: Set(user_id),
                account_number: Set(account.account_number),
                account_name: Set(account.account_name),
                bank_name: Set(account.bank_name),
                bank_code: Set(account.bank_code),
                reference: Set(reference.to_string()),
                is_active: Set(true),
                is_primary: Set(!has_primary),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            has_primary = true;
            created.push(model);
        }

        txn.commit().await?;
        info!(
            "Provisioned {} virtual account(s) for user {}",
            created.len(),
            user_id
        );
        Ok(created)
    }

    /// 设为主账户，同一事务中取消其余主标记
    pub async fn set_primary_virtual_account(&self, user_id: i64, account_id: i64) -> Result<()> {
        let txn = self.db.begin().await?;

        let target = virtual_account::Entity::find_by_id(account_id)
            .one(&txn)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| VinajiError::not_found(format!("虚拟账户不存在: {}", account_id)))?;

        let primaries = virtual_account::Entity::find()
            .filter(virtual_account::Column::UserId.eq(user_id))
            .filter(virtual_account::Column::IsPrimary.eq(true))
            .all(&txn)
            .await?;
        for account in primaries {
            let mut active: virtual_account::ActiveModel = account.into();
            active.is_primary = Set(false);
            active.updated_at = Set(Utc::now());
            active.update(&txn).await?;
        }

        let mut active: virtual_account::ActiveModel = target.into();
        active.is_primary = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    pub async fn toggle_virtual_account(&self, user_id: i64, account_id: i64) -> Result<bool> {
        let account = virtual_account::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| VinajiError::not_found(format!("虚拟账户不存在: {}", account_id)))?;

        let next = !account.is_active;
        let mut active: virtual_account::ActiveModel = account.into();
        active.is_active = Set(next);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(next)
    }

    // ============ 服务商银行列表 ============

    pub async fn upsert_provider_banks(
        &self,
        banks: Vec<(String, String)>,
    ) -> Result<usize> {
        let txn = self.db.begin().await?;
        let mut count = 0;

        for (code, name) in banks {
            match provider_bank::Entity::find()
                .filter(provider_bank::Column::BankCode.eq(&code))
                .one(&txn)
                .await?
            {
                Some(existing) => {
                    let mut active: provider_bank::ActiveModel = existing.into();
                    active.bank_name = Set(name);
                    active.is_active = Set(true);
                    active.update(&txn).await?;
                }
                None => {
                    provider_bank::ActiveModel {
                        bank_code: Set(code),
                        bank_name: Set(name),
                        is_active: Set(true),
                        is_default: Set(false),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                }
            }
            count += 1;
        }

        txn.commit().await?;
        info!("Synced {} provider banks", count);
        Ok(count)
    }

    pub async fn list_provider_banks(&self) -> Result<Vec<provider_bank::Model>> {
        Ok(provider_bank::Entity::find()
            .filter(provider_bank::Column::IsActive.eq(true))
            .order_by_asc(provider_bank::Column::BankName)
            .all(&self.db)
            .await?)
    }

    // ============ 用户银行偏好 ============

    pub async fn list_bank_preferences(&self, user_id: i64) -> Result<Vec<bank_preference::Model>> {
        Ok(bank_preference::Entity::find()
            .filter(bank_preference::Column::UserId.eq(user_id))
            .filter(bank_preference::Column::IsActive.eq(true))
            .all(&self.db)
            .await?)
    }

    pub async fn add_bank_preference(
        &self,
        user_id: i64,
        bank_code: String,
    ) -> Result<bank_preference::Model> {
        let bank = provider_bank::Entity::find()
            .filter(provider_bank::Column::BankCode.eq(&bank_code))
            .filter(provider_bank::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;
        if bank.is_none() {
            return Err(VinajiError::validation(format!("未知银行代码: {}", bank_code)));
        }

        if let Some(existing) = bank_preference::Entity::find()
            .filter(bank_preference::Column::UserId.eq(user_id))
            .filter(bank_preference::Column::BankCode.eq(&bank_code))
            .one(&self.db)
            .await?
        {
            return Ok(existing);
        }

        Ok(bank_preference::ActiveModel {
            user_id: Set(user_id),
            bank_code: Set(bank_code),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }
}

/// 事务内按引用查虚拟账户（webhook 入账用）
pub async fn virtual_account_by_reference<C: ConnectionTrait>(
    conn: &C,
    reference: &str,
) -> Result<Option<virtual_account::Model>> {
    Ok(virtual_account::Entity::find()
        .filter(virtual_account::Column::Reference.eq(reference))
        .one(conn)
        .await?)
}

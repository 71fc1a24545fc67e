//! User, profile and payout destination storage operations.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::{Result, VinajiError};
use crate::utils::generate_referral_code;

use migration::entities::{
    bank_account, crypto_wallet, password_reset_token, user, user_profile,
};

/// 注册参数
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub referred_by: Option<i64>,
}

impl SeaOrmStorage {
    /// 创建用户及其空档案（同一事务）
    pub async fn create_user(&self, new: NewUser) -> Result<user::Model> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        // 推荐码撞库时重新生成
        let mut referral_code = generate_referral_code();
        while user::Entity::find()
            .filter(user::Column::ReferralCode.eq(&referral_code))
            .one(&txn)
            .await?
            .is_some()
        {
            referral_code = generate_referral_code();
        }

        let created = user::ActiveModel {
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            subscription_level: Set("starter".to_string()),
            referral_code: Set(referral_code),
            is_verified: Set(false),
            is_staff: Set(false),
            is_active: Set(true),
            date_joined: Set(now),
            date_updated: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        user_profile::ActiveModel {
            user_id: Set(created.id),
            referred_by: Set(new.referred_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!("User registered: {} (id {})", created.username, created.id);
        Ok(created)
    }

    pub async fn find_user(&self, id: i64) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn find_user_by_referral_code(&self, code: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::ReferralCode.eq(code))
            .one(&self.db)
            .await?)
    }

    pub async fn set_user_subscription_level(&self, user_id: i64, level: &str) -> Result<()> {
        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("用户不存在: {}", user_id)))?;
        let mut active: user::ActiveModel = user.into();
        active.subscription_level = Set(level.to_string());
        active.date_updated = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn set_user_verified(&self, user_id: i64, verified: bool) -> Result<()> {
        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("用户不存在: {}", user_id)))?;
        let mut active: user::ActiveModel = user.into();
        active.is_verified = Set(verified);
        active.date_updated = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn promote_to_staff(&self, user_id: i64) -> Result<()> {
        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("用户不存在: {}", user_id)))?;
        let mut active: user::ActiveModel = user.into();
        active.is_staff = Set(true);
        active.date_updated = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn update_password(&self, user_id: i64, password_hash: String) -> Result<()> {
        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("用户不存在: {}", user_id)))?;
        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.date_updated = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    // ============ 档案 ============

    pub async fn get_profile(&self, user_id: i64) -> Result<Option<user_profile::Model>> {
        Ok(user_profile::Entity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        bio: Option<String>,
        country: Option<String>,
        phone_number: Option<String>,
        profile_picture_url: Option<String>,
    ) -> Result<user_profile::Model> {
        let profile = self
            .get_profile(user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("档案不存在: {}", user_id)))?;

        let mut active: user_profile::ActiveModel = profile.into();
        if bio.is_some() {
            active.bio = Set(bio);
        }
        if country.is_some() {
            active.country = Set(country);
        }
        if phone_number.is_some() {
            active.phone_number = Set(phone_number);
        }
        if profile_picture_url.is_some() {
            active.profile_picture_url = Set(profile_picture_url);
        }
        Ok(active.update(&self.db).await?)
    }

    // ============ 密码重置 ============

    /// 签发重置令牌（1 小时有效，单次使用）
    pub async fn create_password_reset_token(
        &self,
        user_id: i64,
    ) -> Result<password_reset_token::Model> {
        let now = Utc::now();
        Ok(password_reset_token::ActiveModel {
            user_id: Set(user_id),
            token: Set(Uuid::new_v4()),
            created_at: Set(now),
            expires_at: Set(now + Duration::hours(1)),
            is_used: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// 查找仍然有效的令牌
    pub async fn find_valid_reset_token(
        &self,
        token: Uuid,
    ) -> Result<Option<password_reset_token::Model>> {
        let found = password_reset_token::Entity::find()
            .filter(password_reset_token::Column::Token.eq(token))
            .one(&self.db)
            .await?;

        Ok(found.filter(|t| !t.is_used && t.expires_at > Utc::now()))
    }

    pub async fn mark_reset_token_used(&self, token: password_reset_token::Model) -> Result<()> {
        let mut active: password_reset_token::ActiveModel = token.into();
        active.is_used = Set(true);
        active.update(&self.db).await?;
        Ok(())
    }

    // ============ 收款银行账户 ============

    pub async fn list_bank_accounts(&self, user_id: i64) -> Result<Vec<bank_account::Model>> {
        Ok(bank_account::Entity::find()
            .filter(bank_account::Column::UserId.eq(user_id))
            .order_by_desc(bank_account::Column::IsPrimary)
            .all(&self.db)
            .await?)
    }

    /// 添加收款账户；设为主账户时在同一事务中取消其余主标记
    pub async fn add_bank_account(
        &self,
        user_id: i64,
        bank_name: String,
        account_number: String,
        account_name: String,
        account_type: String,
        is_primary: bool,
    ) -> Result<bank_account::Model> {
        let txn = self.db.begin().await?;

        if is_primary {
            demote_primary_bank_accounts(&txn, user_id).await?;
        }

        let created = bank_account::ActiveModel {
            user_id: Set(user_id),
            bank_name: Set(bank_name),
            account_number: Set(account_number),
            account_name: Set(account_name),
            account_type: Set(account_type),
            is_primary: Set(is_primary),
            is_verified: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    pub async fn remove_bank_account(&self, user_id: i64, id: i64) -> Result<()> {
        let result = bank_account::Entity::delete_many()
            .filter(bank_account::Column::Id.eq(id))
            .filter(bank_account::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(VinajiError::not_found(format!("银行账户不存在: {}", id)));
        }
        Ok(())
    }

    // ============ 加密钱包 ============

    pub async fn list_crypto_wallets(&self, user_id: i64) -> Result<Vec<crypto_wallet::Model>> {
        Ok(crypto_wallet::Entity::find()
            .filter(crypto_wallet::Column::UserId.eq(user_id))
            .order_by_desc(crypto_wallet::Column::IsPrimary)
            .all(&self.db)
            .await?)
    }

    pub async fn add_crypto_wallet(
        &self,
        user_id: i64,
        crypto_type: String,
        wallet_address: String,
        network: Option<String>,
        is_primary: bool,
    ) -> Result<crypto_wallet::Model> {
        let existing = crypto_wallet::Entity::find()
            .filter(crypto_wallet::Column::UserId.eq(user_id))
            .filter(crypto_wallet::Column::WalletAddress.eq(&wallet_address))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(VinajiError::conflict("该钱包地址已绑定"));
        }

        let txn = self.db.begin().await?;

        if is_primary {
            let wallets = crypto_wallet::Entity::find()
                .filter(crypto_wallet::Column::UserId.eq(user_id))
                .filter(crypto_wallet::Column::IsPrimary.eq(true))
                .all(&txn)
                .await?;
            for wallet in wallets {
                let mut active: crypto_wallet::ActiveModel = wallet.into();
                active.is_primary = Set(false);
                active.update(&txn).await?;
            }
        }

        let created = crypto_wallet::ActiveModel {
            user_id: Set(user_id),
            crypto_type: Set(crypto_type),
            wallet_address: Set(wallet_address),
            network: Set(network),
            is_primary: Set(is_primary),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    pub async fn remove_crypto_wallet(&self, user_id: i64, id: i64) -> Result<()> {
        let result = crypto_wallet::Entity::delete_many()
            .filter(crypto_wallet::Column::Id.eq(id))
            .filter(crypto_wallet::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(VinajiError::not_found(format!("加密钱包不存在: {}", id)));
        }
        Ok(())
    }
}

async fn demote_primary_bank_accounts<C: sea_orm::ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<()> {
    let accounts = bank_account::Entity::find()
        .filter(bank_account::Column::UserId.eq(user_id))
        .filter(bank_account::Column::IsPrimary.eq(true))
        .all(conn)
        .await?;
    for account in accounts {
        let mut active: bank_account::ActiveModel = account.into();
        active.is_primary = Set(false);
        active.update(conn).await?;
    }
    Ok(())
}

//! Account registration, login checks and password reset.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::errors::{Result, VinajiError};
use crate::storage::backend::users::NewUser;
use crate::storage::backend::wallet::{self, NewTransaction};
use crate::storage::{SeaOrmStorage, TxKind};
use crate::utils::password::{hash_password, verify_password};

use migration::entities::user;

const MIN_PASSWORD_LEN: usize = 8;

/// 注册请求
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// 推荐人的推荐码
    pub referral_code: Option<String>,
}

pub struct AccountService {
    storage: Arc<SeaOrmStorage>,
}

impl AccountService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 注册：创建用户 + 档案；带推荐码时建立推荐关系并发放注册奖励
    pub async fn register(&self, req: RegisterRequest) -> Result<user::Model> {
        let username = req.username.trim().to_string();
        if username.len() < 3 {
            return Err(VinajiError::validation("用户名至少 3 个字符"));
        }
        if !req.email.contains('@') {
            return Err(VinajiError::validation("邮箱格式不正确"));
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(VinajiError::validation(format!(
                "密码至少 {} 个字符",
                MIN_PASSWORD_LEN
            )));
        }

        if self.storage.find_user_by_username(&username).await?.is_some() {
            return Err(VinajiError::conflict("用户名已被占用"));
        }
        if self.storage.find_user_by_email(&req.email).await?.is_some() {
            return Err(VinajiError::conflict("邮箱已被注册"));
        }

        let referrer = match req.referral_code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => Some(
                self.storage
                    .find_user_by_referral_code(code)
                    .await?
                    .ok_or_else(|| VinajiError::validation("推荐码无效"))?,
            ),
            None => None,
        };

        let password_hash = hash_password(&req.password)?;
        let created = self
            .storage
            .create_user(NewUser {
                username,
                email: req.email,
                password_hash,
                first_name: req.first_name,
                last_name: req.last_name,
                referred_by: referrer.as_ref().map(|u| u.id),
            })
            .await?;

        if let Some(referrer) = referrer {
            self.storage.insert_referral(referrer.id, created.id).await?;

            let settings = self.storage.site_settings().await?;
            if settings.referral_signup_reward > Decimal::ZERO {
                wallet::insert_tx(
                    self.storage.get_db(),
                    NewTransaction::completed(
                        referrer.id,
                        TxKind::Credit,
                        settings.referral_signup_reward,
                        &settings.currency,
                        format!("Referral signup reward for {}", created.username),
                    ),
                )
                .await?;
            }
            info!("Referral recorded: {} -> {}", referrer.id, created.id);
        }

        Ok(created)
    }

    /// 登录校验：用户名或邮箱 + 密码
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<user::Model> {
        let user = if identifier.contains('@') {
            self.storage.find_user_by_email(identifier).await?
        } else {
            self.storage.find_user_by_username(identifier).await?
        };

        let Some(user) = user else {
            // 统一错误信息，避免用户名枚举
            return Err(VinajiError::unauthorized("用户名或密码错误"));
        };

        if !user.is_active {
            return Err(VinajiError::forbidden("账户已停用"));
        }
        if !verify_password(password, &user.password_hash)? {
            return Err(VinajiError::unauthorized("用户名或密码错误"));
        }

        Ok(user)
    }

    /// 签发密码重置令牌。邮件发送不在本服务范围内，
    /// 令牌由调用方送达用户。
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<Uuid>> {
        match self.storage.find_user_by_email(email).await? {
            Some(user) => {
                let token = self.storage.create_password_reset_token(user.id).await?;
                info!("Password reset token issued for user {}", user.id);
                Ok(Some(token.token))
            }
            // 邮箱未注册时同样返回成功，避免探测
            None => Ok(None),
        }
    }

    pub async fn reset_password(&self, token: Uuid, new_password: &str) -> Result<()> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(VinajiError::validation(format!(
                "密码至少 {} 个字符",
                MIN_PASSWORD_LEN
            )));
        }

        let token_row = self
            .storage
            .find_valid_reset_token(token)
            .await?
            .ok_or_else(|| VinajiError::unauthorized("重置令牌无效或已过期"))?;

        let password_hash = hash_password(new_password)?;
        self.storage
            .update_password(token_row.user_id, password_hash)
            .await?;
        self.storage.mark_reset_token_used(token_row).await?;
        Ok(())
    }
}
